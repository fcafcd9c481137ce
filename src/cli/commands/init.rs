use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped in test mode)
///  - the SQLite database
///  - all pending DB migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.clone(), cli.test)?;
    let db_path = db_path.to_string_lossy().to_string();

    info("Initializing rTimesheet…");
    info(format!("Database   : {db_path}"));

    let pool = DbPool::new(&db_path)?;
    init_db(&pool.conn)?;

    success(format!("Database initialized at {db_path}"));

    // Audit write failures do not abort init.
    if let Err(e) = log::ttlog(
        &pool.conn,
        "init",
        &db_path,
        &format!("Database initialized at {db_path}"),
    ) {
        warning(format!("Failed to write internal log: {e}"));
    }

    Ok(())
}
