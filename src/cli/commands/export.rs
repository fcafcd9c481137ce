use crate::cli::commands::{open_pool, resolve_viewer};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::export::ExportLogic;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config, acting: Option<i64>) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        range,
        employee,
        force,
    } = cmd
    {
        let pool = open_pool(cfg)?;
        let viewer = resolve_viewer(&pool, acting, *employee)?;
        ExportLogic::export(
            &pool.conn,
            &viewer,
            *format,
            file,
            range.as_deref(),
            *employee,
            *force,
        )?;
    }
    Ok(())
}
