//! rTimesheet library root.
//! Exposes the CLI parser, the high-level run() function, the REST server
//! and the internal modules.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod server;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::commands;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let acting = cli.acting;
    match &cli.command {
        Commands::Init => commands::init::handle(cli),
        Commands::Config { .. } => commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => commands::log::handle(&cli.command, cfg),
        Commands::Employee { action } => commands::employee::handle(action, cfg, acting),
        Commands::Project { action } => commands::project::handle(action, cfg, acting),
        Commands::Workstream { action } => commands::workstream::handle(action, cfg, acting),
        Commands::Task { action } => commands::task::handle(action, cfg, acting),
        Commands::Week { .. }
        | Commands::Day { .. }
        | Commands::Submit { .. }
        | Commands::Reopen { .. } => commands::timesheet::handle(&cli.command, cfg, acting),
        Commands::Backup { .. } => commands::backup::handle(&cli.command, cfg),
        Commands::Export { .. } => commands::export::handle(&cli.command, cfg, acting),
        Commands::Serve { .. } => commands::serve::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    // Config is loaded once; --db wins over the configured path.
    let mut cfg = Config::load()?;
    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg)
}
