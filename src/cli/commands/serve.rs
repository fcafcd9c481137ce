use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::server::start_server;
use crate::ui::messages::info;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Serve { port, bind } = cmd {
        let port = port.unwrap_or(cfg.server_port);
        info(format!("Serving {} on {bind}:{port} (Ctrl+C to stop)", cfg.database));

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        runtime.block_on(start_server(cfg.clone(), bind, port))?;
    }
    Ok(())
}
