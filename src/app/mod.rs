mod wiring;

use crate::repository::RunRepository;
use crate::{cli, configuration, rest};
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct App {
    pub config: configuration::Configuration,
    pub repository: Arc<dyn RunRepository + Send + Sync>,
}

impl App {
    pub fn from_cli() -> Result<(Self, cli::Cli)> {
        let cli = cli::parse();
        let config = configuration::Configuration::from_cli(&cli);

        crate::tracing::init(config.log_file.as_deref());
        log::info!("🚀 Starting runlog");
        log::info!("🗄️ Backend: {:?}", config.backend);
        log::info!("📂 Data dir: {}", config.data_dir.display());

        wiring::init_data_dir(&config).context("initializing data dir")?;
        let repository = wiring::init_repository(&config)?;

        Ok((Self { config, repository }, cli))
    }
}

pub async fn run_daemon(app: App) -> Result<()> {
    log::info!("🌐 REST API: http://{}", app.config.api_listen);
    if let Some(path) = app.config.log_file.as_deref() {
        log::info!("📝 Log file: {}", path.display());
    }

    let shutdown = CancellationToken::new();

    let api_addr = app.config.api_listen;
    let rest_repository = app.repository.clone();
    let rest_shutdown = shutdown.clone();

    let mut rest_handle = tokio::spawn(async move {
        if let Err(e) = rest::serve(api_addr, rest_repository, rest_shutdown).await {
            log::error!("REST server error: {}", e);
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            log::info!("🧨 Ctrl-C received, shutting down");
            shutdown.cancel();
            rest_handle.await?;
        }
        res = &mut rest_handle => {
            res?;
        }
    }

    log::info!("✅ Shutdown complete");
    Ok(())
}

pub async fn run() -> Result<()> {
    let (app, cli) = App::from_cli()?;

    if let Some(cmd) = &cli.cmd {
        // one-shot command mode
        cmd.run(app.repository.as_ref())?;
        return Ok(());
    }

    run_daemon(app).await
}
