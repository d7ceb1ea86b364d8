use std::sync::Arc;

use anyhow::{Context, Result};

use crate::configuration::{BackendKind, Configuration};
use crate::repository::{MemoryRepository, RunRepository, SqliteRepository};

pub fn init_data_dir(config: &Configuration) -> Result<()> {
    std::fs::create_dir_all(&config.data_dir)?;
    Ok(())
}

pub fn init_repository(
    config: &Configuration,
) -> Result<Arc<dyn RunRepository + Send + Sync>> {
    match config.backend {
        BackendKind::Memory => Ok(Arc::new(MemoryRepository::new())),
        BackendKind::Sqlite => {
            let db_path = config.data_dir.join("runlog.sqlite");
            let sqlite = SqliteRepository::new(&db_path);
            if config.reset {
                sqlite.reset_all().context("resetting storage")?;
            }
            sqlite.init().context("initializing storage")?;
            Ok(Arc::new(sqlite))
        }
    }
}
