use std::net::SocketAddr;
use std::path::PathBuf;

use clap::ValueEnum;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    /// Process-lifetime storage, lost on exit.
    Memory,
    /// SQLite database under the data directory.
    Sqlite,
}

#[derive(Clone)]
pub struct Configuration {
    pub api_listen: SocketAddr,
    pub data_dir: PathBuf,
    pub backend: BackendKind,
    pub log_file: Option<PathBuf>,
    pub reset: bool,
}

impl Configuration {
    pub fn from_cli(cli: &crate::cli::Cli) -> Self {
        Self {
            api_listen: cli.api_listen,
            data_dir: PathBuf::from(&cli.data_dir),
            backend: cli.backend,
            log_file: cli.log_file.as_ref().map(PathBuf::from),
            reset: cli.reset,
        }
    }
}
