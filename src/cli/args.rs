use clap::Parser;
use std::env;

use crate::cli::command::Command;
use crate::configuration::BackendKind;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Track workout runs and serve them over a REST API",
    long_about = "A small service that keeps a log of workout runs (timing, distance, location) and exposes CRUD endpoints for a frontend.",
    subcommand_required = false,
    arg_required_else_help = false
)]
pub struct Cli {
    #[arg(
        long = "api-listen",
        env = "RUNLOG_API_LISTEN",
        value_name = "ADDR",
        default_value = "127.0.0.1:8080",
        help = "REST API listen address (host:port)"
    )]
    pub api_listen: std::net::SocketAddr,

    #[arg(
        long,
        env = "RUNLOG_DATA_DIR",
        default_value = ".runlog/",
        value_name = "DIR",
        help = "Directory to store persistent data"
    )]
    pub data_dir: String,

    #[arg(
        long,
        env = "RUNLOG_BACKEND",
        value_enum,
        default_value = "sqlite",
        help = "Storage backend for run records"
    )]
    pub backend: BackendKind,

    #[arg(
        long,
        default_value_t = false,
        help = "Reset all persisted state (delete the SQLite database) before starting"
    )]
    pub reset: bool,

    #[arg(
        long = "log-file",
        env = "RUNLOG_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<String>,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    dotenvy::from_filename(&dotenv_path).ok();

    Cli::parse()
}
