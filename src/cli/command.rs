use chrono::{Duration, Utc};
use clap::Subcommand;

use crate::repository::RunRepository;
use crate::types::{Location, Run};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(
        about = "Insert a sample run and exit",
        long_about = "Creates one sample run record against the configured backend, useful for a first look at the API without a frontend."
    )]
    Seed,
}

impl Command {
    pub fn run(&self, repo: &(dyn RunRepository + Send + Sync)) -> anyhow::Result<()> {
        match self {
            Command::Seed => seed(repo),
        }
    }
}

fn seed(repo: &(dyn RunRepository + Send + Sync)) -> anyhow::Result<()> {
    let started_on = Utc::now();
    let run = Run {
        id: 1,
        title: "First Run".to_string(),
        started_on,
        completed_on: started_on + Duration::hours(1),
        miles: 5,
        location: Location::Outdoor,
    };
    repo.create(run)?;
    log::info!("🌱 Seeded run 1");
    Ok(())
}
