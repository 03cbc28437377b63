use clap::{Parser, Subcommand};

mod campaign;
mod db;
mod logging;

#[derive(Debug, Parser)]
#[command(name = "flashdeal-app", about = "Flash deal operator CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    logging: logging::LoggingArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Campaign(campaign::CampaignCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        logging::init(&self.logging)?;

        match self.command {
            Commands::Campaign(command) => campaign::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}
