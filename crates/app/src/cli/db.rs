//! Database maintenance commands

use clap::{Args, Subcommand};
use flashdeal_app::database;

#[derive(Debug, Args)]
pub(crate) struct DbCommand {
    #[command(subcommand)]
    command: DbSubcommand,
}

#[derive(Debug, Subcommand)]
enum DbSubcommand {
    /// Apply pending schema migrations
    Migrate {
        /// PostgreSQL connection string
        #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
        database_url: String,
    },
}

pub(crate) async fn run(command: DbCommand) -> Result<(), String> {
    let DbSubcommand::Migrate { database_url } = command.command;

    let pool = database::connect(&database_url, 1)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    database::migrate(&pool)
        .await
        .map_err(|error| format!("failed to run migrations: {error}"))?;

    println!("migrations applied");

    Ok(())
}
