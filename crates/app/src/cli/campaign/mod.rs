use std::{error::Error, sync::Arc};

use clap::{Args, Subcommand};
use flashdeal_app::{
    context::AppContext,
    domain::campaigns::{CampaignsService, CampaignsServiceError, records::CampaignRecord},
};

mod create;
mod edit;
mod file;
mod show;
mod sweep;
mod table;
mod transition;

#[derive(Debug, Args)]
pub(crate) struct CampaignCommand {
    #[command(subcommand)]
    command: CampaignSubcommand,
}

#[derive(Debug, Subcommand)]
enum CampaignSubcommand {
    /// Schedule a campaign described by a YAML file
    Create(create::CreateCampaignArgs),

    /// Replace a scheduled campaign's details from a YAML file
    Edit(edit::EditCampaignArgs),

    /// Print a campaign and its line items
    Show(show::ShowCampaignArgs),

    /// Pause an active campaign
    Pause(transition::OperatorTransitionArgs),

    /// End an active or paused campaign
    End(transition::OperatorTransitionArgs),

    /// Open a scheduled campaign now
    Activate(transition::TransitionArgs),

    /// Re-synchronize a campaign's product projections with its status
    Reconcile(transition::TransitionArgs),

    /// Activate and end every campaign whose window has opened or closed
    Sweep(sweep::SweepArgs),
}

pub(crate) async fn run(command: CampaignCommand) -> Result<(), String> {
    match command.command {
        CampaignSubcommand::Create(args) => create::run(args).await,
        CampaignSubcommand::Edit(args) => edit::run(args).await,
        CampaignSubcommand::Show(args) => show::run(args).await,
        CampaignSubcommand::Pause(args) => transition::pause(args).await,
        CampaignSubcommand::End(args) => transition::end(args).await,
        CampaignSubcommand::Activate(args) => transition::activate(args).await,
        CampaignSubcommand::Reconcile(args) => transition::reconcile(args).await,
        CampaignSubcommand::Sweep(args) => sweep::run(args).await,
    }
}

#[derive(Debug, Args)]
pub(crate) struct DatabaseArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

impl DatabaseArgs {
    pub(crate) async fn service(&self) -> Result<Arc<dyn CampaignsService>, String> {
        let context = AppContext::from_database_url(&self.database_url, 1, false)
            .await
            .map_err(|error| describe(&error))?;

        Ok(context.campaigns)
    }
}

/// Prints the campaign a command produced.
///
/// A partially synchronized campaign is still printed, but the command fails so scripts notice
/// that `reconcile` is needed.
pub(crate) fn print_outcome(
    result: Result<CampaignRecord, CampaignsServiceError>,
) -> Result<(), String> {
    match result {
        Ok(campaign) => {
            println!("{}", table::campaign(&campaign));

            Ok(())
        }
        Err(CampaignsServiceError::PartialSyncFailure {
            campaign, failed, ..
        }) => {
            println!("{}", table::campaign(&campaign));

            let failed = failed
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");

            Err(format!(
                "campaign {} was saved but these products were not synchronized: {failed}; run `campaign reconcile --campaign {}`",
                campaign.uuid, campaign.uuid
            ))
        }
        Err(error) => Err(describe(&error)),
    }
}

/// Renders an error with its chain of sources.
pub(crate) fn describe(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }

    message
}
