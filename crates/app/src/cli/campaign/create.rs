use std::path::PathBuf;

use clap::Args;
use flashdeal_app::domain::campaigns::records::ActorUuid;

use super::{DatabaseArgs, describe, file::CampaignFile, print_outcome};

#[derive(Debug, Args)]
pub(crate) struct CreateCampaignArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// YAML file describing the campaign
    #[arg(long)]
    file: PathBuf,

    /// Operator creating the campaign
    #[arg(long, env = "FLASHDEAL_ACTOR")]
    actor: ActorUuid,
}

pub(crate) async fn run(args: CreateCampaignArgs) -> Result<(), String> {
    let campaign = CampaignFile::load(&args.file)
        .map_err(|error| format!("{}: {}", args.file.display(), describe(&error)))?
        .into_new_campaign();

    let service = args.database.service().await?;

    print_outcome(service.create_campaign(args.actor, campaign).await)
}
