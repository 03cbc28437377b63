use std::path::PathBuf;

use clap::Args;
use flashdeal_app::domain::campaigns::records::{ActorUuid, CampaignUuid};

use super::{DatabaseArgs, describe, file::CampaignFile, print_outcome};

#[derive(Debug, Args)]
pub(crate) struct EditCampaignArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Campaign to edit
    #[arg(long)]
    campaign: CampaignUuid,

    /// YAML file with the replacement details
    #[arg(long)]
    file: PathBuf,

    /// Operator editing the campaign
    #[arg(long, env = "FLASHDEAL_ACTOR")]
    actor: ActorUuid,
}

pub(crate) async fn run(args: EditCampaignArgs) -> Result<(), String> {
    let file = CampaignFile::load(&args.file)
        .map_err(|error| format!("{}: {}", args.file.display(), describe(&error)))?;

    if file
        .uuid
        .is_some_and(|uuid| CampaignUuid::from(uuid) != args.campaign)
    {
        return Err(format!(
            "{} describes a different campaign than {}",
            args.file.display(),
            args.campaign
        ));
    }

    let service = args.database.service().await?;

    if let Some(mode) = file.discount_mode {
        let existing = service
            .get_campaign(args.campaign)
            .await
            .map_err(|error| describe(&error))?;

        if existing.discount_mode != mode {
            return Err(format!(
                "discount mode is fixed at creation; campaign {} uses {}",
                existing.uuid, existing.discount_mode
            ));
        }
    }

    print_outcome(
        service
            .edit_campaign(args.actor, args.campaign, file.into_details())
            .await,
    )
}
