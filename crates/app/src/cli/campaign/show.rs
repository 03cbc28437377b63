use clap::Args;
use flashdeal_app::domain::campaigns::records::CampaignUuid;

use super::{DatabaseArgs, print_outcome};

#[derive(Debug, Args)]
pub(crate) struct ShowCampaignArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Campaign to show
    #[arg(long)]
    campaign: CampaignUuid,
}

pub(crate) async fn run(args: ShowCampaignArgs) -> Result<(), String> {
    let service = args.database.service().await?;

    print_outcome(service.get_campaign(args.campaign).await)
}
