use clap::Args;
use flashdeal_app::domain::campaigns::records::{ActorUuid, CampaignUuid};

use super::{DatabaseArgs, print_outcome};

#[derive(Debug, Args)]
pub(crate) struct TransitionArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Campaign to move
    #[arg(long)]
    campaign: CampaignUuid,
}

#[derive(Debug, Args)]
pub(crate) struct OperatorTransitionArgs {
    #[command(flatten)]
    target: TransitionArgs,

    /// Operator requesting the change
    #[arg(long, env = "FLASHDEAL_ACTOR")]
    actor: ActorUuid,
}

pub(crate) async fn pause(args: OperatorTransitionArgs) -> Result<(), String> {
    let service = args.target.database.service().await?;

    print_outcome(
        service
            .pause_campaign(args.actor, args.target.campaign)
            .await,
    )
}

pub(crate) async fn end(args: OperatorTransitionArgs) -> Result<(), String> {
    let service = args.target.database.service().await?;

    print_outcome(
        service
            .end_campaign(args.actor, args.target.campaign)
            .await,
    )
}

pub(crate) async fn activate(args: TransitionArgs) -> Result<(), String> {
    let service = args.database.service().await?;

    print_outcome(service.activate_campaign(args.campaign).await)
}

pub(crate) async fn reconcile(args: TransitionArgs) -> Result<(), String> {
    let service = args.database.service().await?;

    print_outcome(service.reconcile_projections(args.campaign).await)
}
