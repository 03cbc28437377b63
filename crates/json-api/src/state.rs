//! Shared handler state

use std::sync::Arc;

use flashdeal_app::{context::AppContext, domain::campaigns::CampaignsService};

/// Services every handler can reach through the depot.
pub(crate) struct State {
    pub(crate) campaigns: Arc<dyn CampaignsService>,
}

impl State {
    pub(crate) fn from_app_context(app: AppContext) -> Arc<Self> {
        Arc::new(Self {
            campaigns: app.campaigns,
        })
    }
}
