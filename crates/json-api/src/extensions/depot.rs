//! Depot helper extensions.

use std::any::Any;

use flashdeal_app::domain::campaigns::records::ActorUuid;
use salvo::prelude::{Depot, StatusError};

const ACTOR_DEPOT_KEY: &str = "actor_uuid";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError>;

    fn insert_actor_uuid(&mut self, actor: ActorUuid);

    fn actor_uuid_or_401(&self) -> Result<ActorUuid, StatusError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, StatusError> {
        self.obtain::<T>()
            .map_err(|_ignored| StatusError::internal_server_error())
    }

    fn insert_actor_uuid(&mut self, actor: ActorUuid) {
        self.insert(ACTOR_DEPOT_KEY, actor);
    }

    fn actor_uuid_or_401(&self) -> Result<ActorUuid, StatusError> {
        self.get::<ActorUuid>(ACTOR_DEPOT_KEY)
            .copied()
            .map_err(|_ignored| StatusError::unauthorized().brief("Missing actor identity"))
    }
}
