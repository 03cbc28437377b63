//! Actor identity middleware.
//!
//! Callers identify themselves with an `X-Actor-Id` header carrying a UUID. The id is recorded in
//! campaign audit fields; verifying who sent it is left to whatever sits in front of this server.

use flashdeal_app::domain::campaigns::records::ActorUuid;
use salvo::prelude::*;

use crate::extensions::*;

pub(crate) const ACTOR_HEADER: &str = "x-actor-id";

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(actor) = extract_actor(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid X-Actor-Id header"));
        ctrl.skip_rest();

        return;
    };

    depot.insert_actor_uuid(actor);

    ctrl.call_next(req, depot, res).await;
}

fn extract_actor(req: &Request) -> Option<ActorUuid> {
    let value = req.headers().get(ACTOR_HEADER)?.to_str().ok()?;
    let actor: ActorUuid = value.trim().parse().ok()?;

    (!actor.is_nil()).then_some(actor)
}
