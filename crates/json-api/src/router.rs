//! App Router

use salvo::Router;

use crate::{actor, campaigns, healthcheck};

pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(
            Router::with_path("campaigns")
                .hoop(actor::handler)
                .post(campaigns::create::handler)
                .push(
                    Router::with_path("{campaign}")
                        .get(campaigns::get::handler)
                        .put(campaigns::update::handler)
                        .push(Router::with_path("pause").post(campaigns::pause::handler))
                        .push(Router::with_path("end").post(campaigns::end::handler))
                        .push(Router::with_path("activate").post(campaigns::activate::handler))
                        .push(Router::with_path("reconcile").post(campaigns::reconcile::handler)),
                ),
        )
}
