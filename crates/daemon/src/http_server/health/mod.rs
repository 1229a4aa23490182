mod data_source;
mod liveness;
mod readiness;
mod version;

use axum::routing::get;
use axum::Router;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/livez", get(liveness::handler))
        .route("/readyz", get(readiness::handler))
        .route("/versionz", get(version::handler))
        .with_state(state)
}
