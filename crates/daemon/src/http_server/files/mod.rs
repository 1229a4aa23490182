use axum::routing::get;
use axum::Router;

use crate::ServiceState;

pub mod download;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/:user_id/:filename", get(download::handler))
        .with_state(state)
}
