// Library exports for the depot binary and integration tests

pub mod database;
pub mod http_server;
pub mod process;
mod service_config;
mod service_state;

// Re-export key types for convenience
pub use database::Database;
pub use process::{spawn_service, start_service, ShutdownHandle};
pub use service_config::{Config as ServiceConfig, PrincipalSeed};
pub use service_state::{State as ServiceState, StateSetupError};
