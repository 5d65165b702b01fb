pub mod cache;
pub mod config;
pub mod error;
pub mod metrics_server;
pub mod observability;
pub mod routes;
pub mod store;

pub use error::ServiceError;
pub use routes::{router, AppState};
