#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod domain;
pub mod error;
pub mod errors;
pub mod events;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;
pub mod trace_ctx;
pub mod ws;

#[cfg(test)]
mod test_bootstrap;

// Re-exports for public API
pub use auth::claims::AccessClaims;
pub use auth::jwt::{mint_access_token, verify_access_token, ACCESS_TOKEN_TTL_SECS};
pub use error::AppError;
pub use extractors::GameId;
pub use middleware::cors::cors_middleware;
pub use middleware::jwt_extract::JwtExtract;
pub use middleware::request_trace::RequestTrace;
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;
pub use store::SessionStore;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
