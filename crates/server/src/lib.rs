//! HTTP API for Glossa: article parsing plus word and sentence lookups, rate
//! limited per client.

pub mod client_ip;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;

pub use client_ip::ClientIp;
pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::build_app;
pub use state::AppState;
