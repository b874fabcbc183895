//! Authenticated HTTP gateway that assigns Roblox group ranks.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod opencloud;
pub mod ranking;

#[cfg(test)]
pub(crate) mod testutils;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use ranking::{RankingService, RoleCache};
