//! HTTP gateway subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request id, tracing, timeout, body limit)
//!     → auth.rs (bearer check against the server secret)
//!     → request.rs (validate userId / rankValue)
//!     → rank.rs (delegate to RankingService)
//!     → response.rs (JSON envelope, error kind → status)
//! ```

pub mod auth;
pub mod health;
pub mod rank;
pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::GatewayError;
pub use server::{AppState, HttpServer};
