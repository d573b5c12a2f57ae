//! # StockPOS API
//!
//! HTTP/JSON surface over the StockPOS storage layer. All invariants
//! (atomic checkout, non-negative stock, derived balances) are enforced in
//! `stockpos-db` and `stockpos-core`; this crate only maps requests and
//! responses.
//!
//! The router is exposed so integration tests can drive it in-process
//! without binding a socket.

pub mod config;
pub mod error;
pub mod routes;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult};
pub use routes::{router, AppState};
