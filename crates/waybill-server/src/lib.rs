//! HTTP API for Waybill.
//!
//! Three thin endpoints over the audit trail service: create a package,
//! record a status update, and read a package's history.

pub mod config;
pub mod dto;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult, ErrorResponse, ServerError, ServerResult};
pub use server::WaybillServer;
pub use state::AppState;
