//! HTTP API module for the meal voucher engine.
//!
//! This module exposes a benefit run over HTTP: the caller posts the
//! competence month and the ten source tables, and receives the run result.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::RunRequest;
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
