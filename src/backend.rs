//! HTTP surface of the validator: the router, its handlers and the wire models.

pub mod handlers;
mod models;
pub mod router;

pub use models::{RejectedResponse, ValidateRequest};
