//! HTTP middleware.

mod request_logger;

pub use request_logger::{RequestLogger, redact_query};
