//! API endpoint modules.

pub mod extract;
pub mod health;
pub mod openapi;

pub use extract::configure_routes as configure_extract_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use openapi::configure_routes as configure_doc_routes;
