//! OpenAPI documentation configuration.

use actix_web::{HttpResponse, get, web};
use utoipa::OpenApi;

use crate::api;

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Article Extractor",
        description = "Fetches a page and returns its main article content as HTML"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(api::health::health, api::extract::extract),
    components(schemas(api::health::HealthResponse)),
    tags(
        (name = "Health", description = "Liveness checks"),
        (name = "Extraction", description = "Main-content extraction")
    )
)]
pub struct ApiDoc;

/// Serve the OpenAPI document as JSON.
#[get("/api-docs/openapi.json")]
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Configure documentation routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(openapi_json);
}
