//! The `/extract` endpoint.
//!
//! Always answers `200 OK` with `text/html; charset=utf-8`. Failures are
//! reported in the body as `ERROR: <description>`, so callers must inspect
//! the body to tell success from failure.

use actix_web::{HttpRequest, HttpResponse, get, web};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};
use url::Url;
use utoipa::IntoParams;

use crate::auth::AuthKey;
use crate::config::{AUTH_KEY_PARAM, URL_PARAM};
use crate::error::{ExtractError, ExtractResult};
use crate::services::ContentExtractor;

/// Content type of every `/extract` response.
pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Query parameters of `/extract`.
#[derive(Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExtractQuery {
    /// Shared auth key.
    #[param(value_type = Option<String>)]
    pub key: Option<SecretString>,
    /// Absolute http(s) URL of the page to extract.
    pub url: Option<String>,
}

impl ExtractQuery {
    /// Read `key` and `url` from a raw query string.
    ///
    /// The first occurrence of a repeated parameter wins. A query string that
    /// cannot be decoded is treated as carrying no parameters.
    pub fn from_query(query: &str) -> Self {
        let pairs = web::Query::<Vec<(String, String)>>::from_query(query)
            .map(|q| q.into_inner())
            .unwrap_or_default();

        let mut params = ExtractQuery::default();
        for (name, value) in pairs {
            if name == AUTH_KEY_PARAM && params.key.is_none() {
                params.key = Some(SecretString::from(value));
            } else if name == URL_PARAM && params.url.is_none() {
                params.url = Some(value);
            }
        }
        params
    }
}

/// Parse the caller's URL, accepting only absolute http(s) URLs.
pub fn parse_target_url(raw: Option<&str>) -> ExtractResult<Url> {
    let raw = raw.ok_or(ExtractError::MissingUrl)?;
    let url = Url::parse(raw.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ExtractError::UnsupportedScheme(other.to_string())),
    }
}

/// Verify the key, then fetch and extract the page.
pub async fn run_extraction(
    params: &ExtractQuery,
    auth_key: &AuthKey,
    extractor: &dyn ContentExtractor,
) -> ExtractResult<String> {
    let candidate = params.key.as_ref().map(|k| k.expose_secret().as_bytes());
    if !auth_key.is_valid_key(candidate) {
        return Err(ExtractError::InvalidAuthKey);
    }

    let url = parse_target_url(params.url.as_deref())?;
    let html = extractor.extract_and_highlight(&url).await?;

    info!(
        host = url.host_str().unwrap_or(""),
        bytes = html.len(),
        "Extracted main content"
    );
    Ok(html)
}

/// Fetch a page and return its main content as HTML.
#[utoipa::path(
    get,
    path = "/extract",
    tag = "Extraction",
    params(ExtractQuery),
    responses(
        (status = 200, description = "Extracted HTML, or `ERROR: <description>` on failure", body = String, content_type = "text/html")
    )
)]
#[get("/extract")]
pub async fn extract(
    req: HttpRequest,
    auth_key: web::Data<AuthKey>,
    extractor: web::Data<dyn ContentExtractor>,
) -> HttpResponse {
    let params = ExtractQuery::from_query(req.query_string());

    let body = match run_extraction(&params, &auth_key, extractor.get_ref()).await {
        Ok(html) => html,
        Err(ExtractError::InvalidAuthKey) => {
            warn!(
                key_present = params.key.is_some(),
                "Rejected extraction request with invalid auth key"
            );
            ExtractError::InvalidAuthKey.to_wire_body()
        }
        Err(e) => {
            warn!(kind = %e.kind(), url = params.url.as_deref().unwrap_or(""), "Extraction failed: {}", e);
            e.to_wire_body()
        }
    };

    HttpResponse::Ok()
        .content_type(HTML_CONTENT_TYPE)
        .body(format!("{body}\n"))
}

/// Configure extraction routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(extract);
}
