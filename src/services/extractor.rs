//! Main-content extraction.
//!
//! [`ContentExtractor`] is the seam the `/extract` handler calls through.
//! The production implementation, [`ReadabilityExtractor`], fetches the page
//! with `reqwest` and hands the HTML to `dom_smoothie` (a Readability port),
//! then wraps the surviving article in highlighting markup.

use async_trait::async_trait;
use dom_smoothie::{Config as ReadabilityConfig, Readability};
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use tracing::{debug, info};
use url::Url;

use crate::config::FetchSettings;
use crate::error::{ExtractError, ExtractResult};

/// Class on the element wrapping the extracted main content.
pub const CONTENT_CLASS: &str = "x-extracted-content";

/// Class on the heading carrying the detected article title.
pub const TITLE_CLASS: &str = "x-extracted-title";

/// Fetches a page and returns its main content as highlighted HTML.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract_and_highlight(&self, url: &Url) -> ExtractResult<String>;
}

/// Readability-based extractor backed by a pooled HTTP client.
pub struct ReadabilityExtractor {
    http_client: reqwest::Client,
    max_page_size: usize,
    max_elements: usize,
}

impl ReadabilityExtractor {
    /// Build the extractor and its HTTP client from settings.
    pub fn new(settings: &FetchSettings) -> ExtractResult<Self> {
        let http_client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.timeout)
            .redirect(Policy::limited(settings.max_redirects))
            .user_agent(settings.user_agent.clone())
            .build()
            .map_err(|e| ExtractError::Fetch(format!("failed to build HTTP client: {e}")))?;

        info!(
            "Readability extractor initialized (timeout={:?}, connect_timeout={:?}, max_page_size={}, max_redirects={})",
            settings.timeout, settings.connect_timeout, settings.max_page_size, settings.max_redirects
        );

        Ok(Self {
            http_client,
            max_page_size: settings.max_page_size,
            max_elements: settings.max_elements,
        })
    }

    /// Download the page body, enforcing the size limit while streaming.
    async fn fetch_page(&self, url: &Url) -> ExtractResult<String> {
        let mut response = self
            .http_client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let limit = self.max_page_size;
        if let Some(declared) = response.content_length()
            && declared > limit as u64
        {
            return Err(ExtractError::PageTooLarge { limit });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > limit {
                return Err(ExtractError::PageTooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }

        debug!(url = %url, bytes = body.len(), "Fetched page");
        Ok(decode_page(content_type.as_deref(), &body))
    }
}

/// Number of leading bytes searched for a `<meta>` charset declaration.
const META_SNIFF_BYTES: usize = 1024;

/// Decode a page body to UTF-8.
///
/// The charset comes from the `Content-Type` header, then from a `<meta>`
/// declaration near the top of the document, then defaults to UTF-8. A BOM
/// overrides all of them. Undecodable bytes become U+FFFD.
pub fn decode_page(content_type: Option<&str>, body: &[u8]) -> String {
    let encoding = content_type
        .and_then(charset_param)
        .or_else(|| meta_charset(body))
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);

    let (text, used, had_errors) = encoding.decode(body);
    if had_errors {
        debug!(encoding = used.name(), "Page contained undecodable bytes");
    }
    text.into_owned()
}

/// Value of the `charset` parameter in a header or `content` attribute.
fn charset_param(value: &str) -> Option<String> {
    let lower = value.to_ascii_lowercase();
    let start = lower.find("charset=")? + "charset=".len();
    let label: String = lower[start..]
        .trim_start_matches(['"', '\'', ' '])
        .chars()
        .take_while(|c| !matches!(c, '"' | '\'' | ';' | ' ' | '>' | '/'))
        .collect();
    (!label.is_empty()).then_some(label)
}

/// Charset declared by `<meta charset>` or `<meta http-equiv>`.
fn meta_charset(body: &[u8]) -> Option<String> {
    let head = &body[..body.len().min(META_SNIFF_BYTES)];
    let head = String::from_utf8_lossy(head).to_ascii_lowercase();
    head.match_indices("<meta")
        .filter_map(|(pos, _)| {
            let tag = &head[pos..];
            let tag = &tag[..tag.find('>').unwrap_or(tag.len())];
            charset_param(tag)
        })
        .next()
}

#[async_trait]
impl ContentExtractor for ReadabilityExtractor {
    async fn extract_and_highlight(&self, url: &Url) -> ExtractResult<String> {
        let html = self.fetch_page(url).await?;

        // DOM parsing is CPU-bound; keep it off the actix worker.
        let base = url.clone();
        let max_elements = self.max_elements;
        tokio::task::spawn_blocking(move || render_main_content(&html, &base, max_elements))
            .await
            .map_err(|e| ExtractError::Extraction(format!("extraction task failed: {e}")))?
    }
}

/// Run Readability over `html` and wrap the result in highlighting markup.
///
/// `url` resolves relative links in the extracted content.
pub fn render_main_content(html: &str, url: &Url, max_elements: usize) -> ExtractResult<String> {
    let cfg = ReadabilityConfig {
        max_elements_to_parse: max_elements,
        ..Default::default()
    };

    let mut readability = Readability::new(html, Some(url.as_str()), Some(cfg))
        .map_err(|e| ExtractError::Extraction(e.to_string()))?;
    let article = readability
        .parse()
        .map_err(|e| ExtractError::Extraction(e.to_string()))?;

    if article.text_content.trim().is_empty() {
        return Err(ExtractError::Extraction(
            "no main content found".to_string(),
        ));
    }

    Ok(highlight(&article.title, &article.content))
}

/// Wrap extracted content (and its title, when known) in highlighting markup.
pub fn highlight(title: &str, content: &str) -> String {
    let title = title.trim();
    let mut out = String::with_capacity(content.len() + title.len() + 96);
    if !title.is_empty() {
        out.push_str(&format!(
            "<h1 class=\"{TITLE_CLASS}\">{}</h1>\n",
            escape_html(title)
        ));
    }
    out.push_str(&format!(
        "<div class=\"{CONTENT_CLASS}\">\n{}\n</div>",
        content.trim()
    ));
    out
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
