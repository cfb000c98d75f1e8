use crate::error::{Result, ScanError};
use crate::result::{Observation, PageLinks};
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Sites routinely turn away clients that do not look like a browser.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

/// Fetches pages and turns their anchors into crawl candidates and
/// host observations.
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    client: Client,
    base_domain: String,
}

impl LinkExtractor {
    pub fn new(base_domain: impl Into<String>, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .connect_timeout(timeout / 2)
            .pool_max_idle_per_host(50)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            base_domain: base_domain.into(),
        })
    }

    /// Fetches `page_url` once and extracts its links.
    ///
    /// Failures are logged and yield an empty result; a bad page never
    /// aborts the crawl.
    pub async fn extract(&self, page_url: &str) -> PageLinks {
        let base = match Url::parse(page_url) {
            Ok(url) => url,
            Err(e) => {
                info!("Invalid URL {}: {}", page_url, e);
                return PageLinks::default();
            }
        };

        let body = match self.fetch(&base).await {
            Ok(body) => body,
            Err(e) => {
                warn!("Fetch failed for {}: {}", page_url, e);
                return PageLinks::default();
            }
        };

        let links = extract_links(&body, &base, &self.base_domain);
        debug!(
            "{}: {} internal links, {} observations",
            page_url,
            links.internal.len(),
            links.observations.len()
        );
        links
    }

    async fn fetch(&self, url: &Url) -> Result<String> {
        debug!("Fetching {}", url);

        // The response owns the connection; it is released when this scope
        // ends, whichever branch returns.
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Scans `html` for anchors. Every resolvable http(s) link produces an
/// observation; links on `base_domain` are also returned as crawl targets.
pub fn extract_links(html: &str, page_url: &Url, base_domain: &str) -> PageLinks {
    let document = Html::parse_document(html);
    let mut links = PageLinks::default();

    for element in document.select(&ANCHOR_SELECTOR) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let absolute = match resolve_link(page_url, href) {
            Ok(Some(url)) => url,
            Ok(None) => continue,
            Err(e) => {
                debug!("Skipping link on {}: {}", page_url, e);
                continue;
            }
        };
        let Some(host) = absolute.host_str() else {
            continue;
        };

        let label = element.text().collect::<String>().trim().to_string();

        if host == base_domain {
            debug!("Found internal link: {}", absolute);
            links.internal.insert(absolute.to_string());
        }
        links.observations.push(Observation::new(host, label));
    }

    links
}

/// Resolves `href` against the page it was found on.
///
/// Returns `Ok(None)` for links that are not crawlable web pages (fragments,
/// `mailto:`, `javascript:` and other non-http schemes) and an error when the
/// target cannot be parsed at all.
pub fn resolve_link(base: &Url, href: &str) -> Result<Option<Url>> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return Ok(None);
    }

    let mut url = base
        .join(href)
        .map_err(|e| ScanError::InvalidLink(format!("{}: {}", href, e)))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Ok(None);
    }

    url.set_fragment(None);
    Ok(Some(url))
}
