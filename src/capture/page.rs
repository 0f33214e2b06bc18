//! Page metadata harvesting
//!
//! Fetches the target page and pulls out the signals the capture form is
//! pre-filled with: title, meta description, favicon, and hostname.

use crate::config::FetchConfig;
use crate::error::{Error, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Signals harvested from the page being captured
#[derive(Debug, Clone)]
pub struct PageSignals {
    pub url: String,
    pub title: String,
    pub meta_description: String,
    pub favicon: String,
    pub domain: String,
}

impl PageSignals {
    /// Signals for a page that was not (or could not be) fetched: only the
    /// URL-derived fields are populated.
    pub fn offline(url: &str) -> Result<Self> {
        let parsed = Url::parse(url)?;
        Ok(Self {
            url: url.to_string(),
            title: String::new(),
            meta_description: String::new(),
            favicon: default_favicon(&parsed),
            domain: host_of(&parsed),
        })
    }

    /// Extract signals from fetched HTML.
    pub fn from_html(url: &str, html: &str) -> Result<Self> {
        let parsed = Url::parse(url)?;
        let document = Html::parse_document(html);

        let mut title = String::new();
        if let Ok(selector) = Selector::parse("title") {
            if let Some(elem) = document.select(&selector).next() {
                title = elem.text().collect::<String>().trim().to_string();
            }
        }

        let mut meta_description = String::new();
        if let Ok(selector) = Selector::parse(r#"meta[name="description"]"#) {
            if let Some(elem) = document.select(&selector).next() {
                meta_description = elem
                    .value()
                    .attr("content")
                    .unwrap_or_default()
                    .trim()
                    .to_string();
            }
        }

        let mut favicon = None;
        if let Ok(selector) = Selector::parse(r#"link[rel="icon"], link[rel="shortcut icon"]"#) {
            if let Some(href) = document
                .select(&selector)
                .next()
                .and_then(|elem| elem.value().attr("href"))
            {
                // Relative hrefs resolve against the page URL
                favicon = parsed.join(href).ok().map(|u| u.to_string());
            }
        }

        Ok(Self {
            url: url.to_string(),
            title,
            meta_description,
            favicon: favicon.unwrap_or_else(|| default_favicon(&parsed)),
            domain: host_of(&parsed),
        })
    }
}

fn host_of(url: &Url) -> String {
    url.host_str().unwrap_or_default().to_string()
}

fn default_favicon(url: &Url) -> String {
    format!("{}://{}/favicon.ico", url.scheme(), host_of(url))
}

/// HTTP fetcher for pages being captured
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .gzip(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Fetch a page and harvest its signals.
    pub async fn fetch(&self, url: &str) -> Result<PageSignals> {
        debug!("Fetching: {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Remote {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let body = response.text().await?;
        PageSignals::from_html(url, &body)
    }
}
