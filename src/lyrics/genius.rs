//! Genius lyrics client
//!
//! There is no stable public search API for lyrics, so a query is resolved by trying,
//! in order:
//! - the JSON multi-search endpoint used by the site's own frontend
//! - the HTML search results page
//! - a static catalog of known song pages
//!
//! The first strategy that leads to a page with a lyrics body wins.

use super::catalog::StaticCatalog;
use super::error::LyricsError;
use super::extract;
use super::{LyricsResult, SearchOutcome};
use crate::config::GeniusConfig;
use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::StatusCode;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use scraper::{Html, Selector};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

static DIV: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div").expect("BUG: hardcoded CSS selector 'div' is invalid"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a[href]").expect("BUG: hardcoded CSS selector 'a[href]' is invalid")
});
static SONG_CARD_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"mini_card|song_card").expect("Invalid song card regex"));
static SONG_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/songs/").expect("Invalid song path regex"));

/// Ways of turning a query into a candidate song page, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    StructuredApi,
    HtmlSearch,
    StaticCatalog,
}

impl Strategy {
    pub const ORDER: [Strategy; 3] = [
        Strategy::StructuredApi,
        Strategy::HtmlSearch,
        Strategy::StaticCatalog,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::StructuredApi => "api",
            Strategy::HtmlSearch => "html",
            Strategy::StaticCatalog => "catalog",
        }
    }
}

#[derive(Debug, Deserialize)]
struct MultiSearchResponse {
    response: MultiSearchBody,
}

#[derive(Debug, Deserialize)]
struct MultiSearchBody {
    #[serde(default)]
    sections: Vec<SearchSection>,
}

#[derive(Debug, Deserialize)]
struct SearchSection {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    result: Option<SearchHitResult>,
}

#[derive(Debug, Deserialize)]
struct SearchHitResult {
    url: Option<String>,
}

#[derive(Debug)]
struct Inner {
    http: reqwest::Client,
    base_url: Url,
    search_timeout: Duration,
    verify_timeout: Duration,
    results_per_page: u32,
    catalog: StaticCatalog,
}

/// Shared lyrics client. Cloning is cheap; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct GeniusClient {
    inner: Arc<Inner>,
}

impl GeniusClient {
    pub fn new(cfg: &GeniusConfig, catalog: StaticCatalog) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&cfg.user_agent).context("invalid user agent")?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&cfg.accept_language).context("invalid accept language")?,
        );
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("build reqwest client")?;

        let base_url = Url::parse(&cfg.base_url)
            .with_context(|| format!("parse base url {}", cfg.base_url))?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url,
                search_timeout: Duration::from_secs(cfg.search_timeout_secs),
                verify_timeout: Duration::from_secs(cfg.verify_timeout_secs),
                results_per_page: cfg.results_per_page,
                catalog,
            }),
        })
    }

    pub fn catalog(&self) -> &StaticCatalog {
        &self.inner.catalog
    }

    /// Find lyrics for a free-text query. The query must not be blank.
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let query = query.trim();
        info!(query, "searching lyrics");

        // A located page that fails to yield lyrics is a better answer than "not found".
        let mut last_error = None;

        for strategy in Strategy::ORDER {
            let candidate = match self.find_candidate(strategy, query).await {
                Ok(Some(url)) => url,
                Ok(None) => {
                    debug!(strategy = strategy.name(), "no candidate");
                    continue;
                }
                Err(err) => {
                    warn!(strategy = strategy.name(), error = %err, "strategy failed");
                    continue;
                }
            };

            info!(strategy = strategy.name(), url = %candidate, "candidate found");
            match self.fetch_lyrics(&candidate).await {
                Ok(result) => return SearchOutcome::Found(result),
                Err(err) => {
                    warn!(strategy = strategy.name(), url = %candidate, error = %err, "candidate rejected");
                    last_error = Some(err);
                }
            }
        }

        SearchOutcome::Missing(last_error.unwrap_or(LyricsError::NotFound))
    }

    /// Fetch a song page and extract its lyrics.
    pub async fn fetch_lyrics(&self, url: &str) -> Result<LyricsResult, LyricsError> {
        let html = self.fetch_page(url).await?;
        let extracted = extract::parse_song_page(&html).ok_or(LyricsError::ExtractionFailed)?;
        Ok(LyricsResult {
            title: extracted.title,
            lyrics: extracted.lyrics,
            url: url.to_string(),
        })
    }

    pub async fn fetch_page(&self, url: &str) -> Result<String, LyricsError> {
        let response = self.get(url, self.inner.search_timeout).await?;
        let status = response.status();
        debug!(url, status = status.as_u16(), "song page response");
        if status != StatusCode::OK {
            return Err(LyricsError::UpstreamUnavailable {
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }

    async fn find_candidate(
        &self,
        strategy: Strategy,
        query: &str,
    ) -> Result<Option<String>, LyricsError> {
        match strategy {
            Strategy::StructuredApi => self.search_via_api(query).await,
            Strategy::HtmlSearch => self.search_via_html(query).await,
            Strategy::StaticCatalog => self.search_via_catalog(query).await,
        }
    }

    async fn search_via_api(&self, query: &str) -> Result<Option<String>, LyricsError> {
        let url = format!(
            "{}/api/search/multi?per_page={}&q={}",
            self.origin(),
            self.inner.results_per_page,
            urlencoding::encode(query)
        );

        let response = self.get(&url, self.inner.search_timeout).await?;
        if response.status() != StatusCode::OK {
            debug!(status = response.status().as_u16(), "search api unavailable");
            return Ok(None);
        }

        let body: MultiSearchResponse = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                debug!(error = %err, "search api returned unexpected json");
                return Ok(None);
            }
        };

        Ok(first_song_hit(&body).and_then(|u| self.resolve(u)))
    }

    async fn search_via_html(&self, query: &str) -> Result<Option<String>, LyricsError> {
        let url = format!("{}/search?q={}", self.origin(), urlencoding::encode(query));

        let response = self.get(&url, self.inner.search_timeout).await?;
        if response.status() != StatusCode::OK {
            debug!(status = response.status().as_u16(), "search page unavailable");
            return Ok(None);
        }

        let html = response.text().await?;
        let links = collect_song_links(&html);
        debug!(count = links.len(), "song links on search page");
        Ok(links.first().and_then(|href| self.resolve(href)))
    }

    async fn search_via_catalog(&self, query: &str) -> Result<Option<String>, LyricsError> {
        for entry in self.inner.catalog.matches(query) {
            let Some(url) = self.resolve(&entry.path) else {
                warn!(path = %entry.path, "unusable catalog path");
                continue;
            };

            match self.get(&url, self.inner.verify_timeout).await {
                Ok(response) if response.status() == StatusCode::OK => return Ok(Some(url)),
                Ok(response) => {
                    debug!(url = %url, status = response.status().as_u16(), "catalog page missing");
                }
                Err(err) => {
                    debug!(url = %url, error = %err, "catalog page check failed");
                }
            }
        }
        Ok(None)
    }

    async fn get(&self, url: &str, timeout: Duration) -> reqwest::Result<reqwest::Response> {
        self.inner.http.get(url).timeout(timeout).send().await
    }

    fn origin(&self) -> &str {
        self.inner.base_url.as_str().trim_end_matches('/')
    }

    /// Absolute URL for a site-relative or absolute link.
    fn resolve(&self, href: &str) -> Option<String> {
        self.inner.base_url.join(href).ok().map(String::from)
    }
}

/// URL of the first hit in the first `song` section.
fn first_song_hit(body: &MultiSearchResponse) -> Option<&str> {
    body.response
        .sections
        .iter()
        .find(|s| s.kind.as_deref() == Some("song"))?
        .hits
        .iter()
        .find_map(|h| h.result.as_ref()?.url.as_deref())
}

/// Song page links on a search results page.
///
/// Links inside result cards come first; any other `/songs/` link in the document
/// is appended if not already present.
pub(crate) fn collect_song_links(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let mut links: Vec<String> = Vec::new();

    let cards = doc.select(&DIV).filter(|el| {
        el.value()
            .classes()
            .any(|class| SONG_CARD_CLASS.is_match(class))
    });
    for card in cards {
        let href = card
            .select(&ANCHOR)
            .filter_map(|a| a.value().attr("href"))
            .find(|href| SONG_PATH.is_match(href));
        if let Some(href) = href
            && !links.iter().any(|l| l == href)
        {
            links.push(href.to_string());
        }
    }

    for href in doc.select(&ANCHOR).filter_map(|a| a.value().attr("href")) {
        if SONG_PATH.is_match(href) && !links.iter().any(|l| l == href) {
            links.push(href.to_string());
        }
    }

    links
}
