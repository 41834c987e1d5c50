//! Best-effort text translation
//!
//! Tries free public endpoints in order and falls back to the original text when
//! none of them answer. Never fails.

use crate::config::TranslateConfig;
use anyhow::Context;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Text carrying this marker is already a translation.
const TRANSLATED_MARKER: &str = "💬";

#[derive(Debug, Clone, Copy)]
enum Provider {
    Google,
    MyMemory,
}

#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: Option<MyMemoryData>,
}

#[derive(Debug, Deserialize)]
struct MyMemoryData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Translator {
    http: reqwest::Client,
    google_url: String,
    mymemory_url: String,
    timeout: Duration,
}

impl Translator {
    const PROVIDERS: [Provider; 2] = [Provider::Google, Provider::MyMemory];

    pub fn new(cfg: &TranslateConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            http,
            google_url: cfg.google_url.clone(),
            mymemory_url: cfg.mymemory_url.clone(),
            timeout: Duration::from_secs(cfg.timeout_secs),
        })
    }

    /// Translate `text` from `source` to `target`, returning it unchanged on failure.
    pub async fn translate(&self, text: &str, target: &str, source: &str) -> String {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return String::new();
        }
        if trimmed.chars().count() < 3 || text.contains(TRANSLATED_MARKER) {
            return text.to_string();
        }

        for provider in Self::PROVIDERS {
            match self.try_provider(provider, text, target, source).await {
                Ok(Some(translated)) => return translated,
                Ok(None) => debug!(?provider, "no translation in response"),
                Err(err) => warn!(?provider, error = %err, "translation failed"),
            }
        }

        text.to_string()
    }

    async fn try_provider(
        &self,
        provider: Provider,
        text: &str,
        target: &str,
        source: &str,
    ) -> anyhow::Result<Option<String>> {
        let url = match provider {
            Provider::Google => format!(
                "{}?client=gtx&sl={}&tl={}&dt=t&q={}",
                self.google_url,
                urlencoding::encode(source),
                urlencoding::encode(target),
                urlencoding::encode(text)
            ),
            Provider::MyMemory => format!(
                "{}?q={}&langpair={}",
                self.mymemory_url,
                urlencoding::encode(text),
                urlencoding::encode(&format!("{source}|{target}"))
            ),
        };

        let response = self
            .http
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .context("send translation request")?
            .error_for_status()
            .context("translation http status")?;

        let translated = match provider {
            Provider::Google => {
                let v: serde_json::Value =
                    response.json().await.context("parse google json")?;
                parse_google(&v)
            }
            Provider::MyMemory => {
                let body: MyMemoryResponse =
                    response.json().await.context("parse mymemory json")?;
                body.response_data.and_then(|d| d.translated_text)
            }
        };
        Ok(translated.filter(|t| !t.is_empty()))
    }
}

/// Google returns `[[["translated", "original", ...], ...], ...]`.
fn parse_google(v: &serde_json::Value) -> Option<String> {
    let segments = v.get(0)?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|seg| seg.get(0)?.as_str())
        .collect();
    Some(text)
}
