//! HTTP fetch + pattern extraction slip source
//!
//! Issues a plain GET against the platform's booking-lookup endpoint and
//! recovers "home vs away" pairs from the raw body. Markets, picks and odds
//! are left as placeholders.

use super::html::extract_fixtures;
use super::{EndpointTemplates, FetchError, NotFound, SlipSource};
use crate::models::{Leg, Platform, Slip};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

const USER_AGENT: &str = "Mozilla/5.0 (compatible; slipbridge/0.1)";

#[derive(Debug, Clone)]
pub struct PatternSlipSource {
    client: Client,
    lookup_urls: EndpointTemplates,
    timeout: Duration,
}

impl PatternSlipSource {
    pub fn new(lookup_urls: EndpointTemplates, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            lookup_urls,
            timeout,
        })
    }

    async fn fetch(&self, platform: Platform, code: &str) -> Result<Slip, FetchError> {
        let url = self.lookup_urls.url_for(platform, code)?;
        debug!("Fetching booking lookup {}", url);

        let body = tokio::time::timeout(self.timeout, self.fetch_body(&url))
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))??;

        let legs: Vec<Leg> = extract_fixtures(&body)
            .iter()
            .map(|(home, away)| Leg::fixture_only(home, away))
            .collect();

        if legs.is_empty() {
            return Err(FetchError::NoMatches);
        }

        info!(
            "Extracted {} fixtures for {} on {}",
            legs.len(),
            code,
            platform
        );
        Ok(Slip::new(legs))
    }

    async fn fetch_body(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        Ok(resp.text().await?)
    }
}

#[async_trait]
impl SlipSource for PatternSlipSource {
    async fn resolve(&self, platform: Platform, code: &str) -> Result<Slip, NotFound> {
        self.fetch(platform, code)
            .await
            .map_err(|e| e.collapse(self.source_name(), platform, code))
    }

    fn supports(&self, platform: Platform) -> bool {
        self.lookup_urls.has(platform)
    }

    fn source_name(&self) -> &str {
        "pattern"
    }
}
