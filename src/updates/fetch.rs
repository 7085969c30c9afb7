//! Release feed access.
//!
//! Provides the [`ReleaseSource`] seam the advisor depends on and the
//! HTTP-backed [`ReleaseFetcher`] used in production.

use anyhow::{anyhow, bail, Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

/// Endpoint describing the latest published release.
pub const LATEST_RELEASE_URL: &str =
    "https://api.github.com/repos/defilantech/LLMKube/releases/latest";

/// Page users are sent to for release notes and downloads.
pub const RELEASES_PAGE_URL: &str = "https://github.com/defilantech/LLMKube/releases/latest";

/// Overall request timeout for a release check.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Something that can report the latest released version.
pub trait ReleaseSource {
    /// Return the tag of the latest release.
    fn fetch_latest(&self) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct LatestRelease {
    tag_name: String,
}

/// Fetches the latest release tag over HTTP.
///
/// Makes exactly one attempt per call; there is no retry.
pub struct ReleaseFetcher {
    client: Client,
    url: String,
}

impl ReleaseFetcher {
    /// Create a fetcher for a custom endpoint and timeout.
    pub fn with_url(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("llmkube/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl ReleaseSource for ReleaseFetcher {
    fn fetch_latest(&self) -> Result<String> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .with_context(|| format!("Failed to fetch {}", self.url))?;

        if !response.status().is_success() {
            bail!("HTTP {} fetching {}", response.status(), self.url);
        }

        let body = response
            .text()
            .with_context(|| format!("Failed to read response from {}", self.url))?;

        parse_tag(&body).ok_or_else(|| anyhow!("No tag_name in response from {}", self.url))
    }
}

/// Extract the release tag from a latest-release JSON document.
fn parse_tag(body: &str) -> Option<String> {
    serde_json::from_str::<LatestRelease>(body)
        .ok()
        .map(|release| release.tag_name)
}
