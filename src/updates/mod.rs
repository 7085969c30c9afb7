//! Update checking.
//!
//! This module provides:
//! - Version ordering for release tags
//! - A cached, once-a-day check against the latest release
//! - Install method detection for upgrade hints
//! - The advisory printed when a newer release exists

pub mod advisor;
pub mod cache;
pub mod fetch;
pub mod install;
pub mod version;

pub use advisor::{
    render_advisory, CheckOutcome, LatestSource, SkipReason, UpdateAdvisor, UpdateStatus,
};
pub use cache::{CacheRecord, CacheStore};
pub use fetch::{ReleaseFetcher, ReleaseSource, FETCH_TIMEOUT, LATEST_RELEASE_URL};
pub use install::{detect_install_method, InstallMethod};
pub use version::{compare, is_newer, ParsedVersion, VERSION};

use std::ffi::OsStr;
use std::path::PathBuf;

/// Settings for the pre-command update check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateSettings {
    /// Whether the check runs at all.
    pub enabled: bool,
    /// Latest-release endpoint to query.
    pub url: String,
    /// Cache file override; `None` uses the home directory.
    pub cache_path: Option<PathBuf>,
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            url: LATEST_RELEASE_URL.to_string(),
            cache_path: None,
        }
    }
}

impl UpdateSettings {
    /// Build an advisor for these settings.
    pub fn advisor(&self) -> anyhow::Result<UpdateAdvisor<ReleaseFetcher>> {
        let fetcher = ReleaseFetcher::with_url(&self.url, FETCH_TIMEOUT)?;
        let cache = match &self.cache_path {
            Some(path) => Some(CacheStore::new(path)),
            None => CacheStore::default_location(),
        };
        Ok(UpdateAdvisor::new(fetcher, cache))
    }
}

/// Check if running in a CI environment.
///
/// Checks common CI environment variables: `CI`, `GITHUB_ACTIONS`,
/// `GITLAB_CI`, `CIRCLECI`, `TRAVIS`, `JENKINS_URL`. Empty, `0` and
/// `false` values do not count.
pub fn is_ci() -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS", "JENKINS_URL"]
        .iter()
        .any(|var| std::env::var_os(var).is_some_and(|value| is_set(&value)))
}

fn is_set(value: &OsStr) -> bool {
    let value = value.to_string_lossy();
    let value = value.trim();
    !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false"))
}

/// Run the update advisory before a command executes.
///
/// Never fails and never blocks longer than the fetch timeout.
pub fn run_pre_command_check(settings: &UpdateSettings) {
    if !settings.enabled {
        tracing::debug!("Update check disabled");
        return;
    }

    match settings.advisor() {
        Ok(advisor) => advisor.check_for_update(VERSION),
        Err(e) => tracing::debug!("Update check unavailable: {:#}", e),
    }
}
