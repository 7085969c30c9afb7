//! Update advisory orchestration.
//!
//! The advisor prefers a fresh cache record, falls back to one release
//! fetch, persists what it learned and prints a notice when the running
//! version is behind. Nothing in here can fail the hosting command.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use console::Style;
use serde::Serialize;
use std::io::{self, Write};

use super::cache::{CacheRecord, CacheStore};
use super::fetch::{ReleaseSource, RELEASES_PAGE_URL};
use super::install::{detect_install_method, InstallMethod};
use super::version::is_newer;

/// How long a cached release check stays valid (1 day).
const CHECK_INTERVAL_SECS: i64 = 86_400;

/// Where the latest version came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatestSource {
    /// A cache record younger than the check interval.
    Cache,
    /// A release fetch made during this check.
    Network,
}

/// Why a check produced no version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The release feed could not be reached or answered badly.
    NetworkFailure(String),
}

/// Result of resolving the latest version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// The latest version is known.
    Latest {
        version: String,
        source: LatestSource,
    },
    /// The check was skipped; the caller stays silent.
    Skipped(SkipReason),
}

/// Outcome of an explicit, cache-bypassing check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateStatus {
    /// Version that is running.
    pub current: String,
    /// Latest published version.
    pub latest: String,
    /// Whether `latest` is newer than `current`.
    pub update_available: bool,
}

/// Decides whether to tell the user about a newer release.
pub struct UpdateAdvisor<S> {
    source: S,
    cache: Option<CacheStore>,
    install: InstallMethod,
}

impl<S: ReleaseSource> UpdateAdvisor<S> {
    /// Create an advisor. Without a cache every check goes to the network.
    pub fn new(source: S, cache: Option<CacheStore>) -> Self {
        Self {
            source,
            cache,
            install: detect_install_method(),
        }
    }

    /// Override the detected install method.
    pub fn with_install_method(mut self, install: InstallMethod) -> Self {
        self.install = install;
        self
    }

    /// Check for a newer release and print an advisory to stderr.
    ///
    /// Never fails and never prints anything except the advisory.
    pub fn check_for_update(&self, current: &str) {
        let styled = console::colors_enabled_stderr();
        self.check_for_update_to(current, Utc::now(), &mut io::stderr().lock(), styled);
    }

    /// Check at `now`, writing any advisory to `out`.
    ///
    /// Returns whether an advisory was written.
    pub fn check_for_update_to(
        &self,
        current: &str,
        now: DateTime<Utc>,
        out: &mut dyn Write,
        styled: bool,
    ) -> bool {
        let latest = match self.resolve_latest(now) {
            CheckOutcome::Latest { version, .. } => version,
            CheckOutcome::Skipped(reason) => {
                tracing::debug!("Update check skipped: {:?}", reason);
                return false;
            }
        };

        if !is_newer(&latest, current) {
            tracing::debug!("llmkube {} is up to date (latest {})", current, latest);
            return false;
        }

        let notice = render_advisory(&latest, current, &self.install, styled);
        // One buffered write so the notice never interleaves mid-line.
        let written = out.write_all(notice.as_bytes()).and_then(|_| out.flush());
        if let Err(e) = written {
            tracing::debug!("Failed to write update advisory: {}", e);
            return false;
        }
        true
    }

    /// Resolve the latest version, from cache when fresh, else the network.
    pub fn resolve_latest(&self, now: DateTime<Utc>) -> CheckOutcome {
        let interval = Duration::seconds(CHECK_INTERVAL_SECS);
        if let Some(record) = self.cache.as_ref().and_then(CacheStore::read) {
            if record.is_fresh(now, interval) {
                tracing::debug!("Using cached latest version {}", record.latest_version);
                return CheckOutcome::Latest {
                    version: record.latest_version,
                    source: LatestSource::Cache,
                };
            }
        }

        match self.source.fetch_latest() {
            Ok(version) => {
                self.persist(&version, now);
                CheckOutcome::Latest {
                    version,
                    source: LatestSource::Network,
                }
            }
            Err(e) => CheckOutcome::Skipped(SkipReason::NetworkFailure(format!("{:#}", e))),
        }
    }

    /// Fetch the latest release now, ignoring any cached record.
    pub fn check_fresh(&self, current: &str, now: DateTime<Utc>) -> Result<UpdateStatus> {
        let latest = self.source.fetch_latest()?;
        self.persist(&latest, now);

        Ok(UpdateStatus {
            current: current.to_string(),
            update_available: is_newer(&latest, current),
            latest,
        })
    }

    fn persist(&self, version: &str, now: DateTime<Utc>) {
        let Some(cache) = &self.cache else {
            return;
        };
        if let Err(e) = cache.write(&CacheRecord::new(version, now)) {
            tracing::debug!("Ignoring version cache write failure: {:#}", e);
        }
    }
}

/// Build the multi-line advisory shown when `latest` is newer.
pub fn render_advisory(
    latest: &str,
    current: &str,
    install: &InstallMethod,
    styled: bool,
) -> String {
    let highlight = Style::new().bold().force_styling(styled);
    let accent = Style::new().yellow().force_styling(styled);
    let dim = Style::new().dim().force_styling(styled);

    let upgrade = match install.upgrade_hint() {
        Some(command) => format!("To upgrade, run: {}", highlight.apply_to(command)),
        None => "Download the latest release from the page below.".to_string(),
    };

    format!(
        "\n{} {} (current: {})\n{}\n{} {}\n\n",
        accent.apply_to("A new version of llmkube is available:"),
        highlight.apply_to(latest),
        current,
        upgrade,
        dim.apply_to("Release notes:"),
        RELEASES_PAGE_URL,
    )
}
