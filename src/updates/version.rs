//! Version ordering for release tags.
//!
//! Versions are dotted numeric strings with an optional `v`/`V` prefix.
//! Comparison is numeric per component, never lexical, and missing
//! trailing components count as zero. A component that is not a number is
//! read as `0` rather than rejected.

use std::cmp::Ordering;

/// Current version of llmkube.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A version decoded into its numeric components.
#[derive(Debug, Clone)]
pub struct ParsedVersion {
    components: Vec<u64>,
}

impl ParsedVersion {
    /// Parse a version string such as `v1.4.2` or `1.4`.
    ///
    /// Never fails: components that do not parse become `0`.
    pub fn parse(version: &str) -> Self {
        let stripped = version
            .strip_prefix('v')
            .or_else(|| version.strip_prefix('V'))
            .unwrap_or(version);

        let components = stripped
            .split('.')
            .map(|part| part.parse().unwrap_or(0))
            .collect();

        Self { components }
    }

    fn component(&self, index: usize) -> u64 {
        self.components.get(index).copied().unwrap_or(0)
    }
}

impl Ord for ParsedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for ParsedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Equality follows ordering, so `1.2` and `1.2.0` are equal.
impl PartialEq for ParsedVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ParsedVersion {}

/// Compare two version strings component by component.
pub fn compare(a: &str, b: &str) -> Ordering {
    ParsedVersion::parse(a).cmp(&ParsedVersion::parse(b))
}

/// Check whether `latest` is strictly newer than `current`.
pub fn is_newer(latest: &str, current: &str) -> bool {
    compare(latest, current) == Ordering::Greater
}
