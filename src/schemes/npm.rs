use crate::VersError;
use std::cmp::Ordering;
use std::str::FromStr;

/// Scheme identifier string for npm package versions
pub static NPM_SCHEME: &str = "npm";

/// Alias scheme for plain Semantic Versioning, ordered like npm.
pub static SEMVER_SCHEME: &str = "semver";

/// npm package version, a SemVer 2.0 version optionally written with a leading `v` or `=`.
///
/// Ordering follows SemVer precedence; build metadata is ignored, so `1.0.0+a` and `1.0.0+b`
/// compare equal.
#[derive(Debug, Clone)]
pub struct NpmVersion {
    inner: semver::Version,
}

impl NpmVersion {
    pub fn major(&self) -> u64 {
        self.inner.major
    }

    pub fn minor(&self) -> u64 {
        self.inner.minor
    }

    pub fn patch(&self) -> u64 {
        self.inner.patch
    }

    /// Pre-release identifiers, empty for a release.
    pub fn pre(&self) -> &str {
        self.inner.pre.as_str()
    }

    /// Build metadata, empty when absent.
    pub fn build(&self) -> &str {
        self.inner.build.as_str()
    }

    pub fn as_semver(&self) -> &semver::Version {
        &self.inner
    }

    pub fn is_stable(&self) -> bool {
        self.inner.pre.is_empty()
    }
}

impl std::fmt::Display for NpmVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.inner, f)
    }
}

impl From<semver::Version> for NpmVersion {
    fn from(inner: semver::Version) -> Self {
        NpmVersion { inner }
    }
}

impl FromStr for NpmVersion {
    type Err = VersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed
            .strip_prefix('=')
            .unwrap_or(trimmed)
            .trim_start();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);

        let inner = semver::Version::parse(trimmed)
            .map_err(|e| VersError::invalid_version(NPM_SCHEME, s, e.to_string()))?;
        Ok(NpmVersion { inner })
    }
}

impl Ord for NpmVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let a = &self.inner;
        let b = &other.inner;
        a.major
            .cmp(&b.major)
            .then(a.minor.cmp(&b.minor))
            .then(a.patch.cmp(&b.patch))
            .then_with(|| a.pre.cmp(&b.pre))
    }
}

impl PartialOrd for NpmVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NpmVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NpmVersion {}
