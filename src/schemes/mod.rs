//! Versions and the per-scheme comparators that order them.
//!
//! Every supported versioning scheme has its own module with a version type that parses the
//! scheme's grammar and implements [`Ord`] according to the scheme's published algorithm.
//! [`Version`] ties one of those values to the scheme token it was resolved for.

use crate::{VersError, VersionFactory};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

pub mod apk;
pub mod deb;
pub mod generic;
pub mod golang;
pub mod maven;
pub mod npm;
pub mod pypi;
pub mod rpm;

pub use apk::{APK_SCHEME, AlpineVersion};
pub use deb::{DEB_SCHEME, DebVersion};
pub use generic::{GENERIC_SCHEME, GenericVersion};
pub use golang::{GOLANG_SCHEME, GoVersion};
pub use maven::{MAVEN_SCHEME, MavenVersion};
pub use npm::{NPM_SCHEME, NpmVersion, SEMVER_SCHEME};
pub use pypi::{PYPI_SCHEME, PythonVersion};
pub use rpm::{RPM_SCHEME, RpmVersion};

/// The comparator implementation backing a [`Version`].
#[derive(Debug, Clone)]
pub enum VersionKind {
    Alpine(AlpineVersion),
    Deb(DebVersion),
    Generic(GenericVersion),
    Go(GoVersion),
    Maven(MavenVersion),
    Npm(NpmVersion),
    Python(PythonVersion),
    Rpm(RpmVersion),
}

impl VersionKind {
    /// Name of the comparator implementation.
    pub fn name(&self) -> &'static str {
        match self {
            VersionKind::Alpine(_) => "alpine",
            VersionKind::Deb(_) => "debian",
            VersionKind::Generic(_) => "generic",
            VersionKind::Go(_) => "go",
            VersionKind::Maven(_) => "maven",
            VersionKind::Npm(_) => "npm",
            VersionKind::Python(_) => "python",
            VersionKind::Rpm(_) => "rpm",
        }
    }

    pub fn is_stable(&self) -> bool {
        match self {
            VersionKind::Alpine(v) => v.is_stable(),
            VersionKind::Deb(v) => v.is_stable(),
            VersionKind::Generic(v) => v.is_stable(),
            VersionKind::Go(v) => v.is_stable(),
            VersionKind::Maven(v) => v.is_stable(),
            VersionKind::Npm(v) => v.is_stable(),
            VersionKind::Python(v) => v.is_stable(),
            VersionKind::Rpm(v) => v.is_stable(),
        }
    }

    /// Orders two values of the same implementation; `None` when the implementations differ.
    fn compare(&self, other: &VersionKind) -> Option<Ordering> {
        match (self, other) {
            (VersionKind::Alpine(a), VersionKind::Alpine(b)) => Some(a.cmp(b)),
            (VersionKind::Deb(a), VersionKind::Deb(b)) => Some(a.cmp(b)),
            (VersionKind::Generic(a), VersionKind::Generic(b)) => Some(a.cmp(b)),
            (VersionKind::Go(a), VersionKind::Go(b)) => Some(a.cmp(b)),
            (VersionKind::Maven(a), VersionKind::Maven(b)) => Some(a.cmp(b)),
            (VersionKind::Npm(a), VersionKind::Npm(b)) => Some(a.cmp(b)),
            (VersionKind::Python(a), VersionKind::Python(b)) => Some(a.cmp(b)),
            (VersionKind::Rpm(a), VersionKind::Rpm(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

/// A version of a package, resolved for a versioning scheme.
///
/// The original text is kept verbatim for rendering. Two versions are equal when they share a
/// scheme and their comparator orders them as equal, so `1.0` and `1.0.0` may be equal under
/// one scheme and distinct under another.
#[derive(Debug, Clone)]
pub struct Version {
    scheme: String,
    original: String,
    kind: VersionKind,
}

impl Version {
    pub fn new(scheme: impl Into<String>, original: impl Into<String>, kind: VersionKind) -> Self {
        Version {
            scheme: scheme.into(),
            original: original.into(),
            kind,
        }
    }

    /// Resolves `version` for `scheme` through the global [`VersionFactory`].
    ///
    /// ```
    /// use vers_range::Version;
    ///
    /// let a = Version::parse("deb", "1.0~rc1").unwrap();
    /// let b = Version::parse("deb", "1.0").unwrap();
    /// assert!(a < b);
    /// ```
    pub fn parse(scheme: &str, version: &str) -> Result<Self, VersError> {
        VersionFactory::global().version(scheme, version)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }

    pub fn kind(&self) -> &VersionKind {
        &self.kind
    }

    /// Whether this is a stable release by the conventions of its scheme.
    pub fn is_stable(&self) -> bool {
        self.kind.is_stable()
    }

    /// Orders two versions of the same scheme.
    ///
    /// Fails with [`VersError::SchemeMismatch`] if the schemes differ or if the versions were
    /// created by different comparator implementations.
    pub fn try_cmp(&self, other: &Version) -> Result<Ordering, VersError> {
        if self.scheme != other.scheme {
            return Err(VersError::scheme_mismatch(&self.scheme, &other.scheme));
        }
        self.kind.compare(&other.kind).ok_or_else(|| {
            VersError::scheme_mismatch(
                &format!("{} ({})", self.scheme, self.kind.name()),
                &format!("{} ({})", other.scheme, other.kind.name()),
            )
        })
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        matches!(self.try_cmp(other), Ok(Ordering::Equal))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.original)
    }
}

/// Compares two runs of ASCII digits by numeric value without parsing them into integers.
pub(crate) fn cmp_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
