use crate::{Comparator, VersError, Version, VersionFactory};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;

/// Characters escaped when a version is written into a vers string: everything except ASCII
/// letters, digits and `.-_*`, the set `application/x-www-form-urlencoded` leaves alone.
const VERSION_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'_')
    .remove(b'*');

/// A single comparator and version pair of a version range, such as `>=1.2.3`.
///
/// Every comparator except [`Comparator::Any`] carries a version; the wildcard never does.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VersionConstraint {
    #[serde(skip)]
    scheme: String,
    comparator: Comparator,
    version: Option<Version>,
}

impl VersionConstraint {
    /// Creates a constraint on `version`, in the scheme of that version.
    pub fn new(comparator: Comparator, version: Version) -> Result<Self, VersError> {
        if comparator == Comparator::Any {
            return Err(VersError::invalid_range(
                format!("*{version}"),
                "the wildcard comparator does not take a version",
            ));
        }
        Ok(VersionConstraint {
            scheme: version.scheme().to_string(),
            comparator,
            version: Some(version),
        })
    }

    /// The `*` constraint, matching every version of `scheme`.
    pub fn wildcard(scheme: impl Into<String>) -> Self {
        VersionConstraint {
            scheme: scheme.into(),
            comparator: Comparator::Any,
            version: None,
        }
    }

    /// Parses one `|`-separated segment of a vers string, e.g. `>=1.0.0` or `2.0%2B1`.
    pub fn parse(scheme: &str, s: &str) -> Result<Self, VersError> {
        let s = s.trim();
        if s == "*" {
            return Ok(VersionConstraint::wildcard(scheme));
        }

        let (comparator, rest) = Comparator::split_prefix(s);
        let rest = rest.trim();
        if rest.is_empty() {
            return Err(VersError::invalid_range(
                s,
                format!("comparator {comparator} requires a version"),
            ));
        }

        let version = if rest.contains('%') {
            let decoded = percent_decode_str(rest)
                .decode_utf8()
                .map_err(|e| VersError::invalid_version(scheme, rest, e.to_string()))?;
            VersionFactory::global().version(scheme, &decoded)?
        } else {
            VersionFactory::global().version(scheme, rest)?
        };

        VersionConstraint::new(comparator, version)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    /// The constrained version, `None` for the wildcard.
    pub fn version(&self) -> Option<&Version> {
        self.version.as_ref()
    }

    pub fn is_wildcard(&self) -> bool {
        self.comparator == Comparator::Any
    }

    /// Whether `version` satisfies this constraint on its own.
    pub fn matches(&self, version: &Version) -> Result<bool, VersError> {
        if self.scheme != version.scheme() {
            return Err(VersError::scheme_mismatch(&self.scheme, version.scheme()));
        }
        let Some(own) = &self.version else {
            return Ok(true);
        };

        let ordering = version.try_cmp(own)?;
        Ok(match self.comparator {
            Comparator::LessThan => ordering.is_lt(),
            Comparator::LessThanOrEqual => ordering.is_le(),
            Comparator::GreaterThan => ordering.is_gt(),
            Comparator::GreaterThanOrEqual => ordering.is_ge(),
            Comparator::Equal => ordering.is_eq(),
            Comparator::NotEqual => ordering.is_ne(),
            Comparator::Any => true,
        })
    }

    /// Orders constraints by their versions; a wildcard sorts before any version.
    pub fn try_cmp(&self, other: &VersionConstraint) -> Result<Ordering, VersError> {
        match (&self.version, &other.version) {
            (Some(a), Some(b)) => a.try_cmp(b),
            (None, None) => Ok(Ordering::Equal),
            (None, Some(_)) => Ok(Ordering::Less),
            (Some(_), None) => Ok(Ordering::Greater),
        }
    }

    /// Version of a bound or equality constraint, for algorithms that have already ruled out
    /// the wildcard.
    pub(crate) fn bound(&self) -> Result<&Version, VersError> {
        self.version.as_ref().ok_or_else(|| {
            VersError::invalid_range("*", "the wildcard must be the only constraint of a range")
        })
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(version) = &self.version else {
            return f.write_str(Comparator::Any.operator());
        };
        if self.comparator != Comparator::Equal {
            f.write_str(self.comparator.operator())?;
        }
        write!(f, "{}", utf8_percent_encode(version.as_str(), VERSION_ENCODE_SET))
    }
}
