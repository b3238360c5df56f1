//! Version ranges in the `vers` URI form, `vers:<scheme>/<constraint>|<constraint>...`.

use crate::pairwise::pairwise;
use crate::{Comparator, VersError, Version, VersionConstraint, VersionFactory};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use tracing::trace;

pub mod builder;
mod overlap;
mod simplify;

pub use builder::VersionRangeBuilder;

/// A parsed vers range: a versioning scheme and the ordered constraints over it.
///
/// Parsing keeps constraints in the order they were written and does not validate them;
/// [`VersionRangeBuilder::build`] sorts and validates.
///
/// ```
/// use vers_range::VersionRange;
///
/// let range: VersionRange = "vers:npm/>=1.0.0|<2.0.0".parse().unwrap();
/// assert_eq!(range.versioning_scheme(), "npm");
/// assert!(range.contains("1.5.0").unwrap());
/// assert!(!range.contains("2.0.0").unwrap());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VersionRange {
    scheme: String,
    constraints: Vec<VersionConstraint>,
}

impl VersionRange {
    /// Creates a range from constraints that must all belong to `scheme`.
    pub fn new(
        scheme: impl Into<String>,
        constraints: Vec<VersionConstraint>,
    ) -> Result<Self, VersError> {
        let scheme = scheme.into().to_lowercase();
        if constraints.is_empty() {
            return Err(VersError::invalid_range(
                format!("vers:{scheme}/"),
                "a range needs at least one constraint",
            ));
        }
        if let Some(other) = constraints.iter().find(|c| c.scheme() != scheme) {
            return Err(VersError::scheme_mismatch(&scheme, other.scheme()));
        }
        Ok(VersionRange::from_parts(scheme, constraints))
    }

    pub(crate) fn from_parts(scheme: String, constraints: Vec<VersionConstraint>) -> Self {
        VersionRange {
            scheme,
            constraints,
        }
    }

    /// Starts building a validated range over `scheme`.
    pub fn builder(scheme: impl Into<String>) -> VersionRangeBuilder {
        VersionRangeBuilder::new(scheme)
    }

    pub fn versioning_scheme(&self) -> &str {
        &self.scheme
    }

    pub fn constraints(&self) -> &[VersionConstraint] {
        &self.constraints
    }

    /// Whether this is the range `*` of every version.
    pub fn is_wildcard(&self) -> bool {
        self.constraints.len() == 1 && self.constraints[0].is_wildcard()
    }

    /// Checks the ordering rules of a vers range.
    ///
    /// - `*` must be the only constraint.
    /// - Ignoring `!=`, an `=` may only be followed by `=`, `>` or `>=`.
    /// - Ignoring `=` and `!=`, lower bounds (`>`, `>=`) and upper bounds (`<`, `<=`) alternate.
    pub fn validate(&self) -> Result<(), VersError> {
        if self.constraints.len() > 1 && self.constraints.iter().any(|c| c.is_wildcard()) {
            return Err(self.invalid("the wildcard must be the only constraint of a range"));
        }

        let without_not_equal: Vec<&VersionConstraint> = self
            .constraints
            .iter()
            .filter(|c| c.comparator() != Comparator::NotEqual)
            .collect();
        for (current, next) in pairwise(without_not_equal.iter().copied()) {
            let Some(next) = next else { break };
            if current.comparator() == Comparator::Equal
                && !matches!(
                    next.comparator(),
                    Comparator::Equal | Comparator::GreaterThan | Comparator::GreaterThanOrEqual
                )
            {
                return Err(self.invalid(format!(
                    "= may only be followed by =, > or >=, got {}",
                    next.comparator()
                )));
            }
        }

        let bounds: Vec<&VersionConstraint> = without_not_equal
            .into_iter()
            .filter(|c| c.comparator() != Comparator::Equal)
            .collect();
        for (current, next) in pairwise(bounds) {
            let Some(next) = next else { break };
            if current.comparator().is_upper_bound() && !next.comparator().is_lower_bound() {
                return Err(self.invalid(format!(
                    "{} may only be followed by > or >=, got {}",
                    current.comparator(),
                    next.comparator()
                )));
            }
            if current.comparator().is_lower_bound() && !next.comparator().is_upper_bound() {
                return Err(self.invalid(format!(
                    "{} may only be followed by < or <=, got {}",
                    current.comparator(),
                    next.comparator()
                )));
            }
        }

        Ok(())
    }

    /// Whether `version`, parsed in this range's scheme, lies inside the range.
    pub fn contains(&self, version: &str) -> Result<bool, VersError> {
        let version = VersionFactory::global().version(&self.scheme, version)?;
        self.contains_version(&version)
    }

    /// Whether an already resolved `version` lies inside the range.
    pub fn contains_version(&self, version: &Version) -> Result<bool, VersError> {
        if version.scheme() != self.scheme {
            return Err(VersError::scheme_mismatch(&self.scheme, version.scheme()));
        }
        let contained = self.evaluate(version)?;
        trace!(range = %self, %version, contained, "evaluated range containment");
        Ok(contained)
    }

    fn evaluate(&self, version: &Version) -> Result<bool, VersError> {
        if let [only] = self.constraints.as_slice() {
            return only.matches(version);
        }

        for constraint in &self.constraints {
            if constraint.comparator().is_inclusive() && version.try_cmp(constraint.bound()?)?.is_eq()
            {
                return Ok(true);
            }
        }
        for constraint in &self.constraints {
            if constraint.comparator() == Comparator::NotEqual
                && version.try_cmp(constraint.bound()?)?.is_eq()
            {
                return Ok(false);
            }
        }

        let bounds: Vec<&VersionConstraint> = self
            .constraints
            .iter()
            .filter(|c| !c.comparator().is_equality())
            .collect();
        let (first, last) = match bounds.as_slice() {
            [] => return Ok(false),
            [only] => return only.matches(version),
            [first, .., last] => (*first, *last),
        };

        if first.comparator().is_upper_bound() && version.try_cmp(first.bound()?)?.is_lt() {
            return Ok(true);
        }

        for (current, next) in pairwise(bounds.iter().copied()) {
            let Some(next) = next else { break };
            if current.comparator().is_lower_bound() && next.comparator().is_upper_bound() {
                if version.try_cmp(current.bound()?)?.is_gt()
                    && version.try_cmp(next.bound()?)?.is_lt()
                {
                    return Ok(true);
                }
            } else if !(current.comparator().is_upper_bound() && next.comparator().is_lower_bound())
            {
                return Err(self.invalid("constraints are in an invalid order"));
            }
        }

        Ok(last.comparator().is_lower_bound() && version.try_cmp(last.bound()?)?.is_gt())
    }

    fn invalid(&self, reason: impl Into<String>) -> VersError {
        VersError::invalid_range(self.to_string(), reason)
    }
}

/// Stable sort by constraint version, reporting the first comparison failure.
pub(crate) fn sort_constraints(constraints: &mut [VersionConstraint]) -> Result<(), VersError> {
    let mut failure = None;
    constraints.sort_by(|a, b| {
        a.try_cmp(b).unwrap_or_else(|e| {
            failure.get_or_insert(e);
            Ordering::Equal
        })
    });
    failure.map_or(Ok(()), Err)
}

impl FromStr for VersionRange {
    type Err = VersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        trace!(range = s, "parsing vers range");
        let input = s.trim();
        if input.is_empty() {
            return Err(VersError::invalid_range(s, "a vers range must not be blank"));
        }

        let (uri_scheme, rest) = input.split_once(':').ok_or_else(|| {
            VersError::invalid_range(s, "missing ':', expected vers:<scheme>/<constraints>")
        })?;
        if uri_scheme != "vers" {
            return Err(VersError::invalid_range(
                s,
                format!("URI scheme must be \"vers\", got {uri_scheme:?}"),
            ));
        }

        let (scheme, constraints) = rest.split_once('/').ok_or_else(|| {
            VersError::invalid_range(s, "missing '/', expected vers:<scheme>/<constraints>")
        })?;
        let scheme = scheme.trim().to_lowercase();
        if scheme.is_empty() {
            return Err(VersError::invalid_range(s, "the versioning scheme must not be blank"));
        }

        let constraints = constraints.trim().trim_matches('|');
        if constraints.trim().is_empty() {
            return Err(VersError::invalid_range(s, "a range needs at least one constraint"));
        }

        let constraints = constraints
            .split('|')
            .map(|part| VersionConstraint::parse(&scheme, part))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(VersionRange::from_parts(scheme, constraints))
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vers:{}/", self.scheme.to_lowercase())?;
        for (i, constraint) in self.constraints.iter().enumerate() {
            if i > 0 {
                f.write_str("|")?;
            }
            write!(f, "{constraint}")?;
        }
        Ok(())
    }
}

impl Serialize for VersionRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for VersionRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn range(s: &str) -> VersionRange {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse() {
        let r = range("vers:npm/1.2.3|>=2.0.0|<5.0.0");
        assert_eq!(r.versioning_scheme(), "npm");
        let parsed: Vec<(Comparator, &str)> = r
            .constraints()
            .iter()
            .map(|c| (c.comparator(), c.version().unwrap().as_str()))
            .collect();
        assert_eq!(
            parsed,
            vec![
                (Comparator::Equal, "1.2.3"),
                (Comparator::GreaterThanOrEqual, "2.0.0"),
                (Comparator::LessThan, "5.0.0"),
            ]
        );
    }

    #[test]
    fn test_parse_star() {
        let r = range("vers:deb/*");
        assert!(r.is_wildcard());
        assert_eq!(r.constraints().len(), 1);
        assert_eq!(r.constraints()[0].comparator(), Comparator::Any);
        assert_eq!(r.to_string(), "vers:deb/*");
    }

    #[test]
    fn test_parse_with_spaces_and_stray_pipes() {
        let r = range(" vers:npm/| >= 1.0.0 | < 2.0.0 || ");
        assert_eq!(r.to_string(), "vers:npm/>=1.0.0|<2.0.0");
    }

    #[test]
    fn test_parse_lowercases_scheme() {
        let r = range("vers:PyPI/>=1.0");
        assert_eq!(r.versioning_scheme(), "pypi");
        assert_eq!(r.constraints()[0].version().unwrap().kind().name(), "python");
    }

    #[test]
    fn test_parse_url_encoded_version() {
        let r = range("vers:npm/1.0.0%2Bbuild.1");
        assert_eq!(r.constraints()[0].version().unwrap().as_str(), "1.0.0+build.1");
        assert_eq!(r.to_string(), "vers:npm/1.0.0%2Bbuild.1");
    }

    #[test]
    fn test_parse_unknown_scheme_keeps_scheme() {
        let r = range("vers:cargo/>=1.0|<2.0");
        assert_eq!(r.versioning_scheme(), "cargo");
        assert!(r.contains("1.5").unwrap());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("npm/1.2.3")]
    #[case("foo:npm/1.2.3")]
    #[case("vers:npm")]
    #[case("vers:/1.2.3")]
    #[case("vers:npm/")]
    #[case("vers:npm/||")]
    #[case("vers:npm/1.0.0||2.0.0")]
    #[case("vers:npm/>=")]
    fn test_parse_invalid_range(#[case] input: &str) {
        assert!(matches!(
            input.parse::<VersionRange>(),
            Err(VersError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_version() {
        assert!(matches!(
            "vers:npm/>=1.0".parse::<VersionRange>(),
            Err(VersError::InvalidVersion { .. })
        ));
    }

    #[test]
    fn test_parse_does_not_validate() {
        let r = range("vers:generic/>1.0.0|>2.0.0");
        assert!(r.validate().is_err());
    }

    #[rstest]
    #[case("vers:generic/*")]
    #[case("vers:generic/1.0")]
    #[case("vers:generic/!=1.0|!=2.0")]
    #[case("vers:generic/1.0|2.0|>=3.0")]
    #[case("vers:generic/<1.0|>2.0|<3.0|>=4.0")]
    #[case("vers:generic/>=1.0|!=1.5|<=2.0")]
    #[case("vers:maven/<0.5.1|>=1.2.3|!=3.2.1|<6.6.6")]
    fn test_validate_ok(#[case] input: &str) {
        assert_eq!(range(input).validate(), Ok(()));
    }

    #[rstest]
    #[case("vers:generic/*|1.0")]
    #[case("vers:generic/1.0|*")]
    #[case("vers:generic/>1.0.0|>2.0.0")]
    #[case("vers:generic/<1.0.0|<2.0.0")]
    #[case("vers:generic/<=1.0.0|!=1.5|<2.0.0")]
    #[case("vers:generic/1.0|<2.0")]
    #[case("vers:generic/1.0|!=1.5|<=2.0")]
    #[case("vers:generic/>=1.0|2.0|>=3.0")]
    fn test_validate_err(#[case] input: &str) {
        assert!(matches!(
            range(input).validate(),
            Err(VersError::InvalidRange { .. })
        ));
    }

    #[rstest]
    #[case("vers:generic/*", "1.0.0", true)]
    #[case("vers:generic/>1.0.0", "1.0.1", true)]
    #[case("vers:generic/>1.0.0", "1.0.0", false)]
    #[case("vers:generic/>=1.0.0", "1.0.0", true)]
    #[case("vers:generic/>=1.0.0", "1.0.1", true)]
    #[case("vers:generic/>=1.0.0", "0.9.9", false)]
    #[case("vers:generic/1.0.0", "1.0.0", true)]
    #[case("vers:generic/1.0.0", "1.0.1", false)]
    #[case("vers:generic/1.0.0", "0.9.9", false)]
    #[case("vers:generic/<=1.0.0", "1.0.0", true)]
    #[case("vers:generic/<=1.0.0", "0.9.9", true)]
    #[case("vers:generic/<=1.0.0", "1.0.1", false)]
    #[case("vers:generic/<1.0.0", "0.9.9", true)]
    #[case("vers:generic/<1.0.0", "1.0.0", false)]
    #[case("vers:generic/<1.0.0", "1.0.1", false)]
    #[case("vers:generic/>1.0.0|<2.0.0", "1.0.1", true)]
    #[case("vers:generic/>1.0.0|<2.0.0", "1.9.9", true)]
    #[case("vers:generic/>1.0.0|<2.0.0", "1.0.0", false)]
    #[case("vers:generic/>1.0.0|<2.0.0", "2.0.0", false)]
    #[case("vers:generic/>1.0.0|<2.0.0|>3.0.0|<4.0.0", "3.1.0", true)]
    #[case("vers:generic/>1.0.0|<2.0.0|>3.0.0|<4.0.0", "2.1.0", false)]
    #[case("vers:generic/>0|!=6.6.6", "1.0.0", true)]
    #[case("vers:generic/>0|!=6.6.6", "6.6.6", false)]
    #[case("vers:generic/>1.0.0|<2.0.0|>3.0.0", "0.5.0", false)]
    #[case("vers:generic/>1.0.0|<2.0.0|>3.0.0", "1.5.0", true)]
    #[case("vers:generic/>1.0.0|<2.0.0|>3.0.0", "2.5.0", false)]
    #[case("vers:generic/>1.0.0|<2.0.0|>3.0.0", "3.0.0", false)]
    #[case("vers:generic/>1.0.0|<2.0.0|>3.0.0", "3.5.0", true)]
    #[case("vers:generic/>1.0.0|<2.0.0|>=3.0.0", "3.0.0", true)]
    #[case("vers:generic/>1.0.0|<2.0.0|>=3.0.0", "3.5.0", true)]
    #[case("vers:generic/<1.0.0|>2.0.0", "0.5.0", true)]
    #[case("vers:generic/<1.0.0|>2.0.0", "1.5.0", false)]
    #[case("vers:generic/<1.0.0|>2.0.0", "2.5.0", true)]
    #[case("vers:generic/1.0|2.0", "2.0", true)]
    #[case("vers:generic/1.0|2.0", "1.5", false)]
    #[case("vers:generic/!=1.0|!=2.0", "1.5", false)]
    #[case("vers:maven/<0.5.1|>=1.2.3|!=3.2.1|<6.6.6", "3.2.1", false)]
    #[case("vers:maven/<0.5.1|>=1.2.3|!=3.2.1|<6.6.6", "6.6.6", false)]
    #[case("vers:maven/<0.5.1|>=1.2.3|!=3.2.1|<6.6.6", "6.6.5", true)]
    #[case("vers:maven/<0.5.1|>=1.2.3|!=3.2.1|<6.6.6", "0.5.0", true)]
    #[case("vers:deb/>=1.0~rc1|<1.0", "1.0~rc2", true)]
    #[case("vers:deb/>=1.0~rc1|<1.0", "1.0", false)]
    #[case("vers:rpm/>1.0", "1.0^git1", true)]
    #[case("vers:apk/>=1.0_alpha|<1.0", "1.0_beta", true)]
    #[case("vers:golang/>=v1.0.0-alpha|<v1.0.0", "v1.0.0-alpha.1", true)]
    #[case("vers:pypi/>=1.0a1|<1.0.post1", "1.0", true)]
    #[case("vers:pypi/>=1.0a1|<1.0.post1", "1.0.dev1", false)]
    #[case("vers:npm/>=1.0.0|<2.0.0|!=1.5.0", "1.5.0", false)]
    #[case("vers:npm/>=1.0.0|<2.0.0|!=1.5.0", "1.7.0", true)]
    fn test_contains(#[case] r: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(range(r).contains(version).unwrap(), expected, "{r} contains {version}");
    }

    #[test]
    fn test_contains_invalid_version() {
        assert!(matches!(
            range("vers:npm/>=1.0.0|<2.0.0").contains("invalid.version"),
            Err(VersError::InvalidVersion { .. })
        ));
    }

    #[test]
    fn test_contains_unvalidated_order_fails() {
        assert!(matches!(
            range("vers:generic/>1.0.0|>2.0.0").contains("0.5"),
            Err(VersError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_contains_version_rejects_other_scheme() {
        let v = Version::parse("pypi", "1.0").unwrap();
        assert!(matches!(
            range("vers:npm/>=1.0.0").contains_version(&v),
            Err(VersError::SchemeMismatch { .. })
        ));
    }

    #[test]
    fn test_new_checks_constraints() {
        assert!(matches!(
            VersionRange::new("npm", vec![]),
            Err(VersError::InvalidRange { .. })
        ));

        let pypi = VersionConstraint::parse("pypi", ">=1.0").unwrap();
        assert!(matches!(
            VersionRange::new("npm", vec![pypi.clone()]),
            Err(VersError::SchemeMismatch { .. })
        ));
        assert_eq!(
            VersionRange::new("pypi", vec![pypi]).unwrap().to_string(),
            "vers:pypi/>=1.0"
        );
    }

    #[rstest]
    #[case("vers:npm/*")]
    #[case("vers:npm/1.2.3")]
    #[case("vers:npm/>=1.0.0|<2.0.0")]
    #[case("vers:pypi/>0.0.0|<0.0.5|>=0.0.6|!=0.8")]
    #[case("vers:deb/>=1%3A1.0%7Erc1-1|<2.0")]
    #[case("vers:npm/>=1.0.0%2Bbuild.1|<2.0.0")]
    #[case("vers:rpm/>=1.0%5Egit1|<2.0%7Erc1")]
    #[case("vers:apk/>=1.0_alpha|<1.0-r1")]
    fn test_display_round_trip(#[case] input: &str) {
        assert_eq!(range(input).to_string(), input);
    }

    #[rstest]
    #[case("vers:deb/>=1:1.0~rc1-1|<2.0", "vers:deb/>=1%3A1.0%7Erc1-1|<2.0")]
    #[case("vers:npm/1.0.0+build.1", "vers:npm/1.0.0%2Bbuild.1")]
    fn test_display_encodes_reserved_characters(#[case] input: &str, #[case] expected: &str) {
        let rendered = range(input).to_string();
        assert_eq!(rendered, expected);
        assert_eq!(range(&rendered), range(input));
    }

    #[test]
    fn test_serde_as_string() {
        let r = range("vers:npm/>=1.0.0|<2.0.0");
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, "\"vers:npm/>=1.0.0|<2.0.0\"");
        let back: VersionRange = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);

        assert!(serde_json::from_str::<VersionRange>("\"npm/1.0.0\"").is_err());
    }
}
