use super::{VersionRange, sort_constraints};
use crate::{Comparator, VersError, Version, VersionConstraint};

/// Collects constraints for a range, then sorts and validates them.
///
/// Adding a constraint never fails on the spot. The first error is kept and returned by
/// [`build`](Self::build), so callers translating advisory data can chain calls freely and
/// decide once whether to abort or, through [`maybe_build`](Self::maybe_build), skip the
/// input.
///
/// ```
/// use vers_range::{Comparator, VersionRange};
///
/// let range = VersionRange::builder("maven")
///     .with_constraint(Comparator::LessThan, "6.6.6")
///     .with_constraint(Comparator::GreaterThanOrEqual, "1.2.3")
///     .with_constraint(Comparator::NotEqual, "3.2.1")
///     .with_constraint_str("< 0.5.1")
///     .build()
///     .unwrap();
/// assert_eq!(range.to_string(), "vers:maven/<0.5.1|>=1.2.3|!=3.2.1|<6.6.6");
/// ```
#[derive(Debug, Clone)]
pub struct VersionRangeBuilder {
    scheme: String,
    constraints: Vec<VersionConstraint>,
    error: Option<VersError>,
}

impl VersionRangeBuilder {
    pub fn new(scheme: impl Into<String>) -> Self {
        VersionRangeBuilder {
            scheme: scheme.into().to_lowercase(),
            constraints: Vec::new(),
            error: None,
        }
    }

    fn push(mut self, constraint: Result<VersionConstraint, VersError>) -> Self {
        match constraint {
            Ok(constraint) => self.constraints.push(constraint),
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    /// Adds `comparator` applied to `version`, parsed in the builder's scheme.
    pub fn with_constraint(self, comparator: Comparator, version: &str) -> Self {
        let constraint = Version::parse(&self.scheme, version)
            .and_then(|version| VersionConstraint::new(comparator, version));
        self.push(constraint)
    }

    /// Adds a constraint written as in a vers string, e.g. `>=1.0.0` or `< 0.5.1`.
    pub fn with_constraint_str(self, constraint: &str) -> Self {
        let constraint = VersionConstraint::parse(&self.scheme, constraint);
        self.push(constraint)
    }

    pub fn with_version_constraint(self, constraint: VersionConstraint) -> Self {
        self.push(Ok(constraint))
    }

    pub fn with_wildcard(self) -> Self {
        let constraint = VersionConstraint::wildcard(self.scheme.clone());
        self.push(Ok(constraint))
    }

    /// Whether any constraint was added successfully.
    pub fn has_constraints(&self) -> bool {
        !self.constraints.is_empty()
    }

    /// Sorts the constraints by version and validates the result.
    pub fn build(self) -> Result<VersionRange, VersError> {
        if let Some(e) = self.error {
            return Err(e);
        }

        let mut range = VersionRange::new(self.scheme, self.constraints)?;
        sort_constraints(&mut range.constraints)?;
        range.validate()?;
        Ok(range)
    }

    /// Like [`build`](Self::build), discarding the error.
    pub fn maybe_build(self) -> Option<VersionRange> {
        self.build().ok()
    }
}
