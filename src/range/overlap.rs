use super::VersionRange;
use crate::{VersError, Version, VersionConstraint};

impl VersionRange {
    /// Whether some version may lie in both ranges.
    ///
    /// Both ranges must use the same versioning scheme.
    ///
    /// ```
    /// use vers_range::VersionRange;
    ///
    /// let a: VersionRange = "vers:generic/<1.2.1|>1.3.0".parse().unwrap();
    /// let b: VersionRange = "vers:generic/<1.2.3".parse().unwrap();
    /// assert!(a.overlaps_with(&b).unwrap());
    /// ```
    pub fn overlaps_with(&self, other: &VersionRange) -> Result<bool, VersError> {
        if self.scheme != other.scheme {
            return Err(VersError::scheme_mismatch(&self.scheme, &other.scheme));
        }
        if self.constraints.is_empty() || other.constraints.is_empty() {
            return Ok(false);
        }
        if self.is_wildcard() || other.is_wildcard() {
            return Ok(true);
        }

        if self.includes_inclusive_version_of(other)? || other.includes_inclusive_version_of(self)? {
            return Ok(true);
        }

        let (Some(ours), Some(theirs)) = (self.bounds_only()?, other.bounds_only()?) else {
            return Ok(false);
        };

        if ours.has_unbounded_end_beyond(&theirs)? || theirs.has_unbounded_end_beyond(&ours)? {
            return Ok(true);
        }

        let ours = ours.bounded_intervals()?;
        let theirs = theirs.bounded_intervals()?;
        for (lower, upper) in &ours {
            for (other_lower, other_upper) in &theirs {
                if lower.try_cmp(other_upper)?.is_lt() && other_lower.try_cmp(upper)?.is_lt() {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Whether a version this range names with `=`, `<=` or `>=` lies in `other`.
    fn includes_inclusive_version_of(&self, other: &VersionRange) -> Result<bool, VersError> {
        for constraint in &self.constraints {
            if constraint.comparator().is_inclusive() && other.contains_version(constraint.bound()?)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// This range without `=` and `!=`, simplified; `None` if nothing is left.
    fn bounds_only(&self) -> Result<Option<VersionRange>, VersError> {
        let bounds: Vec<VersionConstraint> = self
            .constraints
            .iter()
            .filter(|c| !c.comparator().is_equality())
            .cloned()
            .collect();
        if bounds.is_empty() {
            return Ok(None);
        }
        VersionRange::from_parts(self.scheme.clone(), bounds)
            .simplify()
            .map(Some)
    }

    /// Whether a leading `<` or trailing `>` of this range reaches past any bound of `other`.
    fn has_unbounded_end_beyond(&self, other: &VersionRange) -> Result<bool, VersError> {
        if let Some(first) = self.constraints.first()
            && first.comparator().is_upper_bound()
        {
            let first = first.bound()?;
            for constraint in &other.constraints {
                if first.try_cmp(constraint.bound()?)?.is_gt() {
                    return Ok(true);
                }
            }
        }

        if let Some(last) = self.constraints.last()
            && last.comparator().is_lower_bound()
        {
            let last = last.bound()?;
            for constraint in &other.constraints {
                if last.try_cmp(constraint.bound()?)?.is_lt() {
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }

    /// The `(lower, upper)` pairs left once a leading upper and a trailing lower bound are
    /// dropped.
    fn bounded_intervals(&self) -> Result<Vec<(&Version, &Version)>, VersError> {
        let mut bounds = self.constraints.as_slice();
        if let [first, rest @ ..] = bounds
            && first.comparator().is_upper_bound()
        {
            bounds = rest;
        }
        if let [rest @ .., last] = bounds
            && last.comparator().is_lower_bound()
        {
            bounds = rest;
        }

        if bounds.len() % 2 != 0 {
            return Err(VersError::invalid_range(
                self.to_string(),
                "bounds do not pair up into lower and upper limits",
            ));
        }

        bounds
            .chunks_exact(2)
            .map(|pair| Ok::<_, VersError>((pair[0].bound()?, pair[1].bound()?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn range(s: &str) -> VersionRange {
        s.parse().unwrap()
    }

    #[rstest]
    #[case("vers:generic/<1.0.0", "vers:generic/>2.0.0", false)]
    #[case("vers:generic/<1.2.1|>1.3.0", "vers:generic/<1.2.3", true)]
    #[case("vers:generic/*", "vers:generic/1.0", true)]
    #[case("vers:generic/1.0", "vers:generic/2.0", false)]
    #[case("vers:generic/1.5", "vers:generic/>1.0|<2.0", true)]
    #[case("vers:generic/>=2.0|<3.0", "vers:generic/>1.0|<2.0", false)]
    #[case("vers:generic/>=2.0|<3.0", "vers:generic/>1.0|<=2.0", true)]
    #[case("vers:generic/>1.0|<2.0", "vers:generic/>1.5|<3.0", true)]
    #[case("vers:generic/>1.0|<2.0", "vers:generic/>2.0|<3.0", false)]
    #[case("vers:generic/>1.0|<2.0|>5.0|<6.0", "vers:generic/>5.5|<5.7", true)]
    #[case("vers:generic/>1.0|<2.0|>5.0|<6.0", "vers:generic/>3.0|<4.0", false)]
    #[case("vers:generic/>5.0", "vers:generic/>1.0|<6.0", true)]
    #[case("vers:generic/>6.0", "vers:generic/>1.0|<6.0", false)]
    #[case("vers:generic/!=1.0", "vers:generic/>1.0|<6.0", false)]
    fn test_overlaps_with(#[case] a: &str, #[case] b: &str, #[case] expected: bool) {
        let (a, b) = (range(a), range(b));
        assert_eq!(a.overlaps_with(&b).unwrap(), expected, "{a} / {b}");
        assert_eq!(b.overlaps_with(&a).unwrap(), expected, "{b} / {a}");
    }

    #[test]
    fn test_overlaps_with_rejects_other_scheme() {
        assert!(matches!(
            range("vers:npm/<1.0.0").overlaps_with(&range("vers:pypi/<1.0.0")),
            Err(VersError::SchemeMismatch { .. })
        ));
    }
}
