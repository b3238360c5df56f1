use super::{VersionRange, sort_constraints};
use crate::{Comparator, VersError, VersionConstraint};

fn is_lower(comparator: Comparator) -> bool {
    comparator.is_lower_bound()
}

fn is_lower_or_equal(comparator: Comparator) -> bool {
    comparator == Comparator::Equal || comparator.is_lower_bound()
}

fn is_upper(comparator: Comparator) -> bool {
    comparator.is_upper_bound()
}

fn is_upper_or_equal(comparator: Comparator) -> bool {
    comparator == Comparator::Equal || comparator.is_upper_bound()
}

/// One scan over `constraints`, removing those made redundant by a neighbour.
fn drop_redundant(constraints: &mut Vec<VersionConstraint>) {
    let mut current = 0;
    while current + 1 < constraints.len() {
        let next = current + 1;
        // Rules below keep testing these even after a removal shifted the list.
        let current_comparator = constraints[current].comparator();
        let next_comparator = constraints[next].comparator();

        // `>` then `>`, `>=` or `=`: the later constraint adds nothing.
        if is_lower(current_comparator) && is_lower_or_equal(next_comparator) {
            constraints.remove(next);
        }

        // `<`, `<=` or `=` then `<`: the earlier constraint adds nothing.
        if is_upper_or_equal(current_comparator) && is_upper(next_comparator) {
            constraints.remove(current);
            current = current.saturating_sub(1);
        }

        if current > 0 {
            let previous_comparator = constraints[current - 1].comparator();
            if is_lower(previous_comparator) && is_lower_or_equal(current_comparator) {
                constraints.remove(current);
            }
            if is_upper_or_equal(previous_comparator) && is_upper(current_comparator) {
                constraints.remove(current - 1);
            }
        }

        current += 1;
    }
}

impl VersionRange {
    /// Removes constraints made redundant by their neighbours.
    ///
    /// Expects the constraints sorted by version, as the builder leaves them. The neighbour scan
    /// is repeated until it removes nothing, so simplifying the result again leaves it
    /// unchanged. The result is sorted and free of duplicates.
    ///
    /// ```
    /// use vers_range::VersionRange;
    ///
    /// let range: VersionRange = "vers:pypi/>0.0.0|>=0.0.1|0.0.2|<0.0.3|0.0.4|<0.0.5|>=0.0.6"
    ///     .parse()
    ///     .unwrap();
    /// assert_eq!(range.simplify().unwrap().to_string(), "vers:pypi/>0.0.0|<0.0.5|>=0.0.6");
    /// ```
    pub fn simplify(&self) -> Result<VersionRange, VersError> {
        if self.constraints.len() < 2 {
            return Ok(self.clone());
        }

        let (not_equal, remainder): (Vec<VersionConstraint>, Vec<VersionConstraint>) = self
            .constraints
            .iter()
            .cloned()
            .partition(|c| c.comparator() == Comparator::NotEqual);
        if remainder.is_empty() {
            return Ok(VersionRange::from_parts(self.scheme.clone(), not_equal));
        }

        let mut unique: Vec<VersionConstraint> = Vec::with_capacity(remainder.len());
        for constraint in remainder {
            if !unique.contains(&constraint) {
                unique.push(constraint);
            }
        }
        let mut remainder = unique;
        loop {
            let before = remainder.len();
            drop_redundant(&mut remainder);
            if remainder.len() == before {
                break;
            }
        }

        let mut simplified: Vec<VersionConstraint> = Vec::with_capacity(remainder.len());
        for constraint in remainder.into_iter().chain(not_equal) {
            if !simplified.contains(&constraint) {
                simplified.push(constraint);
            }
        }
        sort_constraints(&mut simplified)?;

        Ok(VersionRange::from_parts(self.scheme.clone(), simplified))
    }

    /// Splits the simplified range into ranges of at most one lower and one upper bound.
    ///
    /// Each `=` and `!=` constraint becomes a range of its own. Consecutive bounds are paired
    /// up; a trailing unpaired bound forms a single-constraint range.
    pub fn split(&self) -> Result<Vec<VersionRange>, VersError> {
        let simplified = self.simplify()?;
        let mut ranges = Vec::new();
        let mut pair = Vec::with_capacity(2);

        for constraint in simplified.constraints {
            if constraint.comparator().is_equality() {
                ranges.push(VersionRange::from_parts(self.scheme.clone(), vec![constraint]));
            } else {
                pair.push(constraint);
            }
            if pair.len() == 2 {
                ranges.push(VersionRange::from_parts(
                    self.scheme.clone(),
                    std::mem::take(&mut pair),
                ));
            }
        }
        if !pair.is_empty() {
            ranges.push(VersionRange::from_parts(self.scheme.clone(), pair));
        }

        Ok(ranges)
    }
}
