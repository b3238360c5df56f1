use crate::VersError;
use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Comparison operator of a version constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Comparator {
    #[display("=")]
    Equal,
    #[display("!=")]
    NotEqual,
    #[display("<")]
    LessThan,
    #[display("<=")]
    LessThanOrEqual,
    #[display(">")]
    GreaterThan,
    #[display(">=")]
    GreaterThanOrEqual,
    #[display("*")]
    Any,
}

/// Operator prefixes in match order; two-character glyphs come first so `<=` is not read as `<`.
const PREFIXES: [(&str, Comparator); 5] = [
    ("<=", Comparator::LessThanOrEqual),
    (">=", Comparator::GreaterThanOrEqual),
    ("!=", Comparator::NotEqual),
    ("<", Comparator::LessThan),
    (">", Comparator::GreaterThan),
];

impl Comparator {
    /// The operator glyph as written in a vers string.
    pub fn operator(&self) -> &'static str {
        match self {
            Comparator::Equal => "=",
            Comparator::NotEqual => "!=",
            Comparator::LessThan => "<",
            Comparator::LessThanOrEqual => "<=",
            Comparator::GreaterThan => ">",
            Comparator::GreaterThanOrEqual => ">=",
            Comparator::Any => "*",
        }
    }

    /// Splits a leading operator off a constraint string.
    ///
    /// Text without a recognised operator is an equality constraint and is returned unchanged.
    pub fn split_prefix(s: &str) -> (Comparator, &str) {
        PREFIXES
            .iter()
            .find_map(|&(prefix, comparator)| s.strip_prefix(prefix).map(|rest| (comparator, rest)))
            .unwrap_or((Comparator::Equal, s))
    }

    /// `<` or `<=`.
    pub fn is_upper_bound(&self) -> bool {
        matches!(self, Comparator::LessThan | Comparator::LessThanOrEqual)
    }

    /// `>` or `>=`.
    pub fn is_lower_bound(&self) -> bool {
        matches!(self, Comparator::GreaterThan | Comparator::GreaterThanOrEqual)
    }

    /// `=` or `!=`.
    pub fn is_equality(&self) -> bool {
        matches!(self, Comparator::Equal | Comparator::NotEqual)
    }

    /// `=`, `<=` or `>=`: operators that accept their own version.
    pub fn is_inclusive(&self) -> bool {
        matches!(
            self,
            Comparator::Equal | Comparator::LessThanOrEqual | Comparator::GreaterThanOrEqual
        )
    }
}

impl FromStr for Comparator {
    type Err = VersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(Comparator::Equal),
            "!=" => Ok(Comparator::NotEqual),
            "<" => Ok(Comparator::LessThan),
            "<=" => Ok(Comparator::LessThanOrEqual),
            ">" => Ok(Comparator::GreaterThan),
            ">=" => Ok(Comparator::GreaterThanOrEqual),
            "*" => Ok(Comparator::Any),
            _ => Err(VersError::invalid_range(
                s,
                "unknown comparator, expected one of =, !=, <, <=, >, >=, *",
            )),
        }
    }
}

impl Serialize for Comparator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.operator())
    }
}

impl<'de> Deserialize<'de> for Comparator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
