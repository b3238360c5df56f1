use crate::VersError;
use std::cmp::Ordering;
use std::str::FromStr;

/// Scheme identifier string for the ecosystem-agnostic fallback
pub static GENERIC_SCHEME: &str = "generic";

#[derive(Debug, Clone)]
enum Component {
    Numeric(String),
    Alpha(String),
}

impl Component {
    fn compare(&self, other: &Component) -> Ordering {
        match (self, other) {
            (Component::Numeric(a), Component::Numeric(b)) => super::cmp_numeric(a, b),
            (Component::Numeric(_), Component::Alpha(_)) => Ordering::Greater,
            (Component::Alpha(_), Component::Numeric(_)) => Ordering::Less,
            (Component::Alpha(a), Component::Alpha(b)) => a.cmp(b),
        }
    }
}

static ZERO: Component = Component::Numeric(String::new());

/// A version in no particular ecosystem, e.g. `1.2.3`, `2024-01-15` or `5.0b3`.
///
/// The text is split into runs of ASCII digits and runs of letters; anything else separates
/// components. Components are compared pairwise with a missing component counting as `0`,
/// numbers compare by value, numbers sort above letters and letters compare case-insensitively.
/// `1.0` and `1.0.0` are therefore equal, and `1.0rc1` sorts below `1.0`.
#[derive(Debug, Clone)]
pub struct GenericVersion {
    components: Vec<Component>,
}

impl GenericVersion {
    /// Generic versions carry no stability marker.
    pub fn is_stable(&self) -> bool {
        true
    }
}

impl FromStr for GenericVersion {
    type Err = VersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut components = Vec::new();
        let mut rest = s;

        while let Some(c) = rest.chars().next() {
            if c.is_ascii_digit() {
                let len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
                components.push(Component::Numeric(
                    rest[..len].trim_start_matches('0').to_string(),
                ));
                rest = &rest[len..];
            } else if c.is_alphabetic() {
                let len = rest.find(|c: char| !c.is_alphabetic()).unwrap_or(rest.len());
                components.push(Component::Alpha(rest[..len].to_lowercase()));
                rest = &rest[len..];
            } else {
                rest = &rest[c.len_utf8()..];
            }
        }

        if components.is_empty() {
            return Err(VersError::invalid_version(
                GENERIC_SCHEME,
                s,
                "no numeric or alphabetic components",
            ));
        }
        Ok(GenericVersion { components })
    }
}

impl Ord for GenericVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (0..self.components.len().max(other.components.len()))
            .map(|i| {
                let a = self.components.get(i).unwrap_or(&ZERO);
                let b = other.components.get(i).unwrap_or(&ZERO);
                a.compare(b)
            })
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for GenericVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GenericVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GenericVersion {}
