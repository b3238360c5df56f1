use crate::VersError;
use std::cmp::Ordering;
use std::str::FromStr;

pub static DEB_SCHEME: &str = "deb";

/// A dpkg version, `[epoch:]upstream[-revision]`.
///
/// Ordering follows `deb-version(5)`: the epoch numerically, then upstream and revision by
/// alternating non-digit and digit runs. In non-digit runs `~` sorts before everything,
/// including the end of the run, and letters sort before other characters. A missing revision
/// compares as `0`.
///
/// See <https://manpages.debian.org/stretch/dpkg-dev/deb-version.5.en.html>.
#[derive(Clone, Debug)]
pub struct DebVersion {
    epoch: u64,
    upstream: String,
    revision: String,
}

impl DebVersion {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn upstream(&self) -> &str {
        &self.upstream
    }

    /// The Debian revision, empty when absent.
    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// Stability is decided by the distribution and its repositories, not by the version string.
    pub fn is_stable(&self) -> bool {
        true
    }

    fn revision_or_zero(&self) -> &str {
        if self.revision.is_empty() {
            "0"
        } else {
            &self.revision
        }
    }
}

impl std::fmt::Display for DebVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.epoch, self.revision.is_empty()) {
            (0, true) => f.write_str(&self.upstream),
            (0, false) => write!(f, "{}-{}", self.upstream, self.revision),
            (epoch, true) => write!(f, "{epoch}:{}", self.upstream),
            (epoch, false) => write!(f, "{epoch}:{}-{}", self.upstream, self.revision),
        }
    }
}

fn upstream_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-' | '~')
}

fn revision_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '~')
}

impl FromStr for DebVersion {
    type Err = VersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: String| VersError::invalid_version(DEB_SCHEME, s, reason);

        let (epoch, rest) = match s.split_once(':') {
            None => (0, s),
            Some((epoch, rest)) => {
                let epoch = epoch
                    .parse::<u64>()
                    .map_err(|e| invalid(format!("epoch {epoch:?} is not a number: {e}")))?;
                (epoch, rest)
            }
        };

        // The revision starts after the last hyphen, so the upstream part may contain hyphens.
        let (upstream, revision) = match rest.rsplit_once('-') {
            Some((_, "")) => return Err(invalid("revision after '-' is empty".into())),
            Some(split) => split,
            None => (rest, ""),
        };

        if !upstream.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(invalid(
                "upstream version must start with a digit, expected [epoch:]upstream[-revision]"
                    .into(),
            ));
        }
        if let Some(c) = upstream.chars().find(|&c| !upstream_char(c)) {
            return Err(invalid(format!("'{c}' is not allowed in the upstream version")));
        }
        if let Some(c) = revision.chars().find(|&c| !revision_char(c)) {
            return Err(invalid(format!("'{c}' is not allowed in the revision")));
        }

        Ok(DebVersion {
            epoch,
            upstream: upstream.to_string(),
            revision: revision.to_string(),
        })
    }
}

impl Ord for DebVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| compare_part(&self.upstream, &other.upstream))
            .then_with(|| compare_part(self.revision_or_zero(), other.revision_or_zero()))
    }
}

impl PartialOrd for DebVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for DebVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for DebVersion {}

/// dpkg's `verrevcmp` over one upstream version or revision.
fn compare_part(mut a: &str, mut b: &str) -> Ordering {
    while !a.is_empty() || !b.is_empty() {
        let ord = compare_letters(&mut a, &mut b).then_with(|| compare_digits(&mut a, &mut b));
        if ord.is_ne() {
            return ord;
        }
    }
    Ordering::Equal
}

/// Weight of a non-digit character, `None` standing for the end of the run.
///
/// `~` < end < letters < anything else.
fn char_order(c: Option<char>) -> i64 {
    match c {
        Some('~') => -1,
        None => 0,
        Some(c) if c.is_ascii_alphabetic() => c as i64,
        Some(c) => c as i64 + 256,
    }
}

/// Consumes the leading non-digit runs of `a` and `b` while they agree.
fn compare_letters(a: &mut &str, b: &mut &str) -> Ordering {
    loop {
        let ca = a.chars().next().filter(|c| !c.is_ascii_digit());
        let cb = b.chars().next().filter(|c| !c.is_ascii_digit());
        let Some(c) = ca.or(cb) else {
            return Ordering::Equal;
        };

        let ord = char_order(ca).cmp(&char_order(cb));
        if ord.is_ne() {
            return ord;
        }
        *a = &a[c.len_utf8()..];
        *b = &b[c.len_utf8()..];
    }
}

/// Consumes the leading digit runs of `a` and `b`, comparing them as numbers.
fn compare_digits(a: &mut &str, b: &mut &str) -> Ordering {
    let digits = |s: &str| s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (a_digits, a_rest) = a.split_at(digits(a));
    let (b_digits, b_rest) = b.split_at(digits(b));
    *a = a_rest;
    *b = b_rest;

    super::cmp_numeric(a_digits, b_digits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn deb(s: &str) -> DebVersion {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_components() {
        let v = deb("2:1.18.25-10ubuntu1");
        assert_eq!(v.epoch(), 2);
        assert_eq!(v.upstream(), "1.18.25");
        assert_eq!(v.revision(), "10ubuntu1");

        let v = deb("1.2.3-4-5");
        assert_eq!(v.upstream(), "1.2.3-4");
        assert_eq!(v.revision(), "5");

        let v = deb("7.0");
        assert_eq!(v.epoch(), 0);
        assert_eq!(v.revision(), "");
        assert_eq!(v.to_string(), "7.0");
    }

    #[rstest]
    #[case("")]
    #[case(":1.0")]
    #[case("a:1.0")]
    #[case("1.0-")]
    #[case("abc")]
    #[case("1.0_1")]
    #[case("1.0-1_2")]
    fn test_parse_invalid(#[case] input: &str) {
        assert!(matches!(
            input.parse::<DebVersion>(),
            Err(VersError::InvalidVersion { .. })
        ));
    }

    #[rstest]
    #[case("0", Ordering::Less, "1")]
    #[case("1.0~rc1", Ordering::Less, "1.0")]
    #[case("1.0~~", Ordering::Less, "1.0~")]
    #[case("1.0~", Ordering::Less, "1.0")]
    #[case("1.0", Ordering::Less, "1.0a")]
    #[case("1.0a", Ordering::Less, "1.0+")]
    #[case("1.0+", Ordering::Less, "1.0.1")]
    #[case("1.0", Ordering::Equal, "1.00")]
    #[case("1.0", Ordering::Equal, "1.0-0")]
    #[case("1:1.0", Ordering::Greater, "2.0")]
    #[case("1.10", Ordering::Greater, "1.9")]
    #[case("114.0.5735.106-1~deb11u1", Ordering::Less, "114.0.5735.133-1~deb12u1")]
    #[case("114.0.5735.133-1", Ordering::Greater, "114.0.5735.133-1~deb12u1")]
    #[case("2.30-1+deb11u1", Ordering::Greater, "2.30-1")]
    fn test_compare(#[case] a: &str, #[case] expected: Ordering, #[case] b: &str) {
        assert_eq!(deb(a).cmp(&deb(b)), expected);
        assert_eq!(deb(b).cmp(&deb(a)), expected.reverse());
    }
}
