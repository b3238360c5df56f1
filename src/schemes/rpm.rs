use crate::VersError;
use std::cmp::Ordering;
use std::str::FromStr;

/// Scheme identifier string for RPM package versions
pub static RPM_SCHEME: &str = "rpm";

/// RPM package version in the format `[epoch:]version[-release]`.
///
/// Version and release are compared with the `rpmvercmp` algorithm: both are split into runs of
/// ASCII letters, runs of digits, `~` and `^`; everything else only separates segments.
///
/// See <https://rpm-software-management.github.io/rpm/manual/dependencies.html>.
#[derive(Clone, Debug)]
pub struct RpmVersion {
    epoch: u64,
    version: String,
    release: Option<String>,
}

impl RpmVersion {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn release(&self) -> Option<&str> {
        self.release.as_deref()
    }

    pub fn is_stable(&self) -> bool {
        true
    }
}

impl std::fmt::Display for RpmVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.epoch > 0 {
            write!(f, "{}:", self.epoch)?;
        }
        f.write_str(&self.version)?;
        if let Some(release) = &self.release {
            write!(f, "-{release}")?;
        }
        Ok(())
    }
}

impl FromStr for RpmVersion {
    type Err = VersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| {
            VersError::invalid_version(
                RPM_SCHEME,
                s,
                format!("{reason}, expected [epoch:]version[-release]"),
            )
        };

        let (epoch, rest) = match s.split_once(':') {
            Some((ep, rest)) if !ep.is_empty() && ep.bytes().all(|b| b.is_ascii_digit()) => {
                let epoch = ep.parse::<u64>().map_err(|_| invalid("epoch out of range"))?;
                (epoch, rest)
            }
            _ => (0, s),
        };

        let (version, release) = match rest.split_once('-') {
            Some((version, release)) => {
                if release.is_empty() || release.contains('-') {
                    return Err(invalid("malformed release"));
                }
                (version, Some(release))
            }
            None => (rest, None),
        };

        if version.is_empty() {
            return Err(invalid("missing version"));
        }

        Ok(RpmVersion {
            epoch,
            version: version.to_string(),
            release: release.map(str::to_string),
        })
    }
}

impl Ord for RpmVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| rpmvercmp(&self.version, &other.version))
            .then_with(|| {
                rpmvercmp(
                    self.release.as_deref().unwrap_or_default(),
                    other.release.as_deref().unwrap_or_default(),
                )
            })
    }
}

impl PartialOrd for RpmVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RpmVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RpmVersion {}

/// Splits a version string into comparable segments.
fn segments(s: &str) -> Vec<&str> {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let b = bytes[pos];
        let len = if b.is_ascii_alphabetic() {
            s[pos..]
                .find(|c: char| !c.is_ascii_alphabetic())
                .unwrap_or(s.len() - pos)
        } else if b.is_ascii_digit() {
            s[pos..]
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(s.len() - pos)
        } else if b == b'~' || b == b'^' {
            1
        } else {
            pos += 1;
            continue;
        };
        out.push(&s[pos..pos + len]);
        pos += len;
    }

    out
}

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

fn rpmvercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let segs_a = segments(a);
    let segs_b = segments(b);

    for i in 0..segs_a.len().max(segs_b.len()) {
        let seg_a = segs_a.get(i).copied().unwrap_or_default();
        let seg_b = segs_b.get(i).copied().unwrap_or_default();

        // Tilde sorts before everything else
        if seg_a == "~" || seg_b == "~" {
            if seg_a != "~" {
                return Ordering::Greater;
            }
            if seg_b != "~" {
                return Ordering::Less;
            }
            continue;
        }

        // Caret works like tilde, except that a version that ended sorts lower
        if seg_a == "^" || seg_b == "^" {
            if seg_a.is_empty() {
                return Ordering::Less;
            }
            if seg_b.is_empty() {
                return Ordering::Greater;
            }
            if seg_a != "^" {
                return Ordering::Greater;
            }
            if seg_b != "^" {
                return Ordering::Less;
            }
            continue;
        }

        if seg_a.is_empty() || seg_b.is_empty() {
            break;
        }

        let ord = match (is_numeric(seg_a), is_numeric(seg_b)) {
            (true, false) => return Ordering::Greater,
            (false, true) => return Ordering::Less,
            (true, true) => super::cmp_numeric(seg_a, seg_b),
            (false, false) => seg_a.cmp(seg_b),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    // Segments compared equal but the separators differed
    segs_a.len().cmp(&segs_b.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn rpm(s: &str) -> RpmVersion {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse() {
        let v = rpm("9:5.00502-3");
        assert_eq!(v.epoch(), 9);
        assert_eq!(v.version(), "5.00502");
        assert_eq!(v.release(), Some("3"));
        assert_eq!(v.to_string(), "9:5.00502-3");

        let v = rpm("1.0");
        assert_eq!(v.epoch(), 0);
        assert_eq!(v.release(), None);
    }

    #[rstest]
    #[case("")]
    #[case("-1")]
    #[case("1.0-")]
    #[case("1.0-1-2")]
    fn test_parse_invalid(#[case] input: &str) {
        assert!(matches!(
            input.parse::<RpmVersion>(),
            Err(VersError::InvalidVersion { .. })
        ));
    }

    // Cases from rpm's own rpmvercmp test suite
    #[rstest]
    #[case("1.0", Ordering::Equal, "1.0")]
    #[case("1.0", Ordering::Less, "2.0")]
    #[case("2.0", Ordering::Less, "2.0.1")]
    #[case("2.0.1a", Ordering::Greater, "2.0.1")]
    #[case("5.5p1", Ordering::Less, "5.5p2")]
    #[case("10xyz", Ordering::Less, "10.1xyz")]
    #[case("xyz10", Ordering::Less, "xyz10.1")]
    #[case("xyz.4", Ordering::Less, "8")]
    #[case("xyz.4", Ordering::Less, "2")]
    #[case("5.5p2", Ordering::Less, "5.6p1")]
    #[case("6.0.rc1", Ordering::Greater, "6.0")]
    #[case("10b2", Ordering::Greater, "10a1")]
    #[case("1.0a", Ordering::Less, "1.0aa")]
    #[case("10.0001", Ordering::Equal, "10.1")]
    #[case("10.0001", Ordering::Less, "10.0039")]
    #[case("4.999.9", Ordering::Less, "5.0")]
    #[case("20101121", Ordering::Less, "20101122")]
    #[case("2.0", Ordering::Equal, "2_0")]
    #[case("a+", Ordering::Equal, "a_")]
    #[case("+a", Ordering::Equal, "_a")]
    #[case("_+", Ordering::Equal, "+_")]
    #[case("+", Ordering::Equal, "_")]
    #[case("1.0~rc1", Ordering::Less, "1.0")]
    #[case("1.0~rc1", Ordering::Less, "1.0~rc2")]
    #[case("1.0~rc1~git123", Ordering::Less, "1.0~rc1")]
    #[case("1.0^", Ordering::Greater, "1.0")]
    #[case("1.0^git1", Ordering::Greater, "1.0")]
    #[case("1.0^git1", Ordering::Less, "1.0^git2")]
    #[case("1.0^git1", Ordering::Less, "1.01")]
    #[case("1.0^20160101", Ordering::Less, "1.0.1")]
    #[case("1.0^20160102", Ordering::Greater, "1.0^20160101^git1")]
    #[case("1.0~rc1^git1", Ordering::Greater, "1.0~rc1")]
    #[case("1.0^git1", Ordering::Greater, "1.0^git1~pre")]
    #[case("1b.fc17", Ordering::Less, "1.fc17")]
    #[case("1g.fc17", Ordering::Greater, "1.fc17")]
    #[case("1.1.α", Ordering::Equal, "1.1.β")]
    #[case("1.1.αα", Ordering::Equal, "1.1.α")]
    #[case("1.0-1", Ordering::Greater, "1.0")]
    #[case("1:1.0", Ordering::Greater, "2.0")]
    fn test_compare(#[case] a: &str, #[case] expected: Ordering, #[case] b: &str) {
        assert_eq!(rpm(a).cmp(&rpm(b)), expected);
        assert_eq!(rpm(b).cmp(&rpm(a)), expected.reverse());
    }
}
