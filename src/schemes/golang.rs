use crate::VersError;
use std::cmp::Ordering;
use std::str::FromStr;

/// Scheme identifier string for Go module versions
pub static GOLANG_SCHEME: &str = "golang";

/// Go module version as understood by `golang.org/x/mod/semver`.
///
/// The leading `v` is optional so that versions copied from advisory databases without the
/// prefix are accepted. Shorthands `v1` and `v1.2` stand for `v1.0.0` and `v1.2.0`; they cannot
/// carry a pre-release or build suffix. Build metadata is kept but ignored when comparing.
#[derive(Clone, Debug)]
pub struct GoVersion {
    major: String,
    minor: String,
    patch: String,
    prerelease: Option<String>,
    build: Option<String>,
}

impl GoVersion {
    pub fn major(&self) -> &str {
        &self.major
    }

    pub fn minor(&self) -> &str {
        &self.minor
    }

    pub fn patch(&self) -> &str {
        &self.patch
    }

    /// Pre-release suffix including its leading `-`.
    pub fn prerelease(&self) -> Option<&str> {
        self.prerelease.as_deref()
    }

    /// Build suffix including its leading `+`.
    pub fn build(&self) -> Option<&str> {
        self.build.as_deref()
    }

    pub fn is_stable(&self) -> bool {
        self.prerelease.is_none()
    }
}

impl std::fmt::Display for GoVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(prerelease) = &self.prerelease {
            f.write_str(prerelease)?;
        }
        if let Some(build) = &self.build {
            f.write_str(build)?;
        }
        Ok(())
    }
}

/// Splits a decimal number without leading zeros off the front of `s`.
fn parse_int(s: &str) -> Option<(&str, &str)> {
    let len = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    if len == 0 || (len > 1 && s.starts_with('0')) {
        return None;
    }
    Some(s.split_at(len))
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

fn is_bad_num(ident: &str) -> bool {
    ident.len() > 1 && ident.starts_with('0') && ident.bytes().all(|b| b.is_ascii_digit())
}

/// Splits a dotted identifier list introduced by `marker` off the front of `s`.
fn parse_idents(s: &str, marker: char, reject_bad_num: bool) -> Option<(&str, &str)> {
    let body = s.strip_prefix(marker)?;
    let end = body.find('+').unwrap_or(body.len());
    let idents = &body[..end];

    for ident in idents.split('.') {
        if ident.is_empty() || !ident.chars().all(is_ident_char) {
            return None;
        }
        if reject_bad_num && is_bad_num(ident) {
            return None;
        }
    }

    Some(s.split_at(marker.len_utf8() + end))
}

impl FromStr for GoVersion {
    type Err = VersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| VersError::invalid_version(GOLANG_SCHEME, s, reason);

        let v = s.strip_prefix('v').unwrap_or(s);

        let (major, rest) = parse_int(v).ok_or_else(|| invalid("invalid major version"))?;
        if rest.is_empty() {
            return Ok(GoVersion {
                major: major.to_string(),
                minor: "0".into(),
                patch: "0".into(),
                prerelease: None,
                build: None,
            });
        }

        let rest = rest
            .strip_prefix('.')
            .ok_or_else(|| invalid("major version must be followed by \".\""))?;
        let (minor, rest) = parse_int(rest).ok_or_else(|| invalid("invalid minor version"))?;
        if rest.is_empty() {
            return Ok(GoVersion {
                major: major.to_string(),
                minor: minor.to_string(),
                patch: "0".into(),
                prerelease: None,
                build: None,
            });
        }

        let rest = rest
            .strip_prefix('.')
            .ok_or_else(|| invalid("minor version must be followed by \".\""))?;
        let (patch, mut rest) = parse_int(rest).ok_or_else(|| invalid("invalid patch version"))?;

        let mut prerelease = None;
        if rest.starts_with('-') {
            let (pre, tail) =
                parse_idents(rest, '-', true).ok_or_else(|| invalid("invalid pre-release version"))?;
            prerelease = Some(pre.to_string());
            rest = tail;
        }

        let mut build = None;
        if rest.starts_with('+') {
            let (b, tail) =
                parse_idents(rest, '+', false).ok_or_else(|| invalid("invalid build version"))?;
            build = Some(b.to_string());
            rest = tail;
        }

        if !rest.is_empty() {
            return Err(invalid(&format!("unexpected remainder {rest:?}")));
        }

        Ok(GoVersion {
            major: major.to_string(),
            minor: minor.to_string(),
            patch: patch.to_string(),
            prerelease,
            build,
        })
    }
}

/// Orders two pre-release suffixes; a missing suffix sorts after any present one.
fn compare_prerelease(x: Option<&str>, y: Option<&str>) -> Ordering {
    match (x, y) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => {
            let mut xs = x[1..].split('.');
            let mut ys = y[1..].split('.');
            loop {
                match (xs.next(), ys.next()) {
                    (None, None) => return Ordering::Equal,
                    (None, Some(_)) => return Ordering::Less,
                    (Some(_), None) => return Ordering::Greater,
                    (Some(dx), Some(dy)) if dx == dy => {}
                    (Some(dx), Some(dy)) => {
                        let ix = dx.bytes().all(|b| b.is_ascii_digit());
                        let iy = dy.bytes().all(|b| b.is_ascii_digit());
                        return match (ix, iy) {
                            (true, false) => Ordering::Less,
                            (false, true) => Ordering::Greater,
                            (true, true) => super::cmp_numeric(dx, dy),
                            (false, false) => dx.cmp(dy),
                        };
                    }
                }
            }
        }
    }
}

impl Ord for GoVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        super::cmp_numeric(&self.major, &other.major)
            .then_with(|| super::cmp_numeric(&self.minor, &other.minor))
            .then_with(|| super::cmp_numeric(&self.patch, &other.patch))
            .then_with(|| compare_prerelease(self.prerelease(), other.prerelease()))
    }
}

impl PartialOrd for GoVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GoVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GoVersion {}
