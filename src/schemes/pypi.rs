use crate::VersError;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Scheme identifier string for Python package versions
pub static PYPI_SCHEME: &str = "pypi";

// https://peps.python.org/pep-0440/#appendix-b-parsing-version-strings-with-regular-expressions
static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        ^v?
        (?:(?P<epoch>[0-9]+)!)?
        (?P<release>[0-9]+(?:\.[0-9]+)*)
        (?P<pre>[-_.]?(?P<pre_type>alpha|a|beta|b|preview|pre|c|rc)[-_.]?(?P<pre_num>[0-9]+)?)?
        (?P<post>-(?P<post_num1>[0-9]+)|[-_.]?(?:post|rev|r)[-_.]?(?P<post_num2>[0-9]+)?)?
        (?P<dev>[-_.]?dev[-_.]?(?P<dev_num>[0-9]+)?)?
        (?:\+(?P<local>[a-z0-9]+(?:[-_.][a-z0-9]+)*))?
        $",
    )
    .expect("PEP 440 version pattern is valid")
});

/// Pre-release phase, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreReleaseKind {
    Alpha,
    Beta,
    ReleaseCandidate,
}

impl PreReleaseKind {
    fn from_spelling(s: &str) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "a" | "alpha" => PreReleaseKind::Alpha,
            "b" | "beta" => PreReleaseKind::Beta,
            _ => PreReleaseKind::ReleaseCandidate,
        }
    }

    /// Normalized spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            PreReleaseKind::Alpha => "a",
            PreReleaseKind::Beta => "b",
            PreReleaseKind::ReleaseCandidate => "rc",
        }
    }
}

/// Python package version following PEP 440: `[N!]N(.N)*[{a|b|rc}N][.postN][.devN][+local]`.
///
/// Alternative spellings are accepted (`alpha`, `c`, `preview`, `-1` for `.post1`, `_` and `-`
/// separators, a leading `v`) and compare equal to their normalized form; see
/// [`PythonVersion::normalized`].
#[derive(Debug, Clone)]
pub struct PythonVersion {
    epoch: u64,
    release: Vec<u64>,
    pre: Option<(PreReleaseKind, u64)>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Option<String>,
}

impl PythonVersion {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn release(&self) -> &[u64] {
        &self.release
    }

    pub fn pre_release(&self) -> Option<(PreReleaseKind, u64)> {
        self.pre
    }

    pub fn post_release(&self) -> Option<u64> {
        self.post
    }

    pub fn dev_release(&self) -> Option<u64> {
        self.dev
    }

    /// Local version label, lowercased with `.` as the only separator.
    pub fn local(&self) -> Option<&str> {
        self.local.as_deref()
    }

    /// Final and post releases are stable; pre, dev and local versions are not.
    pub fn is_stable(&self) -> bool {
        self.pre.is_none() && self.dev.is_none() && self.local.is_none()
    }

    /// The PEP 440 normalized form of this version, e.g. `1.0-1` becomes `1.0.post1`.
    pub fn normalized(&self) -> String {
        self.to_string()
    }

    /// `X.Y.devN` without pre or post release sorts before every pre-release of `X.Y`.
    fn is_dev_of_final(&self) -> bool {
        self.pre.is_none() && self.post.is_none() && self.dev.is_some()
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch > 0 {
            write!(f, "{}!", self.epoch)?;
        }
        let release: Vec<String> = self.release.iter().map(u64::to_string).collect();
        f.write_str(&release.join("."))?;
        if let Some((kind, n)) = self.pre {
            write!(f, "{}{n}", kind.as_str())?;
        }
        if let Some(n) = self.post {
            write!(f, ".post{n}")?;
        }
        if let Some(n) = self.dev {
            write!(f, ".dev{n}")?;
        }
        if let Some(local) = &self.local {
            write!(f, "+{local}")?;
        }
        Ok(())
    }
}

impl FromStr for PythonVersion {
    type Err = VersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = VERSION_PATTERN.captures(s.trim()).ok_or_else(|| {
            VersError::invalid_version(
                PYPI_SCHEME,
                s,
                "does not match PEP 440 format [N!]N(.N)*[{a|b|rc}N][.postN][.devN][+local]",
            )
        })?;

        let number = |group: &str| -> Result<Option<u64>, VersError> {
            caps.name(group)
                .map(|m| {
                    m.as_str().parse::<u64>().map_err(|e| {
                        VersError::invalid_version(PYPI_SCHEME, s, format!("{group}: {e}"))
                    })
                })
                .transpose()
        };

        let epoch = number("epoch")?.unwrap_or(0);

        let release = caps["release"]
            .split('.')
            .map(|part| {
                part.parse::<u64>().map_err(|e| {
                    VersError::invalid_version(PYPI_SCHEME, s, format!("release: {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let pre = match caps.name("pre_type") {
            Some(m) => Some((
                PreReleaseKind::from_spelling(m.as_str()),
                number("pre_num")?.unwrap_or(0),
            )),
            None => None,
        };

        let post = if caps.name("post").is_some() {
            Some(
                number("post_num1")?
                    .or(number("post_num2")?)
                    .unwrap_or(0),
            )
        } else {
            None
        };

        let dev = if caps.name("dev").is_some() {
            Some(number("dev_num")?.unwrap_or(0))
        } else {
            None
        };

        let local = caps
            .name("local")
            .map(|m| m.as_str().to_ascii_lowercase().replace(['-', '_'], "."));

        Ok(PythonVersion {
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }
}

/// Release segments compare as if the shorter one were padded with zeros.
fn compare_release(a: &[u64], b: &[u64]) -> Ordering {
    (0..a.len().max(b.len()))
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            x.cmp(&y)
        })
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Local labels compare segment by segment: numbers numerically and above any alphanumeric
/// segment, alphanumerics lexically, and a label that is a prefix of another sorts first.
fn compare_local(a: Option<&str>, b: Option<&str>) -> Ordering {
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
        (Some(a), Some(b)) => (a, b),
    };

    let numeric = |p: &str| p.bytes().all(|b| b.is_ascii_digit());
    let mut parts_a = a.split('.');
    let mut parts_b = b.split('.');
    loop {
        let ord = match (parts_a.next(), parts_b.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match (numeric(x), numeric(y)) {
                (true, true) => super::cmp_numeric(x, y),
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => x.cmp(y),
            },
        };
        if ord.is_ne() {
            return ord;
        }
    }
}

impl Ord for PythonVersion {
    // X.Y.devN < X.YaN.devM < X.YaN < X.YaN.postP < X.YbN < ... < X.Y < X.Y.postN
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| compare_release(&self.release, &other.release))
            .then_with(|| {
                match (self.is_dev_of_final(), other.is_dev_of_final()) {
                    (true, false) => return Ordering::Less,
                    (false, true) => return Ordering::Greater,
                    (true, true) => return Ordering::Equal,
                    (false, false) => {}
                }
                // Missing pre-release sorts after any pre-release
                match (self.pre, other.pre) {
                    (None, None) => Ordering::Equal,
                    (None, Some(_)) => Ordering::Greater,
                    (Some(_), None) => Ordering::Less,
                    (Some(a), Some(b)) => a.cmp(&b),
                }
            })
            // Missing post-release sorts before any post-release
            .then_with(|| self.post.cmp(&other.post))
            // Missing dev-release sorts after any dev-release
            .then_with(|| match (self.dev, other.dev) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(&b),
            })
            .then_with(|| compare_local(self.local(), other.local()))
    }
}

impl PartialOrd for PythonVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PythonVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PythonVersion {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn py(s: &str) -> PythonVersion {
        s.parse().unwrap()
    }

    #[rstest]
    #[case("1.0", Ordering::Less, "2.0")]
    #[case("1.0.0", Ordering::Equal, "1.0")]
    #[case("1.2.3", Ordering::Less, "1.3.0")]
    #[case("1!1.0", Ordering::Greater, "2.0")]
    #[case("2!1.0", Ordering::Greater, "1!2.0")]
    #[case("1.0a1", Ordering::Less, "1.0")]
    #[case("1.0a1", Ordering::Less, "1.0b1")]
    #[case("1.0b1", Ordering::Less, "1.0rc1")]
    #[case("1.0a2", Ordering::Less, "1.0b1")]
    #[case("1.0", Ordering::Less, "1.0.post1")]
    #[case("1.0.post1", Ordering::Less, "1.0.post2")]
    #[case("1.0.dev1", Ordering::Less, "1.0a1")]
    #[case("1.0.dev1", Ordering::Less, "1.0.dev2")]
    #[case("1.0a1.dev1", Ordering::Less, "1.0a1")]
    #[case("1.0a1.dev1", Ordering::Less, "1.0a1.dev2")]
    #[case("1.0.dev456", Ordering::Less, "1.0a1")]
    #[case("1.0a1", Ordering::Less, "1.0a2.dev456")]
    #[case("1.0a2.dev456", Ordering::Less, "1.0a12.dev456")]
    #[case("1.0a12.dev456", Ordering::Less, "1.0a12")]
    #[case("1.0a12", Ordering::Less, "1.0b2.post345.dev456")]
    #[case("1.0b2.post345.dev456", Ordering::Less, "1.0b2.post345")]
    #[case("1.0b2.post345", Ordering::Less, "1.0rc1.dev456")]
    #[case("1.0rc1.dev456", Ordering::Less, "1.0rc1")]
    #[case("1.0rc1", Ordering::Less, "1.0")]
    #[case("1.0", Ordering::Less, "1.0.post456.dev34")]
    #[case("1.0.post456.dev34", Ordering::Less, "1.0.post456")]
    #[case("1.0.post456", Ordering::Less, "1.1.dev1")]
    #[case("1.0", Ordering::Less, "1.0+local")]
    #[case("1.0+abc", Ordering::Less, "1.0+def")]
    #[case("1.0+local1", Ordering::Less, "1.0+local2")]
    #[case("1.0+1.10", Ordering::Greater, "1.0+1.9")]
    #[case("1.0+1", Ordering::Greater, "1.0+abc")]
    #[case("1.0+abc.2", Ordering::Greater, "1.0+abc.a")]
    #[case("1.0+abc", Ordering::Less, "1.0+abc.1")]
    #[case("v1.0", Ordering::Equal, "1.0")]
    #[case("1.0alpha1", Ordering::Equal, "1.0a1")]
    #[case("1.0beta1", Ordering::Equal, "1.0b1")]
    #[case("1.0c1", Ordering::Equal, "1.0rc1")]
    #[case("1.0-post1", Ordering::Equal, "1.0.post1")]
    #[case("1.0-1", Ordering::Equal, "1.0.post1")]
    #[case("1.0.dev1", Ordering::Equal, "1.0-dev1")]
    #[case("1.0+Ubuntu-1", Ordering::Equal, "1.0+ubuntu.1")]
    #[case("1.11.0", Ordering::Greater, "1.2.0")]
    fn test_compare(#[case] a: &str, #[case] expected: Ordering, #[case] b: &str) {
        assert_eq!(py(a).cmp(&py(b)), expected);
        assert_eq!(py(b).cmp(&py(a)), expected.reverse());
    }

    #[test]
    fn test_parse_complex_version() {
        let v = py("1!1.2.3a4.post5.dev6+local");
        assert_eq!(v.epoch(), 1);
        assert_eq!(v.release(), &[1, 2, 3]);
        assert_eq!(v.pre_release(), Some((PreReleaseKind::Alpha, 4)));
        assert_eq!(v.post_release(), Some(5));
        assert_eq!(v.dev_release(), Some(6));
        assert_eq!(v.local(), Some("local"));
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("1.2.3.a.b.c")]
    #[case("1.2-")]
    #[case(".1.2")]
    #[case("1..2")]
    #[case("1.0+")]
    fn test_parse_invalid(#[case] input: &str) {
        assert!(matches!(
            input.parse::<PythonVersion>(),
            Err(VersError::InvalidVersion { .. })
        ));
    }

    #[rstest]
    #[case("V1.0", "1.0")]
    #[case(" 1.0 ", "1.0")]
    #[case("1.0ALPHA", "1.0a0")]
    #[case("1.0-preview.2", "1.0rc2")]
    #[case("1.0-1", "1.0.post1")]
    #[case("1.0.r", "1.0.post0")]
    #[case("1.0_dev", "1.0.dev0")]
    #[case("0!01.02", "1.2")]
    #[case("1.0+Foo_Bar", "1.0+foo.bar")]
    fn test_normalized(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(py(input).normalized(), expected);
    }

    #[rstest]
    #[case("1.0", true)]
    #[case("1.2.3.4.5", true)]
    #[case("1.0.post1", true)]
    #[case("1.0a1", false)]
    #[case("1.0rc1", false)]
    #[case("1.0.dev1", false)]
    #[case("1.0+local", false)]
    #[case("1.0a1.dev1", false)]
    fn test_is_stable(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(py(input).is_stable(), expected);
    }
}
