use crate::VersError;
use std::cmp::Ordering;
use std::str::FromStr;

/// Scheme identifier string for Alpine Linux package versions
pub static APK_SCHEME: &str = "apk";

/// Kind of a version token, in the order mismatched kinds sort against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum TokenKind {
    CommitHash,
    Digit,
    Letter,
    Revision,
    SuffixAlpha,
    SuffixBeta,
    SuffixCvs,
    SuffixGit,
    SuffixHg,
    SuffixP,
    SuffixPre,
    SuffixRc,
    SuffixSvn,
}

/// Suffix keywords in match order; `p` must come last so `_pre` is not read as `_p`.
const SUFFIXES: [(&str, TokenKind); 9] = [
    ("alpha", TokenKind::SuffixAlpha),
    ("beta", TokenKind::SuffixBeta),
    ("pre", TokenKind::SuffixPre),
    ("rc", TokenKind::SuffixRc),
    ("cvs", TokenKind::SuffixCvs),
    ("svn", TokenKind::SuffixSvn),
    ("git", TokenKind::SuffixGit),
    ("hg", TokenKind::SuffixHg),
    ("p", TokenKind::SuffixP),
];

impl TokenKind {
    fn is_pre_release(self) -> bool {
        matches!(
            self,
            TokenKind::SuffixAlpha
                | TokenKind::SuffixBeta
                | TokenKind::SuffixPre
                | TokenKind::SuffixRc
        )
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    value: String,
}

impl Token {
    fn new(kind: TokenKind, value: &str) -> Self {
        Token {
            kind,
            value: value.to_string(),
        }
    }

    fn has_leading_zero(&self) -> bool {
        self.value.len() > 1 && self.value.starts_with('0')
    }

    /// Orders two tokens of the same kind.
    fn cmp_value(&self, other: &Token) -> Ordering {
        match self.kind {
            TokenKind::Digit if self.has_leading_zero() || other.has_leading_zero() => {
                self.value.cmp(&other.value)
            }
            TokenKind::Digit | TokenKind::Revision => super::cmp_numeric(&self.value, &other.value),
            TokenKind::CommitHash | TokenKind::Letter => self.value.cmp(&other.value),
            _ => Ordering::Equal,
        }
    }
}

/// Alpine Linux (apk) package version, e.g. `1.2.3_rc1-r0`.
///
/// The version is read as a flat token stream of digit runs, single lowercase letters,
/// `_suffix` keywords, `~hash` commit markers and `-rN` revisions. Dots and any other characters
/// only separate tokens. Comparison follows apk-tools: pre-release suffixes (`_alpha`, `_beta`,
/// `_pre`, `_rc`) sort below the release they precede, every other trailing token sorts above.
#[derive(Debug, Clone)]
pub struct AlpineVersion {
    tokens: Vec<Token>,
}

impl AlpineVersion {
    /// A version is stable unless it carries a pre-release suffix.
    pub fn is_stable(&self) -> bool {
        !self.tokens.iter().any(|t| t.kind.is_pre_release())
    }

    /// The `-rN` package revision, if any.
    pub fn revision(&self) -> Option<&str> {
        self.tokens
            .iter()
            .rev()
            .find(|t| t.kind == TokenKind::Revision)
            .map(|t| t.value.as_str())
    }
}

fn tokenize(s: &str) -> Vec<Token> {
    let bytes = s.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let rest = &s[pos..];
        let b = bytes[pos];

        if b.is_ascii_digit() {
            let len = digit_run(rest);
            tokens.push(Token::new(TokenKind::Digit, &rest[..len]));
            pos += len;
            continue;
        }

        if b.is_ascii_lowercase() {
            tokens.push(Token::new(TokenKind::Letter, &rest[..1]));
            pos += 1;
            continue;
        }

        if let Some(after) = rest.strip_prefix('_')
            && let Some(&(keyword, kind)) = SUFFIXES.iter().find(|(kw, _)| after.starts_with(kw))
        {
            tokens.push(Token::new(kind, keyword));
            pos += 1 + keyword.len();
            continue;
        }

        if let Some(after) = rest.strip_prefix('~') {
            let len = after
                .find(|c: char| !matches!(c, '0'..='9' | 'a'..='f'))
                .unwrap_or(after.len());
            if len > 0 {
                tokens.push(Token::new(TokenKind::CommitHash, &after[..len]));
                pos += 1 + len;
                continue;
            }
        }

        if let Some(after) = rest.strip_prefix("-r") {
            let len = digit_run(after);
            if len > 0 {
                tokens.push(Token::new(TokenKind::Revision, &after[..len]));
                pos += 2 + len;
                continue;
            }
        }

        // Separator or unrecognised character
        pos += rest.chars().next().map_or(1, char::len_utf8);
    }

    tokens
}

fn digit_run(s: &str) -> usize {
    s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len())
}

impl FromStr for AlpineVersion {
    type Err = VersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens = tokenize(s);
        if tokens.is_empty() {
            return Err(VersError::invalid_version(
                APK_SCHEME,
                s,
                "no version components found",
            ));
        }
        Ok(AlpineVersion { tokens })
    }
}

impl Ord for AlpineVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut a = self.tokens.iter();
        let mut b = other.tokens.iter();

        loop {
            match (a.next(), b.next()) {
                (None, None) => return Ordering::Equal,
                (None, Some(tb)) if tb.kind.is_pre_release() => return Ordering::Greater,
                (None, Some(_)) => return Ordering::Less,
                (Some(ta), None) if ta.kind.is_pre_release() => return Ordering::Less,
                (Some(_), None) => return Ordering::Greater,
                (Some(ta), Some(tb)) if ta.kind != tb.kind => {
                    return match (ta.kind.is_pre_release(), tb.kind.is_pre_release()) {
                        (true, false) => Ordering::Less,
                        (false, true) => Ordering::Greater,
                        _ => ta.kind.cmp(&tb.kind),
                    };
                }
                (Some(ta), Some(tb)) => match ta.cmp_value(tb) {
                    Ordering::Equal => {}
                    ord => return ord,
                },
            }
        }
    }
}

impl PartialOrd for AlpineVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for AlpineVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for AlpineVersion {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn apk(s: &str) -> AlpineVersion {
        s.parse().unwrap()
    }

    #[rstest]
    #[case("0", Ordering::Less, "1")]
    #[case("1", Ordering::Equal, "1")]
    #[case("1.9", Ordering::Less, "1.10")]
    #[case("5.0.0-r0", Ordering::Equal, "5.0.0-r0")]
    #[case("5.0.0-r0", Ordering::Less, "5.0.0-r1")]
    #[case("4.3.46-r5", Ordering::Less, "5.0.0-r0")]
    #[case("9.1.1566-r0", Ordering::Greater, "9.1.100-r0")]
    #[case("1.0_alpha", Ordering::Less, "1.0_beta")]
    #[case("1.0_beta", Ordering::Less, "1.0_pre")]
    #[case("1.0_pre", Ordering::Less, "1.0_rc")]
    #[case("1.0_rc", Ordering::Less, "1.0")]
    #[case("1.0_alpha1", Ordering::Less, "1.0_alpha2")]
    #[case("1.0_rc2", Ordering::Less, "1.0")]
    #[case("1.0_cvs", Ordering::Greater, "1.0")]
    #[case("1.0_git", Ordering::Greater, "1.0")]
    #[case("1.0_hg", Ordering::Greater, "1.0")]
    #[case("1.0a", Ordering::Less, "1.0b")]
    #[case("1.0z", Ordering::Less, "1.1")]
    #[case("1.0~abc123", Ordering::Less, "1.0~def456")]
    #[case("1.0", Ordering::Less, "1.0~abc123")]
    #[case("1.0-r9", Ordering::Less, "1.0-r10")]
    #[case("1.2.3_rc1-r0", Ordering::Less, "1.2.3-r0")]
    #[case("1.2.3-r0", Ordering::Less, "1.2.4_alpha-r0")]
    #[case("1.0_alpha~git123-r0", Ordering::Less, "1.0-r0")]
    #[case("01", Ordering::Greater, "001")]
    #[case("1.01", Ordering::Greater, "1.001")]
    #[case("0.1", Ordering::Less, "1.0")]
    fn test_compare(#[case] a: &str, #[case] expected: Ordering, #[case] b: &str) {
        assert_eq!(apk(a).cmp(&apk(b)), expected);
        assert_eq!(apk(b).cmp(&apk(a)), expected.reverse());
    }

    #[rstest]
    #[case("1.0.0-r0", true)]
    #[case("1.0.0", true)]
    #[case("1.0_alpha", false)]
    #[case("1.0_beta", false)]
    #[case("1.0_pre", false)]
    #[case("1.0_rc1-r0", false)]
    #[case("1.0_git", true)]
    #[case("1.0_svn", true)]
    fn test_is_stable(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(apk(input).is_stable(), expected);
    }

    #[test]
    fn test_revision() {
        assert_eq!(apk("1.2.3-r4").revision(), Some("4"));
        assert_eq!(apk("1.2.3").revision(), None);
    }

    #[test]
    fn test_no_tokens_is_invalid() {
        for input in ["", "...", "-_+"] {
            assert!(matches!(
                input.parse::<AlpineVersion>(),
                Err(VersError::InvalidVersion { .. })
            ));
        }
    }
}
