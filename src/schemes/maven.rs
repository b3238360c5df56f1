use crate::VersError;
use std::cmp::Ordering;
use std::str::FromStr;

/// Scheme identifier string for Maven artifact versions
pub static MAVEN_SCHEME: &str = "maven";

/// Well-known qualifiers in ascending order; the empty string is the release itself.
const QUALIFIERS: [&str; 7] = ["alpha", "beta", "milestone", "rc", "snapshot", "", "sp"];

/// Qualifiers that mark a version as not yet released.
const UNSTABLE_QUALIFIERS: [&str; 5] = ["alpha", "beta", "milestone", "rc", "snapshot"];

/// One parsed component of a Maven version.
#[derive(Debug, Clone)]
enum Item {
    /// Digits with leading zeros removed.
    Int(String),
    /// Qualifier after alias resolution.
    Str(String),
    List(Vec<Item>),
}

impl Item {
    fn string(value: &str, followed_by_digit: bool) -> Item {
        let value = match value {
            "a" if followed_by_digit => "alpha",
            "b" if followed_by_digit => "beta",
            "m" if followed_by_digit => "milestone",
            "ga" | "final" | "release" => "",
            "cr" => "rc",
            other => other,
        };
        Item::Str(value.to_string())
    }

    fn parse(is_digit: bool, buf: &str) -> Item {
        if is_digit {
            Item::Int(buf.trim_start_matches('0').to_string())
        } else {
            Item::string(buf, false)
        }
    }

    /// `0`, the empty qualifier and the empty list carry no ordering information when trailing.
    fn is_null(&self) -> bool {
        match self {
            Item::Int(digits) => digits.is_empty(),
            Item::Str(value) => value.is_empty(),
            Item::List(items) => items.is_empty(),
        }
    }

    /// Orders this item against `other`, where `None` stands for a missing item.
    fn compare(&self, other: Option<&Item>) -> Ordering {
        match (self, other) {
            (Item::Int(digits), None) => {
                if digits.is_empty() {
                    Ordering::Equal
                } else {
                    Ordering::Greater
                }
            }
            (Item::Int(a), Some(Item::Int(b))) => super::cmp_numeric(a, b),
            (Item::Int(_), Some(_)) => Ordering::Greater,

            (Item::Str(value), None) => {
                comparable_qualifier(value).cmp(&comparable_qualifier(""))
            }
            (Item::Str(a), Some(Item::Str(b))) => {
                comparable_qualifier(a).cmp(&comparable_qualifier(b))
            }
            (Item::Str(_), Some(Item::Int(_) | Item::List(_))) => Ordering::Less,

            (Item::List(items), None) => match items.first() {
                Some(first) => first.compare(None),
                None => Ordering::Equal,
            },
            (Item::List(_), Some(Item::Int(_))) => Ordering::Less,
            (Item::List(_), Some(Item::Str(_))) => Ordering::Greater,
            (Item::List(a), Some(Item::List(b))) => compare_lists(a, b),
        }
    }
}

fn compare_lists(a: &[Item], b: &[Item]) -> Ordering {
    for i in 0..a.len().max(b.len()) {
        let ord = match (a.get(i), b.get(i)) {
            (Some(l), r) => l.compare(r),
            (None, Some(r)) => r.compare(None).reverse(),
            (None, None) => Ordering::Equal,
        };
        if ord.is_ne() {
            return ord;
        }
    }
    Ordering::Equal
}

/// Sort key of a qualifier: known qualifiers by index, unknown ones after them alphabetically.
fn comparable_qualifier(qualifier: &str) -> String {
    match QUALIFIERS.iter().position(|q| *q == qualifier) {
        Some(index) => index.to_string(),
        None => format!("{}-{qualifier}", QUALIFIERS.len()),
    }
}

/// Removes null items from the end, skipping over non-null sublists and stopping at the first
/// other non-null item. A sublist is always the last item of its parent and is normalized first.
fn normalize(items: &mut Vec<Item>) {
    if let Some(Item::List(inner)) = items.last_mut() {
        normalize(inner);
    }
    let mut i = items.len();
    while i > 0 {
        i -= 1;
        if items[i].is_null() {
            items.remove(i);
        } else if !matches!(items[i], Item::List(_)) {
            break;
        }
    }
}

/// Maven artifact version ordered like Maven's `ComparableVersion`.
///
/// The version is split on `.`, `-` and transitions between digits and letters. Each `-` and
/// each transition opens a nested list, so `1-alpha-2` is `[1, [alpha, [2]]]`. Trailing zeros
/// and release aliases (`ga`, `final`, `release`) are dropped, which makes `1.0`, `1.0.0` and
/// `1-ga` equal to `1`. Qualifiers sort as
/// `alpha < beta < milestone < rc < snapshot < release < sp < any other`.
#[derive(Debug, Clone)]
pub struct MavenVersion {
    items: Vec<Item>,
}

impl MavenVersion {
    /// A version is stable unless it carries an alpha, beta, milestone, rc or snapshot qualifier.
    pub fn is_stable(&self) -> bool {
        fn has_unstable(items: &[Item]) -> bool {
            items.iter().any(|item| match item {
                Item::Str(value) => UNSTABLE_QUALIFIERS.contains(&value.as_str()),
                Item::List(inner) => has_unstable(inner),
                Item::Int(_) => false,
            })
        }
        !has_unstable(&self.items)
    }

    /// Canonical form of the parsed version, e.g. `1-alpha-1` for `1.0-A1`.
    pub fn canonical(&self) -> String {
        fn render(items: &[Item], out: &mut String) {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(if matches!(item, Item::List(_)) { '-' } else { '.' });
                }
                match item {
                    Item::Int(digits) if digits.is_empty() => out.push('0'),
                    Item::Int(digits) => out.push_str(digits),
                    Item::Str(value) => out.push_str(value),
                    Item::List(inner) => render(inner, out),
                }
            }
        }
        let mut out = String::new();
        render(&self.items, &mut out);
        out
    }
}

impl FromStr for MavenVersion {
    type Err = VersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(VersError::invalid_version(MAVEN_SCHEME, s, "empty"));
        }

        let version = s.to_lowercase();

        // Path of open lists from the root; new items go to the innermost one.
        let mut stack: Vec<Vec<Item>> = vec![Vec::new()];
        let mut is_digit = false;
        let mut start = 0;

        fn push(stack: &mut [Vec<Item>], item: Item) {
            if let Some(list) = stack.last_mut() {
                list.push(item);
            }
        }

        for (i, c) in version.char_indices() {
            match c {
                '.' | '-' => {
                    let item = if i == start {
                        Item::Int(String::new())
                    } else {
                        Item::parse(is_digit, &version[start..i])
                    };
                    push(&mut stack, item);
                    start = i + 1;
                    if c == '-' {
                        stack.push(Vec::new());
                    }
                }
                c if c.is_ascii_digit() => {
                    if !is_digit && i > start {
                        push(&mut stack, Item::string(&version[start..i], true));
                        start = i;
                        stack.push(Vec::new());
                    }
                    is_digit = true;
                }
                _ => {
                    if is_digit && i > start {
                        push(&mut stack, Item::parse(true, &version[start..i]));
                        start = i;
                        stack.push(Vec::new());
                    }
                    is_digit = false;
                }
            }
        }

        if version.len() > start {
            push(&mut stack, Item::parse(is_digit, &version[start..]));
        }

        // Close the open lists from the innermost outwards.
        while stack.len() > 1 {
            if let Some(inner) = stack.pop() {
                push(&mut stack, Item::List(inner));
            }
        }
        let mut items = stack.pop().unwrap_or_default();
        normalize(&mut items);

        Ok(MavenVersion { items })
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_lists(&self.items, &other.items)
    }
}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MavenVersion {}
