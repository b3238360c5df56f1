// Module declarations
pub mod comparator;
pub mod constraint;
pub mod error;
pub mod factory;
pub mod pairwise;
pub mod range;
pub mod schemes;

pub use comparator::Comparator;
pub use constraint::VersionConstraint;
pub use error::VersError;
pub use factory::{VersionFactory, VersionProvider};
pub use pairwise::pairwise;
pub use range::{VersionRange, VersionRangeBuilder};
pub use schemes::{Version, VersionKind};

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

/// Parse a version range specifier string into a `VersionRange`.
///
/// The versioning scheme selects the comparator used for every version in the range; schemes
/// without a dedicated comparator use the generic one. The range is not validated, call
/// [`VersionRange::validate`] for that.
///
/// # Examples
///
/// ```
/// use vers_range::parse;
///
/// let range = parse("vers:npm/>=1.0.0|<2.0.0").unwrap();
/// assert_eq!(range.versioning_scheme(), "npm");
/// assert_eq!(range.constraints().len(), 2);
/// ```
pub fn parse(s: &str) -> Result<VersionRange, VersError> {
    s.parse()
}

/// Check if a version string is contained within a version range.
///
/// # Examples
///
/// ```
/// use vers_range::{parse, contains};
///
/// let range = parse("vers:npm/>=1.0.0|<2.0.0").unwrap();
/// assert!(contains(&range, "1.5.0").unwrap());
/// assert!(!contains(&range, "2.0.0").unwrap());
/// ```
pub fn contains(range: &VersionRange, version: &str) -> Result<bool, VersError> {
    range.contains(version)
}

#[cfg(feature = "wasm")]
#[derive(serde::Serialize)]
struct RangeObject<'a> {
    versioning_scheme: &'a str,
    constraints: &'a [VersionConstraint],
}

/// WebAssembly-friendly wrapper around `parse`.
///
/// On success returns an object `{ versioning_scheme, constraints: [{comparator, version}, ...] }`.
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn parse_js(s: &str) -> Result<JsValue, JsValue> {
    let range = parse(s)?;
    let object = RangeObject {
        versioning_scheme: range.versioning_scheme(),
        constraints: range.constraints(),
    };
    serde_wasm_bindgen::to_value(&object).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// WebAssembly-friendly wrapper around `contains`, taking the range as a vers string.
#[cfg(feature = "wasm")]
#[wasm_bindgen]
pub fn contains_js(range: &str, version: &str) -> Result<bool, JsValue> {
    Ok(contains(&parse(range)?, version)?)
}
