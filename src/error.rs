use thiserror::Error;

/// Errors produced while parsing, building or evaluating version ranges.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersError {
    /// The text does not follow the grammar of the versioning scheme.
    #[error("invalid {scheme} version {version:?}: {reason}")]
    InvalidVersion {
        scheme: String,
        version: String,
        reason: String,
    },

    /// The range is structurally invalid.
    #[error("invalid range {range:?}: {reason}")]
    InvalidRange { range: String, reason: String },

    /// Two values of different versioning schemes were combined.
    #[error("versioning scheme mismatch: expected {expected:?}, got {actual:?}")]
    SchemeMismatch { expected: String, actual: String },

    /// No version provider is registered for the scheme, not even a generic one.
    #[error("no version provider for scheme {0:?}")]
    UnsupportedScheme(String),
}

impl VersError {
    pub(crate) fn invalid_version(
        scheme: &str,
        version: &str,
        reason: impl Into<String>,
    ) -> Self {
        VersError::InvalidVersion {
            scheme: scheme.to_string(),
            version: version.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_range(range: impl Into<String>, reason: impl Into<String>) -> Self {
        VersError::InvalidRange {
            range: range.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn scheme_mismatch(expected: &str, actual: &str) -> Self {
        VersError::SchemeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Re-labels an [`VersError::InvalidVersion`] with the scheme that was actually requested.
    pub(crate) fn with_scheme(self, scheme: &str) -> Self {
        match self {
            VersError::InvalidVersion {
                version, reason, ..
            } => VersError::InvalidVersion {
                scheme: scheme.to_string(),
                version,
                reason,
            },
            other => other,
        }
    }
}

#[cfg(feature = "wasm")]
impl From<VersError> for wasm_bindgen::JsValue {
    fn from(e: VersError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
