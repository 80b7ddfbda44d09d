//! NDR error types

use thiserror::Error;

/// NDR encoding/decoding errors
#[derive(Debug, Error)]
pub enum NdrError {
    /// Stream exhausted before a required read completed
    #[error("buffer underrun at offset {position}: needed {needed} bytes, have {have}")]
    Underrun {
        needed: usize,
        have: usize,
        position: usize,
    },

    /// Decoded count, discriminant or index inconsistent with the structure
    #[error("malformed {field}: {reason}")]
    Structure { field: &'static str, reason: String },

    /// UTF-16 payload that does not decode to a string
    #[error("invalid string in {field}: {source}")]
    InvalidString {
        field: &'static str,
        #[source]
        source: std::string::FromUtf16Error,
    },
}

impl NdrError {
    pub fn structure(field: &'static str, reason: impl Into<String>) -> Self {
        NdrError::Structure {
            field,
            reason: reason.into(),
        }
    }

    pub fn is_underrun(&self) -> bool {
        matches!(self, NdrError::Underrun { .. })
    }

    /// True for every error describing an inconsistent structure
    pub fn is_structure(&self) -> bool {
        matches!(
            self,
            NdrError::Structure { .. } | NdrError::InvalidString { .. }
        )
    }

    /// Name of the offending field, if the error carries one
    pub fn field(&self) -> Option<&'static str> {
        match self {
            NdrError::Structure { field, .. } | NdrError::InvalidString { field, .. } => {
                Some(field)
            }
            NdrError::Underrun { .. } => None,
        }
    }
}

/// Result type for NDR operations
pub type Result<T> = std::result::Result<T, NdrError>;
