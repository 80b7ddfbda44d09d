//! Decode limits
//!
//! Conformant counts come straight off the wire, so every count is checked
//! against these limits before anything is allocated for it.

/// Default maximum number of elements in a single conformant array
pub const DEFAULT_MAX_ARRAY_ELEMENTS: usize = 1_000_000;

/// Default maximum number of UTF-16 code units in a single string
///
/// `RPC_UNICODE_STRING` carries its byte length in a u16, so no valid string
/// holds more than this.
pub const DEFAULT_MAX_STRING_CHARS: usize = 32_767;

/// Limits applied while decoding untrusted stub data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    pub max_array_elements: usize,
    pub max_string_chars: usize,
}

impl DecodeLimits {
    pub fn new() -> Self {
        Self {
            max_array_elements: DEFAULT_MAX_ARRAY_ELEMENTS,
            max_string_chars: DEFAULT_MAX_STRING_CHARS,
        }
    }

    /// Set the maximum conformant array size
    pub fn with_max_array_elements(mut self, max: usize) -> Self {
        self.max_array_elements = max;
        self
    }

    /// Set the maximum string length in UTF-16 code units
    pub fn with_max_string_chars(mut self, max: usize) -> Self {
        self.max_string_chars = max;
        self
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::new()
    }
}
