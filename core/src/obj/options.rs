//! Loader configuration.

use std::fmt;
use std::str::FromStr;

/// How face indices that fall outside the defined attributes are handled.
///
/// Relative indices are resolved against the attributes defined *before* the
/// face line; an index is out of range when it is negative after translation
/// or not below the attribute's total count in the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexPolicy {
    /// Keep the translated value as is (negative results wrap to large
    /// unsigned values) and log a warning.
    #[default]
    Permissive,
    /// Clamp into `[0, count - 1]`, or to 0 when the attribute is absent.
    Clamp,
}

/// Mantissa width used when decoding floating point literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FloatPrecision {
    /// 32-bit accumulator. Exact for short literals, wraps past ~9 digits.
    #[default]
    Single,
    /// 64-bit accumulator, narrowed to `f32` at the end.
    Extended,
}

/// Options for [`parse_obj_with_options`](super::parse_obj_with_options).
///
/// # Example
///
/// ```
/// use wfobj_core::obj::{FloatPrecision, IndexPolicy, ParseOptions};
///
/// let options = ParseOptions::new()
///     .with_index_policy(IndexPolicy::Clamp)
///     .with_precision(FloatPrecision::Extended);
/// assert_eq!(options.index_policy, IndexPolicy::Clamp);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ParseOptions {
    /// Out-of-range face index handling.
    pub index_policy: IndexPolicy,
    /// Float literal decoding precision.
    pub precision: FloatPrecision,
}

impl ParseOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the out-of-range index policy.
    pub fn with_index_policy(mut self, policy: IndexPolicy) -> Self {
        self.index_policy = policy;
        self
    }

    /// Set the float decoding precision.
    pub fn with_precision(mut self, precision: FloatPrecision) -> Self {
        self.precision = precision;
        self
    }
}

/// Errors produced when reading option values from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    /// The index policy name is not recognized.
    UnknownIndexPolicy(String),
    /// The precision name is not recognized.
    UnknownPrecision(String),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownIndexPolicy(name) => {
                write!(f, "unknown index policy '{name}' (expected 'permissive' or 'clamp')")
            }
            Self::UnknownPrecision(name) => {
                write!(f, "unknown precision '{name}' (expected 'single' or 'extended')")
            }
        }
    }
}

impl std::error::Error for OptionsError {}

impl FromStr for IndexPolicy {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "clamp" => Ok(Self::Clamp),
            _ => Err(OptionsError::UnknownIndexPolicy(s.to_string())),
        }
    }
}

impl FromStr for FloatPrecision {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" | "f32" => Ok(Self::Single),
            "extended" | "f64" => Ok(Self::Extended),
            _ => Err(OptionsError::UnknownPrecision(s.to_string())),
        }
    }
}
