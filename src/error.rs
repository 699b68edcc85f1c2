use std::fmt;

/// Errors that can occur when accessing a Variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantError {
    /// The variant does not hold a value
    Invalid,
    /// The requested type is not compatible with the stored type
    TypeMismatch {
        /// Raw name of the type held by the variant
        stored: &'static str,
        /// Raw name of the type the caller asked for
        requested: &'static str,
    },
}

impl fmt::Display for VariantError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VariantError::Invalid => write!(f, "variant is not valid"),
            VariantError::TypeMismatch { stored, requested } => write!(
                f,
                "type mismatch: stored {}, requested {}",
                stored, requested
            ),
        }
    }
}

impl std::error::Error for VariantError {}
