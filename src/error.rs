//! Error types for the typed cache layer
//!
//! Provides unified error handling using thiserror. Provider failures are
//! carried through untouched in [`CacheError::Backend`].

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for typed cache operations.
///
/// `E` is the error type of the underlying [`ByteCache`](crate::cache::ByteCache).
#[derive(Error, Debug)]
pub enum CacheError<E>
where
    E: std::error::Error + 'static,
{
    /// Caller passed an unusable argument (absent value, bad expiration)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Value could not be encoded as JSON
    #[error("Failed to serialize value for key '{key}': {source}")]
    Serialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Stored bytes are not valid JSON for the requested shape
    #[error("Failed to deserialize value for key '{key}': {source}")]
    Deserialization {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Get-or-create producer failed
    #[error("Producer failed: {0:#}")]
    Producer(anyhow::Error),

    /// Cancellation was requested before the operation completed
    #[error("Operation cancelled")]
    Cancelled,

    /// Error raised by the underlying byte cache
    #[error(transparent)]
    Backend(E),
}

impl<E> CacheError<E>
where
    E: std::error::Error + 'static,
{
    /// Returns true for errors raised before the provider was touched.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, CacheError::InvalidArgument(_))
    }

    /// Returns the provider error, if this is one.
    pub fn backend(&self) -> Option<&E> {
        match self {
            CacheError::Backend(err) => Some(err),
            _ => None,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for typed cache operations.
pub type Result<T, E> = std::result::Result<T, CacheError<E>>;
