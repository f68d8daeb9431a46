//! Typed Cache - Typed values over a byte-oriented distributed cache
//!
//! Provides JSON-serialised get/set/get-or-create operations on top of any
//! [`ByteCache`] provider. Storage, transport and expiration belong to the
//! provider; this crate only converts at the byte boundary.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{ByteCache, EntryOptions, Expiration, TypedCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};

// Re-exported so providers and callers share one token type
pub use tokio_util::sync::CancellationToken;
