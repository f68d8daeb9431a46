//! Cache Module
//!
//! Typed JSON operations over a byte-oriented cache provider.

mod backend;
pub mod codec;
mod options;
mod typed;

// Re-export public types
pub use backend::ByteCache;
pub use options::{EntryOptions, Expiration};
pub use typed::TypedCache;
