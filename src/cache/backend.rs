//! Byte Cache Module
//!
//! The byte-oriented capability the typed layer sits on. Transport,
//! storage and expiration all belong to the implementor.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::cache::EntryOptions;

// == Byte Cache ==
/// A key/byte-array cache with expiration support.
///
/// Implementations must treat the `cancel` token as advisory: return their
/// own error if they stop early, and never half-write an entry.
#[async_trait]
pub trait ByteCache: Send + Sync {
    /// Provider error, surfaced to callers unchanged.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Reads the payload stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Async counterpart of [`ByteCache::get`].
    async fn get_async(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Stores `value` under `key` with the given expiration.
    fn set(&self, key: &str, value: Vec<u8>, options: &EntryOptions) -> Result<(), Self::Error>;

    /// Async counterpart of [`ByteCache::set`].
    async fn set_async(
        &self,
        key: &str,
        value: Vec<u8>,
        options: &EntryOptions,
        cancel: &CancellationToken,
    ) -> Result<(), Self::Error>;
}

#[async_trait]
impl<C: ByteCache + ?Sized> ByteCache for Arc<C> {
    type Error = C::Error;

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        (**self).get(key)
    }

    async fn get_async(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<u8>>, Self::Error> {
        (**self).get_async(key, cancel).await
    }

    fn set(&self, key: &str, value: Vec<u8>, options: &EntryOptions) -> Result<(), Self::Error> {
        (**self).set(key, value, options)
    }

    async fn set_async(
        &self,
        key: &str,
        value: Vec<u8>,
        options: &EntryOptions,
        cancel: &CancellationToken,
    ) -> Result<(), Self::Error> {
        (**self).set_async(key, value, options, cancel).await
    }
}

#[async_trait]
impl<'a, C: ByteCache + ?Sized> ByteCache for &'a C {
    type Error = C::Error;

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        (**self).get(key)
    }

    async fn get_async(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<u8>>, Self::Error> {
        (**self).get_async(key, cancel).await
    }

    fn set(&self, key: &str, value: Vec<u8>, options: &EntryOptions) -> Result<(), Self::Error> {
        (**self).set(key, value, options)
    }

    async fn set_async(
        &self,
        key: &str,
        value: Vec<u8>,
        options: &EntryOptions,
        cancel: &CancellationToken,
    ) -> Result<(), Self::Error> {
        (**self).set_async(key, value, options, cancel).await
    }
}
