//! Typed Cache Module
//!
//! Typed get/set/get-or-create operations layered over a [`ByteCache`].
//! Values cross the boundary as UTF-8 JSON text.

use futures::future::BoxFuture;
use serde::{de::DeserializeOwned, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::cache::{codec, ByteCache, EntryOptions, Expiration};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Typed Cache ==
/// Typed adapter over a byte-oriented cache.
///
/// Holds no mutable state: every call is an independent read-then-maybe-write
/// against the provider. Concurrent [`get_or_create_async`](Self::get_or_create_async)
/// calls for the same key are not coordinated, so both may run their
/// producer and the last write wins.
#[derive(Debug, Clone)]
pub struct TypedCache<C> {
    /// Underlying byte cache
    cache: C,
    /// Key prefix and default expiration
    config: CacheConfig,
}

impl<C: ByteCache> TypedCache<C> {
    // == Constructor ==
    /// Creates a new TypedCache with the default configuration.
    pub fn new(cache: C) -> Self {
        Self::with_config(cache, CacheConfig::default())
    }

    /// Creates a new TypedCache with the given configuration.
    pub fn with_config(cache: C, config: CacheConfig) -> Self {
        Self { cache, config }
    }

    /// Returns the underlying byte cache.
    pub fn inner(&self) -> &C {
        &self.cache
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // == Get ==
    /// Retrieves and decodes the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key is absent. Fails with
    /// [`CacheError::Deserialization`] if the stored bytes are not valid
    /// JSON for `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, C::Error> {
        let cache_key = self.config.cache_key(key);
        match self.cache.get(&cache_key).map_err(CacheError::Backend)? {
            Some(payload) => {
                debug!("Cache hit for key '{}'", cache_key);
                Self::decode_payload(key, &payload).map(Some)
            }
            None => {
                debug!("Cache miss for key '{}'", cache_key);
                Ok(None)
            }
        }
    }

    /// Async counterpart of [`get`](Self::get).
    pub async fn get_async<T: DeserializeOwned>(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<T>, C::Error> {
        Self::ensure_not_cancelled(cancel)?;

        let cache_key = self.config.cache_key(key);
        match self
            .cache
            .get_async(&cache_key, cancel)
            .await
            .map_err(CacheError::Backend)?
        {
            Some(payload) => {
                debug!("Cache hit for key '{}'", cache_key);
                Self::decode_payload(key, &payload).map(Some)
            }
            None => {
                debug!("Cache miss for key '{}'", cache_key);
                Ok(None)
            }
        }
    }

    // == Get Or Create ==
    /// Returns the cached value for `key`, producing and storing it on a miss.
    ///
    /// On a miss the producer receives the entry options (seeded from the
    /// configured defaults) and may adjust them before its value is written.
    /// A producer yielding `None` writes nothing and `None` is returned.
    /// A producer error is returned as [`CacheError::Producer`].
    ///
    /// # Example
    /// ```ignore
    /// let user = cache
    ///     .get_or_create_async("user:1", |options| {
    ///         async move {
    ///             options.set_sliding_expiration(Duration::from_secs(60));
    ///             Ok(Some(load_user(1).await?))
    ///         }
    ///         .boxed()
    ///     }, &cancel)
    ///     .await?;
    /// ```
    pub async fn get_or_create_async<T, F>(
        &self,
        key: &str,
        producer: F,
        cancel: &CancellationToken,
    ) -> Result<Option<T>, C::Error>
    where
        T: Serialize + DeserializeOwned,
        F: for<'o> FnOnce(&'o mut EntryOptions) -> BoxFuture<'o, anyhow::Result<Option<T>>>,
    {
        Self::ensure_not_cancelled(cancel)?;

        let cache_key = self.config.cache_key(key);
        if let Some(payload) = self
            .cache
            .get_async(&cache_key, cancel)
            .await
            .map_err(CacheError::Backend)?
        {
            debug!("Cache hit for key '{}'", cache_key);
            return Self::decode_payload(key, &payload).map(Some);
        }

        debug!("Cache miss for key '{}', invoking producer", cache_key);
        let mut options = self.config.default_entry_options();
        let produced = producer(&mut options)
            .await
            .map_err(CacheError::<C::Error>::Producer)?;

        let value = match produced {
            Some(value) => value,
            None => {
                debug!("Producer returned no value for key '{}'", cache_key);
                return Ok(None);
            }
        };

        let payload = match Self::encode_payload(key, &value)? {
            Some(payload) => payload,
            None => {
                debug!("Producer returned an absent value for key '{}'", cache_key);
                return Ok(Some(value));
            }
        };
        options.validate().map_err(CacheError::<C::Error>::InvalidArgument)?;

        // Never write once the caller has given up
        Self::ensure_not_cancelled(cancel)?;
        self.cache
            .set_async(&cache_key, payload, &options, cancel)
            .await
            .map_err(CacheError::Backend)?;
        debug!("Stored produced value for key '{}'", cache_key);

        Ok(Some(value))
    }

    /// Synchronous counterpart of [`get_or_create_async`](Self::get_or_create_async).
    pub fn get_or_create<T, F>(&self, key: &str, producer: F) -> Result<Option<T>, C::Error>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut EntryOptions) -> anyhow::Result<Option<T>>,
    {
        let cache_key = self.config.cache_key(key);
        if let Some(payload) = self.cache.get(&cache_key).map_err(CacheError::Backend)? {
            debug!("Cache hit for key '{}'", cache_key);
            return Self::decode_payload(key, &payload).map(Some);
        }

        debug!("Cache miss for key '{}', invoking producer", cache_key);
        let mut options = self.config.default_entry_options();
        let value = match producer(&mut options).map_err(CacheError::<C::Error>::Producer)? {
            Some(value) => value,
            None => {
                debug!("Producer returned no value for key '{}'", cache_key);
                return Ok(None);
            }
        };

        let payload = match Self::encode_payload(key, &value)? {
            Some(payload) => payload,
            None => return Ok(Some(value)),
        };
        options.validate().map_err(CacheError::<C::Error>::InvalidArgument)?;

        self.cache
            .set(&cache_key, payload, &options)
            .map_err(CacheError::Backend)?;
        debug!("Stored produced value for key '{}'", cache_key);

        Ok(Some(value))
    }

    // == Set ==
    /// Encodes and stores `value` under `key`.
    ///
    /// `expiration` may be an absolute `DateTime<Utc>`, a relative
    /// `Duration`, or a full [`EntryOptions`].
    ///
    /// # Errors
    /// [`CacheError::InvalidArgument`] if `value` is absent (encodes to JSON
    /// `null`) or the expiration is invalid. The provider is not called in
    /// either case.
    pub fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        expiration: impl Into<Expiration>,
    ) -> Result<(), C::Error> {
        let payload = Self::require_present(key, value)?;
        let options = expiration.into().into_options();
        options.validate().map_err(CacheError::<C::Error>::InvalidArgument)?;

        let cache_key = self.config.cache_key(key);
        self.cache
            .set(&cache_key, payload, &options)
            .map_err(CacheError::Backend)?;
        debug!("Stored value for key '{}'", cache_key);

        Ok(())
    }

    /// Async counterpart of [`set`](Self::set).
    pub async fn set_async<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        expiration: impl Into<Expiration>,
        cancel: &CancellationToken,
    ) -> Result<(), C::Error> {
        let payload = Self::require_present(key, value)?;
        let options = expiration.into().into_options();
        options.validate().map_err(CacheError::<C::Error>::InvalidArgument)?;
        Self::ensure_not_cancelled(cancel)?;

        let cache_key = self.config.cache_key(key);
        self.cache
            .set_async(&cache_key, payload, &options, cancel)
            .await
            .map_err(CacheError::Backend)?;
        debug!("Stored value for key '{}'", cache_key);

        Ok(())
    }
}

// == Helpers ==
impl<C: ByteCache> TypedCache<C> {
    fn decode_payload<T: DeserializeOwned>(key: &str, payload: &[u8]) -> Result<T, C::Error> {
        codec::decode(payload).map_err(|source| CacheError::Deserialization {
            key: key.to_string(),
            source,
        })
    }

    /// Encodes `value`, returning `None` if it is absent.
    fn encode_payload<T: Serialize + ?Sized>(
        key: &str,
        value: &T,
    ) -> Result<Option<Vec<u8>>, C::Error> {
        let payload = codec::encode(value).map_err(|source| CacheError::<C::Error>::Serialization {
            key: key.to_string(),
            source,
        })?;
        if codec::is_absent(&payload) {
            Ok(None)
        } else {
            Ok(Some(payload))
        }
    }

    fn require_present<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<Vec<u8>, C::Error> {
        Self::encode_payload(key, value)?.ok_or_else(|| {
            warn!("Rejected absent value for key '{}'", key);
            CacheError::InvalidArgument(format!("Value for key '{}' must not be absent", key))
        })
    }

    fn ensure_not_cancelled(cancel: &CancellationToken) -> Result<(), C::Error> {
        if cancel.is_cancelled() {
            return Err(CacheError::Cancelled);
        }
        Ok(())
    }
}
