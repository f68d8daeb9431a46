//! Configuration Module
//!
//! Handles loading typed cache settings from environment variables.

use std::env;
use std::time::Duration;

use crate::cache::EntryOptions;

/// Typed cache configuration parameters.
///
/// Every field is optional; the default leaves key names untouched and
/// expiration up to the cache provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheConfig {
    /// Prefix prepended to every key before it reaches the provider
    pub key_prefix: Option<String>,
    /// Default TTL in seconds, relative to the time of the write
    pub default_ttl: Option<u64>,
    /// Default sliding expiration window in seconds
    pub sliding_ttl: Option<u64>,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `TYPED_CACHE_KEY_PREFIX` - Key prefix (default: none)
    /// - `TYPED_CACHE_DEFAULT_TTL` - Relative TTL in seconds (default: provider default)
    /// - `TYPED_CACHE_SLIDING_TTL` - Sliding window in seconds (default: provider default)
    ///
    /// Empty prefixes and zero or unparsable durations are ignored.
    pub fn from_env() -> Self {
        Self {
            key_prefix: env::var("TYPED_CACHE_KEY_PREFIX")
                .ok()
                .filter(|v| !v.is_empty()),
            default_ttl: seconds_from_env("TYPED_CACHE_DEFAULT_TTL"),
            sliding_ttl: seconds_from_env("TYPED_CACHE_SLIDING_TTL"),
        }
    }

    /// Sets the key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Sets the default relative TTL in seconds.
    pub fn with_default_ttl(mut self, seconds: u64) -> Self {
        self.default_ttl = Some(seconds);
        self
    }

    /// Sets the default sliding window in seconds.
    pub fn with_sliding_ttl(mut self, seconds: u64) -> Self {
        self.sliding_ttl = Some(seconds);
        self
    }

    /// Builds the options a get-or-create producer starts from.
    pub fn default_entry_options(&self) -> EntryOptions {
        let mut options = EntryOptions::new();
        if let Some(ttl) = self.default_ttl.filter(|s| *s > 0) {
            options.set_absolute_expiration_relative_to_now(Duration::from_secs(ttl));
        }
        if let Some(sliding) = self.sliding_ttl.filter(|s| *s > 0) {
            options.set_sliding_expiration(Duration::from_secs(sliding));
        }
        options
    }

    /// Applies the configured prefix to a caller key.
    pub fn cache_key(&self, key: &str) -> String {
        match &self.key_prefix {
            Some(prefix) => format!("{}{}", prefix, key),
            None => key.to_string(),
        }
    }
}

fn seconds_from_env(name: &str) -> Option<u64> {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|s: &u64| *s > 0)
}
