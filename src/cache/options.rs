//! Entry Options Module
//!
//! Describes when a cache entry becomes invalid. The provider decides
//! precedence when several fields are populated.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Entry Options ==
/// Expiration settings handed to the byte cache with every write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryOptions {
    /// Absolute point in time after which the entry is invalid
    pub absolute_expiration: Option<DateTime<Utc>>,
    /// Lifetime measured from the moment of the write
    pub absolute_expiration_relative_to_now: Option<Duration>,
    /// Entry is invalid once it goes this long without being read
    pub sliding_expiration: Option<Duration>,
}

impl EntryOptions {
    // == Constructor ==
    /// Creates empty options, meaning "use the provider default".
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when no expiration field is set.
    pub fn is_empty(&self) -> bool {
        self.absolute_expiration.is_none()
            && self.absolute_expiration_relative_to_now.is_none()
            && self.sliding_expiration.is_none()
    }

    // == Setters ==
    pub fn set_absolute_expiration(&mut self, at: DateTime<Utc>) -> &mut Self {
        self.absolute_expiration = Some(at);
        self
    }

    pub fn set_absolute_expiration_relative_to_now(&mut self, ttl: Duration) -> &mut Self {
        self.absolute_expiration_relative_to_now = Some(ttl);
        self
    }

    pub fn set_sliding_expiration(&mut self, window: Duration) -> &mut Self {
        self.sliding_expiration = Some(window);
        self
    }

    // == Builders ==
    pub fn with_absolute_expiration(mut self, at: DateTime<Utc>) -> Self {
        self.set_absolute_expiration(at);
        self
    }

    pub fn with_absolute_expiration_relative_to_now(mut self, ttl: Duration) -> Self {
        self.set_absolute_expiration_relative_to_now(ttl);
        self
    }

    pub fn with_sliding_expiration(mut self, window: Duration) -> Self {
        self.set_sliding_expiration(window);
        self
    }

    // == Validate ==
    /// Checks that relative windows are strictly positive.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.absolute_expiration_relative_to_now == Some(Duration::ZERO) {
            return Err("Relative expiration must be a positive duration".to_string());
        }
        if self.sliding_expiration == Some(Duration::ZERO) {
            return Err("Sliding expiration must be a positive duration".to_string());
        }
        Ok(())
    }

    // == Expires At ==
    /// Resolves the absolute deadline for an entry written at `now`.
    ///
    /// When both an absolute timestamp and a relative window are set the
    /// earlier of the two wins. Sliding expiration is not included since it
    /// depends on reads. Returns `None` if neither absolute field is set.
    pub fn expires_at(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let relative = self
            .absolute_expiration_relative_to_now
            .and_then(|ttl| chrono::Duration::from_std(ttl).ok())
            .and_then(|ttl| now.checked_add_signed(ttl));

        match (self.absolute_expiration, relative) {
            (Some(at), Some(rel)) => Some(at.min(rel)),
            (at, rel) => at.or(rel),
        }
    }
}

// == Expiration ==
/// The three ways a write can express its expiration.
///
/// `set` and `set_async` take `impl Into<Expiration>`, so callers pass a
/// timestamp, a duration, or a full [`EntryOptions`] directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expiration {
    /// Expire at an absolute point in time
    At(DateTime<Utc>),
    /// Expire after a duration measured from the write
    After(Duration),
    /// Full options object
    Options(EntryOptions),
}

impl Expiration {
    /// Converts into the options object handed to the provider.
    pub fn into_options(self) -> EntryOptions {
        match self {
            Expiration::At(at) => EntryOptions::new().with_absolute_expiration(at),
            Expiration::After(ttl) => {
                EntryOptions::new().with_absolute_expiration_relative_to_now(ttl)
            }
            Expiration::Options(options) => options,
        }
    }
}

impl From<DateTime<Utc>> for Expiration {
    fn from(at: DateTime<Utc>) -> Self {
        Expiration::At(at)
    }
}

impl From<Duration> for Expiration {
    fn from(ttl: Duration) -> Self {
        Expiration::After(ttl)
    }
}

impl From<EntryOptions> for Expiration {
    fn from(options: EntryOptions) -> Self {
        Expiration::Options(options)
    }
}

impl From<&EntryOptions> for Expiration {
    fn from(options: &EntryOptions) -> Self {
        Expiration::Options(options.clone())
    }
}
