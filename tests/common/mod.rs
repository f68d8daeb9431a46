//! Shared test helpers
//!
//! An in-memory [`ByteCache`] that records every call made to it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use typed_cache::{ByteCache, CancellationToken, EntryOptions};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub id: u32,
    pub name: String,
}

pub fn ada() -> User {
    User {
        id: 42,
        name: "Ada".to_string(),
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordingError {
    #[error("provider unavailable")]
    Unavailable,
    #[error("provider call cancelled")]
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct StoredEntry {
    pub value: Vec<u8>,
    pub options: EntryOptions,
    pub expires_at: Option<DateTime<Utc>>,
}

/// In-memory byte cache counting reads and writes.
#[derive(Debug, Default)]
pub struct RecordingCache {
    entries: Mutex<HashMap<String, StoredEntry>>,
    gets: AtomicUsize,
    sets: AtomicUsize,
    failing: AtomicBool,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds raw bytes without counting a write.
    pub fn seed(&self, key: &str, value: &[u8]) {
        self.entries.lock().unwrap().insert(
            key.to_string(),
            StoredEntry {
                value: value.to_vec(),
                options: EntryOptions::new(),
                expires_at: None,
            },
        );
    }

    pub fn entry(&self, key: &str) -> Option<StoredEntry> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn set_calls(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    /// Makes every subsequent call fail with [`RecordingError::Unavailable`].
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, RecordingError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(RecordingError::Unavailable);
        }

        let mut entries = self.entries.lock().unwrap();
        let expired = entries
            .get(key)
            .and_then(|entry| entry.expires_at)
            .map(|at| Utc::now() >= at)
            .unwrap_or(false);
        if expired {
            entries.remove(key);
            return Ok(None);
        }
        Ok(entries.get(key).map(|entry| entry.value.clone()))
    }

    fn write(&self, key: &str, value: Vec<u8>, options: &EntryOptions) -> Result<(), RecordingError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(RecordingError::Unavailable);
        }

        let entry = StoredEntry {
            value,
            options: options.clone(),
            expires_at: options.expires_at(Utc::now()),
        };
        self.entries.lock().unwrap().insert(key.to_string(), entry);
        Ok(())
    }
}

#[async_trait]
impl ByteCache for RecordingCache {
    type Error = RecordingError;

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, Self::Error> {
        self.read(key)
    }

    async fn get_async(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<Option<Vec<u8>>, Self::Error> {
        if cancel.is_cancelled() {
            return Err(RecordingError::Cancelled);
        }
        tokio::task::yield_now().await;
        self.read(key)
    }

    fn set(&self, key: &str, value: Vec<u8>, options: &EntryOptions) -> Result<(), Self::Error> {
        self.write(key, value, options)
    }

    async fn set_async(
        &self,
        key: &str,
        value: Vec<u8>,
        options: &EntryOptions,
        cancel: &CancellationToken,
    ) -> Result<(), Self::Error> {
        if cancel.is_cancelled() {
            return Err(RecordingError::Cancelled);
        }
        tokio::task::yield_now().await;
        self.write(key, value, options)
    }
}

/// Installs a test subscriber once; respects `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
