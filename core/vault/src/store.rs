//! Concurrency-safe holder of the current hierarchy.
//!
//! The store owns the only piece of shared mutable state in the engine: a
//! reference to the hierarchy produced by the most recent successful load.
//! Reloads swap that reference atomically; searches run against an `Arc`
//! snapshot taken under the read lock, so an in-flight search keeps
//! observing its hierarchy even while a reload replaces it.

use std::path::Path;
use std::sync::{Arc, RwLock};

use crate::hierarchy::{Entry, Hierarchy};
use crate::search::{self, Criteria};
use keybridge_common::Result;

/// Capability to decode a vault container into a hierarchy.
///
/// Implementations report failures as `Io` (unreadable file), `Auth`
/// (password rejected), or `Format` (malformed container).
pub trait VaultDecoder: Send + Sync {
    /// Decode the container at `path` using `password`.
    fn decode(&self, path: &Path, password: &str) -> Result<Hierarchy>;
}

/// Holder of the current hierarchy, exposing atomic reload and search.
pub struct VaultStore {
    decoder: Arc<dyn VaultDecoder>,
    current: RwLock<Arc<Hierarchy>>,
}

impl VaultStore {
    /// Create a store with no loaded vault.
    ///
    /// Searches against the initial empty hierarchy miss; the first
    /// successful [`load`](Self::load) makes real data visible.
    pub fn new(decoder: Arc<dyn VaultDecoder>) -> Self {
        Self {
            decoder,
            current: RwLock::new(Arc::new(Hierarchy::empty())),
        }
    }

    /// Decode the container and atomically replace the current hierarchy.
    ///
    /// The decode runs entirely outside the lock; concurrent searches are
    /// only blocked for the duration of the pointer swap. On any decode
    /// failure the previous hierarchy remains authoritative.
    ///
    /// # Errors
    /// - `Io`, `Auth`, or `Format` as reported by the decoder
    pub fn load(&self, path: &Path, password: &str) -> Result<()> {
        let hierarchy = Arc::new(self.decoder.decode(path, password)?);

        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = hierarchy;

        Ok(())
    }

    /// Search the current hierarchy for the first entry matching `criteria`.
    ///
    /// Takes a snapshot under the read lock, releases it, and walks the
    /// snapshot; a reload finishing mid-search does not affect the result.
    ///
    /// # Errors
    /// - `EntryNotFound` if no entry matches
    pub fn search(&self, criteria: &Criteria) -> Result<Entry> {
        let snapshot = self.snapshot();
        search::find_match(snapshot.root(), criteria).cloned()
    }

    /// The hierarchy snapshot a search started now would observe.
    ///
    /// The lock is held only for the `Arc` clone; the snapshot stays valid
    /// after any number of subsequent reloads.
    pub fn snapshot(&self) -> Arc<Hierarchy> {
        // A writer only ever assigns the Arc, so a poisoned lock still
        // guards a fully consistent value.
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
