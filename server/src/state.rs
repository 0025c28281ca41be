//! Application state management.

use std::path::PathBuf;
use std::sync::Arc;

use keybridge_codec::FileDecoder;
use keybridge_vault::VaultStore;

/// Global application state shared by all request handlers.
pub struct AppState {
    /// The vault store; searches and reloads go through it.
    pub store: VaultStore,
    /// Path of the container file reloads are read from.
    pub vault_path: PathBuf,
}

impl AppState {
    /// Create state backed by the file decoder.
    pub fn new(vault_path: PathBuf) -> Self {
        Self {
            store: VaultStore::new(Arc::new(FileDecoder::new())),
            vault_path,
        }
    }
}
