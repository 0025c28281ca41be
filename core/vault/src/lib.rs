//! Vault engine for KeyBridge.
//!
//! This module provides:
//! - The immutable secrets hierarchy produced by one container decode
//! - Deterministic multi-field entry search over the hierarchy
//! - The concurrency-safe store holding the current hierarchy snapshot
//!
//! # Architecture
//! The vault module sits between the transport layer and the container
//! decoder. A decode produces a [`Hierarchy`] wholesale; the [`VaultStore`]
//! swaps it in atomically, and searches run against cheap immutable
//! snapshots that stay valid across concurrent reloads.

pub mod hierarchy;
pub mod search;
pub mod store;

pub use hierarchy::{Entry, Group, Hierarchy};
pub use search::{find_match, Criteria};
pub use store::{VaultDecoder, VaultStore};
