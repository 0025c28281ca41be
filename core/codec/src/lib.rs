//! Vault container codec for KeyBridge.
//!
//! A container is a single password-sealed file holding one serialized
//! hierarchy. Sealing and opening are whole-file operations; a container
//! either decodes completely or not at all, which is what lets the store
//! treat every reload as all-or-nothing.

pub mod cipher;
pub mod container;
pub mod decoder;

pub use cipher::KdfParams;
pub use container::{open, seal, ContainerHeader, ContainerVersion};
pub use decoder::FileDecoder;
