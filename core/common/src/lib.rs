//! Common error types shared across KeyBridge crates.

pub mod error;

pub use error::{Error, Result};
