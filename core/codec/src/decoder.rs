//! File-backed container decoder.

use std::path::Path;

use tracing::{debug, info};

use crate::container;
use keybridge_common::Result;
use keybridge_vault::{Hierarchy, VaultDecoder};

/// Decoder reading containers from the local filesystem.
///
/// This is the production implementation of [`VaultDecoder`]: it reads the
/// whole file, then opens it as a container. Failures map onto the three
/// load-failure kinds (`Io` for an unreadable file, `Auth` for a rejected
/// password, `Format` for anything malformed).
#[derive(Debug, Default, Clone, Copy)]
pub struct FileDecoder;

impl FileDecoder {
    /// Create a file decoder.
    pub fn new() -> Self {
        Self
    }
}

impl VaultDecoder for FileDecoder {
    fn decode(&self, path: &Path, password: &str) -> Result<Hierarchy> {
        debug!(path = %path.display(), "Decoding vault container");

        let bytes = std::fs::read(path)?;
        let hierarchy = container::open(&bytes, password)?;

        info!(
            path = %path.display(),
            groups = hierarchy.group_count(),
            entries = hierarchy.entry_count(),
            "Vault container decoded"
        );

        Ok(hierarchy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::KdfParams;
    use keybridge_common::Error;
    use keybridge_vault::{Entry, Group};
    use std::collections::HashMap;

    fn fast_params() -> KdfParams {
        KdfParams {
            memory_cost: 8,
            time_cost: 1,
            parallelism: 1,
        }
    }

    fn sample_hierarchy() -> Hierarchy {
        let mut fields = HashMap::new();
        fields.insert("Title".to_string(), "Bank".to_string());
        Hierarchy::new(Group::new("Root", vec![Entry::new(fields)], Vec::new()))
    }

    #[test]
    fn test_decode_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.kbv");

        let sealed = container::seal(&sample_hierarchy(), "pw", fast_params()).unwrap();
        std::fs::write(&path, sealed).unwrap();

        let hierarchy = FileDecoder::new().decode(&path, "pw").unwrap();
        assert_eq!(hierarchy.entry_count(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.kbv");

        let err = FileDecoder::new().decode(&path, "pw").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_non_container_file_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vault.kbv");
        std::fs::write(&path, b"definitely not a container").unwrap();

        let err = FileDecoder::new().decode(&path, "pw").unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }
}
