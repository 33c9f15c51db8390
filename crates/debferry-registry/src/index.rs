//! The local index: a directory tree of compressed package listings.
//!
//! The index is a filesystem convention, not a database. Each leaf at
//! `root/provider/distribution/component.json.zst` holds a
//! zstd-compressed JSON array of [`PackageRecord`]s. The tree is the
//! sole persistent state of the system: only the synchronizer writes it,
//! only the resolver reads it, and no two sync tasks ever target the
//! same leaf because the fan-out unit is exactly one
//! (provider, distribution, component) triple.

use std::{
    fs,
    path::{Path, PathBuf},
};

use debferry_utils::{fs::ensure_dir_exists, path::strip_extensions};
use glob::glob;

use crate::{
    error::{ErrorContext, RegistryError, Result},
    package::PackageRecord,
};

/// Extension of an index leaf: JSON serialization, zstd-wrapped.
pub const LEAF_EXTENSION: &str = "json.zst";

const LEAF_ZSTD_LEVEL: i32 = 19;

/// Identity of one index leaf, computed once when a leaf is enumerated
/// and carried alongside its records as provenance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexKey {
    pub provider: String,
    pub distribution: String,
    pub component: String,
}

impl IndexKey {
    pub fn new(
        provider: impl Into<String>,
        distribution: impl Into<String>,
        component: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            distribution: distribution.into(),
            component: component.into(),
        }
    }

    /// Path of this leaf under the given index root.
    pub fn leaf_path(&self, root: &Path) -> PathBuf {
        root.join(&self.provider)
            .join(&self.distribution)
            .join(format!("{}.{LEAF_EXTENSION}", self.component))
    }

    /// Reconstructs the key from a leaf path: the file name minus its
    /// extensions is the component, the parent directory the
    /// distribution, the grandparent the provider.
    pub fn from_leaf_path(path: &Path) -> Option<Self> {
        let component = strip_extensions(path.file_name()?.to_str()?, 2);
        let distribution_dir = path.parent()?;
        let provider_dir = distribution_dir.parent()?;

        Some(Self::new(
            provider_dir.file_name()?.to_str()?,
            distribution_dir.file_name()?.to_str()?,
            component,
        ))
    }
}

impl std::fmt::Display for IndexKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.provider, self.distribution, self.component
        )
    }
}

/// Serializes and persists one leaf, fully replacing any previous
/// content. Metadata fields only; provenance lives in the path.
pub fn write_leaf(root: &Path, key: &IndexKey, records: &[PackageRecord]) -> Result<()> {
    let path = key.leaf_path(root);
    if let Some(parent) = path.parent() {
        ensure_dir_exists(parent)?;
    }

    let serialized = serde_json::to_vec(records)?;
    let compressed = zstd::encode_all(serialized.as_slice(), LEAF_ZSTD_LEVEL)
        .with_context(|| format!("compressing index leaf {key}"))?;

    fs::write(&path, compressed).with_context(|| format!("writing index leaf {}", path.display()))
}

/// Loads one leaf back into records.
pub fn read_leaf(path: &Path) -> Result<Vec<PackageRecord>> {
    let compressed =
        fs::read(path).with_context(|| format!("reading index leaf {}", path.display()))?;
    let serialized = zstd::decode_all(compressed.as_slice())
        .with_context(|| format!("decompressing index leaf {}", path.display()))?;

    Ok(serde_json::from_slice(&serialized)?)
}

/// Enumerates index leaves under `root`, optionally narrowed to one
/// provider and/or distribution. `*` means "all". A missing or empty
/// tree yields no leaves; callers decide whether that means "not yet
/// synced".
pub fn enumerate_leaves(
    root: &Path,
    provider_filter: &str,
    distribution_filter: &str,
) -> Result<Vec<(IndexKey, PathBuf)>> {
    let pattern = root
        .join(provider_filter)
        .join(distribution_filter)
        .join(format!("*.{LEAF_EXTENSION}"));

    let paths = glob(&pattern.to_string_lossy()).map_err(|err| RegistryError::IoError {
        action: format!("globbing index leaves under {}", root.display()),
        source: std::io::Error::other(err),
    })?;

    let mut leaves = Vec::new();
    for entry in paths {
        let path = entry.map_err(|err| RegistryError::IoError {
            action: format!("globbing index leaves under {}", root.display()),
            source: err.into_error(),
        })?;

        if let Some(key) = IndexKey::from_leaf_path(&path) {
            leaves.push((key, path));
        }
    }

    Ok(leaves)
}
