//! Package resolution against the local index.

use std::{cmp::Ordering, path::Path};

use crate::{
    error::{RegistryError, Result},
    index::{enumerate_leaves, read_leaf, IndexKey},
    package::PackageRecord,
    version::DebVersion,
};

/// A package record stamped with the provenance of the leaf it was
/// read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    pub key: IndexKey,
    pub record: PackageRecord,
}

/// Resolves a package name against the index tree under `root`.
///
/// `provider` and `distribution` narrow the scan; `None` means all.
/// With `exact` the name must match a record exactly, otherwise any
/// record whose name starts with `name` matches. Results are ordered by
/// Debian version, descending; records whose version fails to parse
/// never outrank a well-formed one.
///
/// Finding no leaves at all ("sync first") and finding no matching
/// record ("not found") are reported as distinct errors.
pub fn find_packages(
    name: &str,
    root: &Path,
    provider: Option<&str>,
    distribution: Option<&str>,
    exact: bool,
) -> Result<Vec<ResolvedPackage>> {
    let leaves = enumerate_leaves(
        root,
        provider.unwrap_or("*"),
        distribution.unwrap_or("*"),
    )?;

    if leaves.is_empty() {
        return Err(RegistryError::NotSynced);
    }

    let mut matches = Vec::new();

    for (key, leaf_path) in leaves {
        for record in read_leaf(&leaf_path)? {
            let hit = if exact {
                record.name == name
            } else {
                record.name.starts_with(name)
            };

            if hit {
                matches.push(ResolvedPackage {
                    key: key.clone(),
                    record,
                });
            }
        }
    }

    if matches.is_empty() {
        return Err(RegistryError::PackageNotFound(name.to_string()));
    }

    matches.sort_by(|a, b| compare_versions_descending(&a.record.version, &b.record.version));

    Ok(matches)
}

/// Orders by parsed Debian version, greatest first. Unparseable
/// versions sort after every well-formed one; ties keep their scan
/// order (the sort is stable).
fn compare_versions_descending(a: &str, b: &str) -> Ordering {
    match (DebVersion::parse(a), DebVersion::parse(b)) {
        (Some(va), Some(vb)) => vb.cmp(&va),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::write_leaf;

    fn record(name: &str, version: &str) -> PackageRecord {
        PackageRecord {
            name: name.to_string(),
            version: version.to_string(),
            url: format!("http://mirror/pool/{name}_{version}.deb"),
            ..Default::default()
        }
    }

    #[test]
    fn test_not_synced_is_distinct_from_not_found() {
        let dir = tempfile::tempdir().unwrap();

        let err = find_packages("widget", dir.path(), None, None, true).unwrap_err();
        assert!(matches!(err, RegistryError::NotSynced));

        write_leaf(
            dir.path(),
            &IndexKey::new("acme", "stable", "main"),
            &[record("other", "1.0")],
        )
        .unwrap();

        let err = find_packages("widget", dir.path(), None, None, true).unwrap_err();
        assert!(matches!(err, RegistryError::PackageNotFound(_)));
    }

    #[test]
    fn test_exact_vs_prefix_match() {
        let dir = tempfile::tempdir().unwrap();
        write_leaf(
            dir.path(),
            &IndexKey::new("acme", "stable", "main"),
            &[
                record("foo", "1.0"),
                record("foo-dev", "1.0"),
                record("foobar", "1.0"),
                record("unrelated", "1.0"),
            ],
        )
        .unwrap();

        let exact = find_packages("foo", dir.path(), None, None, true).unwrap();
        assert_eq!(exact.len(), 1);
        assert_eq!(exact[0].record.name, "foo");

        let prefixed = find_packages("foo", dir.path(), None, None, false).unwrap();
        let names: Vec<_> = prefixed.iter().map(|m| m.record.name.as_str()).collect();
        assert_eq!(names.len(), 3);
        assert!(names.contains(&"foo"));
        assert!(names.contains(&"foo-dev"));
        assert!(names.contains(&"foobar"));
    }

    #[test]
    fn test_results_ordered_by_version_descending() {
        let dir = tempfile::tempdir().unwrap();
        write_leaf(
            dir.path(),
            &IndexKey::new("acme", "stable", "main"),
            &[record("widget", "1.2.0"), record("widget", "0.9.5")],
        )
        .unwrap();
        write_leaf(
            dir.path(),
            &IndexKey::new("acme", "testing", "main"),
            &[record("widget", "1.10.0")],
        )
        .unwrap();

        let matches = find_packages("widget", dir.path(), None, None, true).unwrap();
        let versions: Vec<_> = matches.iter().map(|m| m.record.version.as_str()).collect();
        assert_eq!(versions, vec!["1.10.0", "1.2.0", "0.9.5"]);
    }

    #[test]
    fn test_malformed_version_never_outranks_well_formed() {
        let dir = tempfile::tempdir().unwrap();
        write_leaf(
            dir.path(),
            &IndexKey::new("acme", "stable", "main"),
            &[
                record("widget", "not-a-version"),
                record("widget", "0.1.0"),
            ],
        )
        .unwrap();

        let matches = find_packages("widget", dir.path(), None, None, true).unwrap();
        assert_eq!(matches[0].record.version, "0.1.0");
        assert_eq!(matches[1].record.version, "not-a-version");
    }

    #[test]
    fn test_provenance_stamped_from_leaf_path() {
        let dir = tempfile::tempdir().unwrap();
        write_leaf(
            dir.path(),
            &IndexKey::new("acme", "stable", "main"),
            &[record("widget", "2.0-1")],
        )
        .unwrap();

        let matches = find_packages("widget", dir.path(), None, None, true).unwrap();
        assert_eq!(matches[0].key, IndexKey::new("acme", "stable", "main"));
    }

    #[test]
    fn test_provider_and_distribution_filters() {
        let dir = tempfile::tempdir().unwrap();
        write_leaf(
            dir.path(),
            &IndexKey::new("acme", "stable", "main"),
            &[record("widget", "1.0")],
        )
        .unwrap();
        write_leaf(
            dir.path(),
            &IndexKey::new("globex", "rolling", "main"),
            &[record("widget", "2.0")],
        )
        .unwrap();

        let scoped = find_packages("widget", dir.path(), Some("acme"), None, true).unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].key.provider, "acme");

        let scoped =
            find_packages("widget", dir.path(), Some("globex"), Some("rolling"), true).unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].record.version, "2.0");
    }
}
