//! Package metadata structures.
//!
//! [`PackageRecord`] is the unit of metadata and of installation intent:
//! it is what the control-file parser and custom listings produce, what
//! the local index persists, and what the installation pipeline consumes.
//! Provenance is never serialized — it is reconstructed from the index
//! path when a record is read back out.

use serde::{Deserialize, Serialize};

/// One resolvable/installable package's metadata.
///
/// Exactly one of `url`/`path` is the authoritative artifact source when
/// a record enters the installation pipeline. Records read from the
/// index always carry `url`; ad hoc file installs carry `path`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sha256: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub post_install_hooks: Vec<PostInstallHook>,
}

/// A named group of commands to run after a successful install, declared
/// by custom pre-built listings. Control files never carry hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostInstallHook {
    pub name: String,
    pub commands: Vec<HookCommand>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookCommand {
    /// Run the command with the privilege-elevation prefix.
    #[serde(default)]
    pub elevate: bool,
    pub command: String,
}

impl PackageRecord {
    /// Constructs an ad hoc record for a direct URL install.
    pub fn from_url(url: &str) -> Self {
        Self {
            name: stem_of(url),
            url: url.to_string(),
            ..Default::default()
        }
    }

    /// Constructs an ad hoc record for a local file install.
    pub fn from_path(path: &str) -> Self {
        Self {
            name: stem_of(path),
            path: path.to_string(),
            ..Default::default()
        }
    }
}

fn stem_of(location: &str) -> String {
    let base = location
        .rsplit('/')
        .next()
        .unwrap_or(location);
    debferry_utils::path::strip_extension(base).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_url_names_by_stem() {
        let record = PackageRecord::from_url("https://mirror.example.com/pool/widget_2.0.deb");
        assert_eq!(record.name, "widget_2.0");
        assert_eq!(record.url, "https://mirror.example.com/pool/widget_2.0.deb");
        assert!(record.path.is_empty());
    }

    #[test]
    fn test_from_path_names_by_stem() {
        let record = PackageRecord::from_path("/downloads/widget_2.0.deb");
        assert_eq!(record.name, "widget_2.0");
        assert_eq!(record.path, "/downloads/widget_2.0.deb");
        assert!(record.url.is_empty());
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let record = PackageRecord {
            name: "widget".to_string(),
            version: "2.0-1".to_string(),
            url: "http://mirror/pool/widget_2.0.deb".to_string(),
            ..Default::default()
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("sha256"));
        assert!(!json.contains("path"));
        assert!(!json.contains("post_install_hooks"));

        let parsed: PackageRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }

    #[test]
    fn test_hook_elevate_defaults_to_false() {
        let json = r#"{"name":"w","commands":[{"command":"echo done"}]}"#;
        let hook: PostInstallHook = serde_json::from_str(json).unwrap();
        assert!(!hook.commands[0].elevate);
    }
}
