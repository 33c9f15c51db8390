//! Repository synchronization.
//!
//! Providers are processed strictly sequentially; within one provider,
//! every (distribution, component) pair becomes its own blocking task in
//! a [`JoinSet`]. All tasks run to completion — nothing is cancelled on
//! failure, so no leaf is ever left half-written by an abort — and the
//! first collected error decides the provider's outcome.

use std::path::{Path, PathBuf};

use debferry_config::arch::Architecture;
use debferry_dl::{download::Download, http::probe_package_index};
use debferry_utils::fs::safe_remove;
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::{
    control::parse_control_file,
    error::{RegistryError, Result},
    index::{read_leaf, write_leaf, IndexKey},
    manifest::{Provider, ProviderManifest},
    package::PackageRecord,
};

pub struct Synchronizer {
    architecture: Architecture,
    manifest_base: String,
}

impl Synchronizer {
    pub fn new(architecture: Architecture, manifest_base: impl Into<String>) -> Self {
        Self {
            architecture,
            manifest_base: manifest_base.into(),
        }
    }

    /// Fetches the provider manifest for the configured architecture.
    pub async fn fetch_manifest(&self) -> Result<ProviderManifest> {
        let manifest_base = self.manifest_base.clone();
        let architecture = self.architecture.as_str();

        tokio::task::spawn_blocking(move || ProviderManifest::fetch(&manifest_base, architecture))
            .await
            .unwrap_or_else(|err| Err(RegistryError::TaskPanicked(err.to_string())))
    }

    /// Refreshes every (distribution, component) leaf under the selected
    /// providers. An empty `selected` slice means all providers.
    pub async fn sync(&self, root: &Path, selected: &[String]) -> Result<()> {
        let manifest = self.fetch_manifest().await?;

        for name in selected {
            if !manifest.providers.iter().any(|p| p.name == *name) {
                return Err(RegistryError::UnknownProvider(name.clone()));
            }
        }

        for provider in &manifest.providers {
            if !selected.is_empty() && !selected.contains(&provider.name) {
                continue;
            }
            self.sync_provider(root, provider).await?;
        }

        Ok(())
    }

    /// Syncs one provider's leaves concurrently and joins them all.
    pub async fn sync_provider(&self, root: &Path, provider: &Provider) -> Result<()> {
        info!("Syncing provider {}", provider.name);

        let mut tasks: JoinSet<Result<()>> = JoinSet::new();

        for distribution in &provider.distributions {
            for component in &provider.components {
                let task = SyncTask {
                    key: IndexKey::new(&provider.name, distribution, component),
                    metadata_url: provider.metadata_url(
                        &self.manifest_base,
                        distribution,
                        component,
                    ),
                    url_prefix: provider.url.clone(),
                    custom: provider.custom,
                    root: root.to_path_buf(),
                };
                tasks.spawn_blocking(move || task.run());
            }
        }

        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            let result =
                joined.unwrap_or_else(|err| Err(RegistryError::TaskPanicked(err.to_string())));

            if let Err(err) = result {
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

struct SyncTask {
    key: IndexKey,
    metadata_url: String,
    url_prefix: String,
    custom: bool,
    root: PathBuf,
}

impl SyncTask {
    fn run(self) -> Result<()> {
        if self.custom {
            return self.sync_custom();
        }

        let records = match self.fetch_apt()? {
            Some(records) => records,
            None => {
                debug!("No package listing for {} at any suffix", self.key);
                return Ok(());
            }
        };

        // an empty component leaves no file behind, so a stale empty
        // leaf can never mask an earlier successful sync
        if records.is_empty() {
            debug!("Component {} is empty, skipping write", self.key);
            return Ok(());
        }

        write_leaf(&self.root, &self.key, &records)
    }

    fn fetch_apt(&self) -> Result<Option<Vec<PackageRecord>>> {
        match probe_package_index(&self.metadata_url)? {
            Some((final_url, content)) => {
                info!("Syncing repository {final_url}");
                let content = String::from_utf8_lossy(&content);
                Ok(Some(parse_control_file(&content, &self.url_prefix)))
            }
            None => Ok(None),
        }
    }

    /// Custom providers publish pre-built listings that already have the
    /// leaf serialization, so they are persisted verbatim, zstd-wrapped.
    /// The listing must still deserialize; a corrupt one fails the sync
    /// instead of surfacing later during resolution.
    fn sync_custom(&self) -> Result<()> {
        info!("Syncing repository {}", self.metadata_url);

        let leaf_dir = self
            .root
            .join(&self.key.provider)
            .join(&self.key.distribution);
        let leaf = Download::new(&self.metadata_url)
            .output_dir(&leaf_dir)
            .compress(true)
            .execute()?;

        let records = read_leaf(&leaf)?;
        if records.is_empty() {
            debug!("Component {} is empty, removing leaf", self.key);
            safe_remove(&leaf)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;
    use crate::index::{enumerate_leaves, read_leaf};

    fn listing(count: usize, marker: &str) -> String {
        (0..count)
            .map(|i| {
                format!(
                    "Package: {marker}-pkg{i}\nVersion: 1.{i}.0\nFilename: pool/{marker}-pkg{i}.deb\n\n"
                )
            })
            .collect()
    }

    fn provider(server_uri: &str, distributions: &[&str], components: &[&str]) -> Provider {
        Provider {
            name: "acme".to_string(),
            url: server_uri.to_string(),
            architecture: "amd64".to_string(),
            custom: false,
            components: components.iter().map(|s| s.to_string()).collect(),
            distributions: distributions.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn synchronizer(manifest_base: &str) -> Synchronizer {
        Synchronizer::new(
            debferry_config::arch::Architecture::from_name("x86_64").unwrap(),
            manifest_base,
        )
    }

    #[tokio::test]
    async fn test_partition_safety_under_concurrency() {
        let server = MockServer::start().await;
        let distributions = ["stable", "testing", "unstable"];
        let components = ["main", "contrib", "non-free"];

        for (d, dist) in distributions.iter().enumerate() {
            for (c, comp) in components.iter().enumerate() {
                let count = (d + 1) * 10 + c + 1;
                Mock::given(method("GET"))
                    .and(path(format!("/dists/{dist}/{comp}/binary-amd64/Packages")))
                    .respond_with(
                        ResponseTemplate::new(200)
                            .set_body_string(listing(count, &format!("{dist}-{comp}"))),
                    )
                    .mount(&server)
                    .await;
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&server.uri(), &distributions, &components);

        synchronizer(&server.uri())
            .sync_provider(dir.path(), &provider)
            .await
            .unwrap();

        let leaves = enumerate_leaves(dir.path(), "*", "*").unwrap();
        assert_eq!(leaves.len(), 9);

        for (key, leaf_path) in leaves {
            let d = distributions
                .iter()
                .position(|x| *x == key.distribution)
                .unwrap();
            let c = components.iter().position(|x| *x == key.component).unwrap();
            let records = read_leaf(&leaf_path).unwrap();
            assert_eq!(records.len(), (d + 1) * 10 + c + 1, "leaf {key}");
            assert!(records
                .iter()
                .all(|r| r.name.starts_with(&format!("{}-{}-pkg", key.distribution, key.component))));
        }
    }

    #[tokio::test]
    async fn test_probe_fallback_writes_leaf_from_xz() {
        let server = MockServer::start().await;
        let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
        encoder.write_all(listing(3, "xz").as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        Mock::given(method("GET"))
            .and(path("/dists/stable/main/binary-amd64/Packages.xz"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(compressed))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&server.uri(), &["stable"], &["main"]);

        synchronizer(&server.uri())
            .sync_provider(dir.path(), &provider)
            .await
            .unwrap();

        let leaf = IndexKey::new("acme", "stable", "main").leaf_path(dir.path());
        let records = read_leaf(&leaf).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].url, format!("{}/pool/xz-pkg0.deb", server.uri()));
    }

    #[tokio::test]
    async fn test_absent_component_leaves_no_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&server.uri(), &["stable"], &["main"]);

        synchronizer(&server.uri())
            .sync_provider(dir.path(), &provider)
            .await
            .unwrap();

        assert!(enumerate_leaves(dir.path(), "*", "*").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_task_reports_error_but_others_complete() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dists/stable/main/binary-amd64/Packages"))
            .respond_with(ResponseTemplate::new(200).set_body_string(listing(2, "ok")))
            .mount(&server)
            .await;
        // served as a 200 at the .xz suffix, but the stream is garbage
        Mock::given(method("GET"))
            .and(path("/dists/stable/contrib/binary-amd64/Packages.xz"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"not an xz stream".to_vec()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&server.uri(), &["stable"], &["main", "contrib"]);

        let result = synchronizer(&server.uri())
            .sync_provider(dir.path(), &provider)
            .await;
        assert!(result.is_err());

        // the healthy component still ran to completion
        let leaf = IndexKey::new("acme", "stable", "main").leaf_path(dir.path());
        assert_eq!(read_leaf(&leaf).unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_sync_rejects_unknown_provider() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/x86_64/providers.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"providers":[{"name":"acme","url":"http://mirror","architecture":"amd64","components":["main"],"distributions":["stable"]}]}"#,
            ))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let result = synchronizer(&server.uri())
            .sync(dir.path(), &["nonexistent".to_string()])
            .await;

        assert!(matches!(result, Err(RegistryError::UnknownProvider(_))));
    }

    #[tokio::test]
    async fn test_sync_then_resolve_end_to_end() {
        let server = MockServer::start().await;
        let sha256 = "c7be1ed902fb8dd4d48997c6452f5d7e509fbcdbe2808b16bcf4edce4c07d14e";
        let stanza = format!(
            "Package: widget\nVersion: 2.0-1\nFilename: pool/widget_2.0.deb\nSHA256: {sha256}\n"
        );

        Mock::given(method("GET"))
            .and(path("/x86_64/providers.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                r#"{{"providers":[{{"name":"acme","url":"{}","architecture":"x86_64","components":["main"],"distributions":["stable"]}}]}}"#,
                server.uri()
            )))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/dists/stable/main/binary-x86_64/Packages"))
            .respond_with(ResponseTemplate::new(200).set_body_string(stanza))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        synchronizer(&server.uri())
            .sync(dir.path(), &[])
            .await
            .unwrap();

        let matches = crate::resolver::find_packages(
            "widget",
            dir.path(),
            Some("acme"),
            None,
            true,
        )
        .unwrap();

        assert_eq!(matches.len(), 1);
        let resolved = &matches[0];
        assert_eq!(resolved.key, IndexKey::new("acme", "stable", "main"));
        assert_eq!(resolved.record.version, "2.0-1");
        assert_eq!(
            resolved.record.url,
            format!("{}/pool/widget_2.0.deb", server.uri())
        );
        assert_eq!(resolved.record.sha256, sha256);
    }

    #[tokio::test]
    async fn test_custom_provider_single_fetch() {
        let server = MockServer::start().await;
        let records = vec![PackageRecord {
            name: "editor".to_string(),
            version: "1.2.3".to_string(),
            url: "http://vendor.example/editor_1.2.3.deb".to_string(),
            ..Default::default()
        }];

        Mock::given(method("GET"))
            .and(path("/x86_64/vendor.example/current/editor.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(serde_json::to_string(&records).unwrap()),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let provider = Provider {
            name: "vendor.example".to_string(),
            url: "vendor.example".to_string(),
            architecture: "x86_64".to_string(),
            custom: true,
            components: vec!["editor".to_string()],
            distributions: vec!["current".to_string()],
        };

        synchronizer(&server.uri())
            .sync_provider(dir.path(), &provider)
            .await
            .unwrap();

        let leaf = IndexKey::new("vendor.example", "current", "editor").leaf_path(dir.path());
        assert_eq!(read_leaf(&leaf).unwrap(), records);
    }

    #[tokio::test]
    async fn test_empty_custom_listing_leaves_no_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/x86_64/vendor.example/current/editor.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let provider = Provider {
            name: "vendor.example".to_string(),
            url: "vendor.example".to_string(),
            architecture: "x86_64".to_string(),
            custom: true,
            components: vec!["editor".to_string()],
            distributions: vec!["current".to_string()],
        };

        synchronizer(&server.uri())
            .sync_provider(dir.path(), &provider)
            .await
            .unwrap();

        assert!(enumerate_leaves(dir.path(), "*", "*").unwrap().is_empty());
    }
}
