//! Remotely-maintained provider manifests.
//!
//! Providers are not authored locally: a manifest describing every
//! provider for one host architecture is fetched on each sync from
//! `<manifest_base>/<arch>/providers.json`.

use debferry_dl::http::Http;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A named remote source of package metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,

    /// Base URL of an APT mirror, or a path relative to the manifest
    /// base for custom providers publishing pre-built listings.
    pub url: String,

    /// Architecture component of the metadata URL (e.g. `amd64`).
    pub architecture: String,

    /// Custom providers publish pre-built listings instead of raw
    /// control files.
    #[serde(default)]
    pub custom: bool,

    pub components: Vec<String>,
    pub distributions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderManifest {
    pub providers: Vec<Provider>,
}

impl Provider {
    /// URL of the metadata listing for one (distribution, component)
    /// pair. APT providers expose control files under the standard
    /// `dists` layout; custom providers publish one pre-built JSON
    /// listing per pair next to the manifest.
    pub fn metadata_url(
        &self,
        manifest_base: &str,
        distribution: &str,
        component: &str,
    ) -> String {
        if self.custom {
            format!(
                "{}/{}/{}/{}/{}.json",
                manifest_base, self.architecture, self.url, distribution, component
            )
        } else {
            format!(
                "{}/dists/{}/{}/binary-{}/Packages",
                self.url, distribution, component, self.architecture
            )
        }
    }
}

impl ProviderManifest {
    /// Fetches and parses the manifest for one host architecture.
    pub fn fetch(manifest_base: &str, architecture: &str) -> Result<Self> {
        let url = format!("{manifest_base}/{architecture}/providers.json");
        let resp = Http::get(&url)?;
        let (_, bytes) = Http::read_body(resp)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
