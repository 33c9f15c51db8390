use std::path::Path;

use debferry_core::DebferryResult;
use debferry_registry::{resolver::find_packages, RegistryError};
use nu_ansi_term::Color::Cyan;

use crate::utils::Colored;

pub fn search_packages(
    name: &str,
    index_root: &Path,
    provider: Option<&str>,
    distribution: Option<&str>,
    exact: bool,
    json: bool,
) -> DebferryResult<()> {
    let matches = find_packages(name, index_root, provider, distribution, exact)?;

    if json {
        let entries: Vec<_> = matches
            .iter()
            .map(|m| {
                serde_json::json!({
                    "name": m.record.name,
                    "version": m.record.version,
                    "provider": m.key.provider,
                    "distribution": m.key.distribution,
                    "component": m.key.component,
                    "url": m.record.url,
                    "sha256": m.record.sha256,
                })
            })
            .collect();
        let output = serde_json::to_string_pretty(&entries).map_err(RegistryError::from)?;
        println!("{output}");
        return Ok(());
    }

    for m in &matches {
        println!("{}/{}", Colored(Cyan, &m.key.provider), m.key.component);
        println!("  distribution: {}", m.key.distribution);
        println!("  version: {}", m.record.version);
        println!("  url: {}", m.record.url);
        println!("  sha256: {}", m.record.sha256);
        println!();
    }

    Ok(())
}
