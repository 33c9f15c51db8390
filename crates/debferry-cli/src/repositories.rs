use debferry_config::arch::Architecture;
use debferry_core::DebferryResult;
use debferry_registry::{sync::Synchronizer, RegistryError};
use nu_ansi_term::Color::Cyan;

use crate::utils::Colored;

pub async fn list_providers(
    manifest_url: &str,
    architecture: Architecture,
    json: bool,
) -> DebferryResult<()> {
    let synchronizer = Synchronizer::new(architecture, manifest_url);
    let manifest = synchronizer.fetch_manifest().await?;

    if json {
        let output =
            serde_json::to_string_pretty(&manifest).map_err(RegistryError::from)?;
        println!("{output}");
        return Ok(());
    }

    for provider in &manifest.providers {
        println!("{}", Colored(Cyan, &provider.name));
        println!("  url: {}", provider.url);
        println!("  architecture: {}", provider.architecture);
        println!("  distributions: {}", provider.distributions.join(", "));
        println!("  components: {}", provider.components.join(", "));
        println!();
    }

    Ok(())
}
