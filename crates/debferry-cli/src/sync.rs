use std::path::Path;

use debferry_config::arch::Architecture;
use debferry_core::DebferryResult;
use debferry_registry::sync::Synchronizer;
use tracing::info;

pub async fn sync_repositories(
    manifest_url: &str,
    architecture: Architecture,
    index_root: &Path,
    providers: &[String],
) -> DebferryResult<()> {
    let synchronizer = Synchronizer::new(architecture, manifest_url);
    synchronizer.sync(index_root, providers).await?;
    info!("Repository sync complete.");
    Ok(())
}
