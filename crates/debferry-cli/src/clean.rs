use std::path::Path;

use debferry_core::DebferryResult;
use debferry_utils::fs::safe_remove;
use tracing::info;

pub fn clean(scratch_root: &Path, repositories_root: &Path, index: bool) -> DebferryResult<()> {
    safe_remove(scratch_root)?;
    info!("Removed scratch directory {}", scratch_root.display());

    if index {
        safe_remove(repositories_root)?;
        info!("Removed local index {}", repositories_root.display());
    }

    Ok(())
}
