use std::path::Path;

use debferry_core::{install::InstallJob, DebferryResult};
use debferry_registry::{package::PackageRecord, resolver::find_packages};

/// Resolves a name against the local index (exact match) and installs
/// the highest-version candidate.
pub fn install_from_repository(
    name: &str,
    index_root: &Path,
    scratch_root: &Path,
    converter_options: &str,
    provider: Option<&str>,
    distribution: Option<&str>,
) -> DebferryResult<()> {
    let mut matches = find_packages(name, index_root, provider, distribution, true)?;
    let best = matches.swap_remove(0);

    let job = InstallJob::configure(best.record, Some(best.key), scratch_root, converter_options)?;
    job.execute()
}

pub fn install_from_url(
    url: &str,
    scratch_root: &Path,
    converter_options: &str,
) -> DebferryResult<()> {
    let record = PackageRecord::from_url(url);
    let job = InstallJob::configure(record, None, scratch_root, converter_options)?;
    job.execute()
}

pub fn install_from_file(
    path: &str,
    scratch_root: &Path,
    converter_options: &str,
) -> DebferryResult<()> {
    let record = PackageRecord::from_path(path);
    let job = InstallJob::configure(record, None, scratch_root, converter_options)?;
    job.execute()
}
