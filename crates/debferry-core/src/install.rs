//! The installation pipeline.
//!
//! One resolved (or ad hoc) package record is driven through a linear,
//! failure-sensitive sequence against a scratch workspace:
//! download, checksum verification, conversion through the external
//! `xdeb` converter, installation through `xbps-install`, post-install
//! hooks, cleanup. There is no retry and no rollback — any failure
//! aborts with the originating error, and a hook failure deliberately
//! leaves the scratch directory behind for inspection.

use std::{
    path::{Path, PathBuf},
    process::Command,
};

use debferry_dl::download::{filename_from_url, Download};
use debferry_registry::{index::IndexKey, package::PackageRecord};
use debferry_utils::{
    fs::{ensure_dir_exists, safe_remove},
    hash::calculate_checksum,
    path::strip_extensions,
};
use tracing::info;

use crate::{
    error::{DebferryError, ErrorContext},
    DebferryResult,
};

pub const CONVERTER_BIN: &str = "xdeb";
pub const CONVERTER_RELEASES_URL: &str = "https://github.com/toluschr/xdeb/releases";
pub const INSTALLER_BIN: &str = "xbps-install";

/// Directory the converter drops its output packages into, relative to
/// the artifact's directory.
pub const CONVERTER_OUTPUT_DIR: &str = "binpkgs";

/// Sentinel provenance for ad hoc installs.
pub const PROVIDER_LOCALHOST: &str = "localhost";
pub const PROVIDER_REMOTE: &str = "remote";
pub const DISTRIBUTION_FILE: &str = "file";

/// A fully-derived, immutable installation job.
///
/// Construction through [`InstallJob::configure`] is the only way to
/// obtain one, so the derived scratch paths and provenance defaults can
/// never be re-derived or mutated afterwards; configuring the same
/// record twice yields identical jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallJob {
    record: PackageRecord,
    key: IndexKey,
    scratch_dir: PathBuf,
    artifact_path: PathBuf,
    converter_options: String,
}

impl InstallJob {
    /// Derives the workspace for a record.
    ///
    /// Records without provenance get the sentinel key: provider
    /// `localhost` for local files, `remote` for direct URLs, both under
    /// the synthetic distribution `file`. The scratch directory is
    /// `scratch_root/provider/distribution[/component]/name`; for a
    /// URL-backed record the artifact lands inside it, for a file-backed
    /// record the supplied path is used as-is.
    pub fn configure(
        record: PackageRecord,
        key: Option<IndexKey>,
        scratch_root: &Path,
        converter_options: &str,
    ) -> DebferryResult<Self> {
        let key = key.unwrap_or_else(|| {
            let provider = if record.url.is_empty() {
                PROVIDER_LOCALHOST
            } else {
                PROVIDER_REMOTE
            };
            IndexKey::new(provider, DISTRIBUTION_FILE, "")
        });

        let mut scratch_dir = scratch_root.join(&key.provider).join(&key.distribution);
        if !key.component.is_empty() {
            scratch_dir = scratch_dir.join(&key.component);
        }
        scratch_dir = scratch_dir.join(&record.name);

        let artifact_path = if record.url.is_empty() {
            PathBuf::from(&record.path)
        } else {
            scratch_dir.join(filename_from_url(&record.url)?)
        };

        Ok(Self {
            record,
            key,
            scratch_dir,
            artifact_path,
            converter_options: strip_install_flag(converter_options),
        })
    }

    pub fn record(&self) -> &PackageRecord {
        &self.record
    }

    pub fn key(&self) -> &IndexKey {
        &self.key
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    /// Drives the whole pipeline. Cleanup only runs on the success
    /// path; a failed hook leaves the scratch directory behind.
    pub fn execute(&self) -> DebferryResult<()> {
        info!(
            "Installing {} from {} @ {}/{}",
            self.record.name, self.key.provider, self.key.distribution, self.key.component
        );

        self.download()?;
        self.verify()?;
        self.convert()?;
        self.install()?;
        self.run_hooks()?;
        self.cleanup()
    }

    /// Fetches the artifact into the scratch directory, wiping any
    /// stale workspace first. File-backed records skip this stage.
    pub fn download(&self) -> DebferryResult<()> {
        if self.record.url.is_empty() {
            return Ok(());
        }

        safe_remove(&self.scratch_dir)?;

        let written = Download::new(&self.record.url)
            .output_dir(&self.scratch_dir)
            .execute()?;

        // a redirect may change the final file name; the derived
        // artifact path stays canonical
        if written != self.artifact_path {
            std::fs::rename(&written, &self.artifact_path).with_context(|| {
                format!(
                    "renaming {} to {}",
                    written.display(),
                    self.artifact_path.display()
                )
            })?;
        }

        Ok(())
    }

    /// Compares the artifact digest against the expected one, aborting
    /// before any subprocess is invoked on mismatch. Records without a
    /// checksum skip this stage.
    pub fn verify(&self) -> DebferryResult<()> {
        if self.record.sha256.is_empty() {
            return Ok(());
        }

        let actual = calculate_checksum(&self.artifact_path)?;
        if !actual.eq_ignore_ascii_case(&self.record.sha256) {
            return Err(DebferryError::ChecksumMismatch {
                expected: self.record.sha256.clone(),
                actual,
            });
        }

        Ok(())
    }

    /// Runs the external converter against the artifact, with the
    /// artifact's directory as working directory.
    pub fn convert(&self) -> DebferryResult<()> {
        let converter = locate_converter()?;

        let mut args = vec![converter.to_string_lossy().to_string()];
        if !self.converter_options.is_empty() {
            args.push(self.converter_options.clone());
        }
        args.push(self.artifact_path.to_string_lossy().to_string());

        run_command(self.workdir(), &args)
    }

    /// Installs the converter's output through the system installer,
    /// elevating when the current user is unprivileged.
    pub fn install(&self) -> DebferryResult<()> {
        let workdir = self.workdir();
        let package = find_installable(workdir)?;

        let mut args = Vec::new();
        if !nix::unistd::geteuid().is_root() {
            args.push("sudo".to_string());
        }
        args.extend([
            INSTALLER_BIN.to_string(),
            "-R".to_string(),
            CONVERTER_OUTPUT_DIR.to_string(),
            "-y".to_string(),
            package,
        ]);

        run_command(workdir, &args)
    }

    /// Runs declared post-install hooks in order against the scratch
    /// directory. The first failing command aborts; cleanup is skipped
    /// on that path so the workspace stays inspectable.
    pub fn run_hooks(&self) -> DebferryResult<()> {
        if self.record.post_install_hooks.is_empty() {
            return Ok(());
        }

        ensure_dir_exists(&self.scratch_dir)?;

        for hook in &self.record.post_install_hooks {
            info!("Running post-install hook {}", hook.name);

            for hook_command in &hook.commands {
                let mut args = shell_words::split(&hook_command.command).map_err(|err| {
                    DebferryError::InvalidHookCommand {
                        command: hook_command.command.clone(),
                        reason: err.to_string(),
                    }
                })?;

                if hook_command.elevate && !nix::unistd::geteuid().is_root() {
                    args.insert(0, "sudo".to_string());
                }

                run_command(&self.scratch_dir, &args).map_err(|_| DebferryError::HookFailed {
                    name: hook.name.clone(),
                    command: hook_command.command.clone(),
                })?;
            }
        }

        Ok(())
    }

    /// Removes the scratch workspace. Only called on the success path.
    pub fn cleanup(&self) -> DebferryResult<()> {
        safe_remove(&self.scratch_dir)?;
        Ok(())
    }

    fn workdir(&self) -> &Path {
        self.artifact_path.parent().unwrap_or(&self.scratch_dir)
    }
}

/// Locates the converter on PATH, failing fast with an install hint.
pub fn locate_converter() -> DebferryResult<PathBuf> {
    let path = which::which(CONVERTER_BIN).map_err(|_| DebferryError::ConverterNotFound)?;
    info!("Package xdeb found: {}", path.display());
    Ok(path)
}

/// Removes the converter's auto-install flag from an option string.
///
/// The pipeline always performs its own install step, so `-i` must
/// never reach the converter or the package would be installed twice.
/// The flag may appear standalone or inside a cluster like `-Sdei`.
pub fn strip_install_flag(options: &str) -> String {
    options
        .split_whitespace()
        .filter_map(|token| {
            if let Some(flags) = token.strip_prefix('-') {
                let kept: String = flags.chars().filter(|c| *c != 'i').collect();
                if kept.is_empty() {
                    None
                } else {
                    Some(format!("-{kept}"))
                }
            } else {
                Some(token.to_string())
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Globs the converter output directory for the produced package and
/// derives the installable's canonical name by stripping its trailing
/// double extension.
pub fn find_installable(workdir: &Path) -> DebferryResult<String> {
    let output_dir = workdir.join(CONVERTER_OUTPUT_DIR);
    let pattern = output_dir.join("*.xbps");

    let mut produced = glob::glob(&pattern.to_string_lossy())
        .map_err(|err| DebferryError::IoError {
            action: format!("globbing {}", pattern.display()),
            source: std::io::Error::other(err),
        })?
        .filter_map(|entry| entry.ok());

    let package = produced
        .next()
        .ok_or_else(|| DebferryError::NoInstallableArtifact(output_dir.display().to_string()))?;

    let file_name = package
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| DebferryError::NoInstallableArtifact(output_dir.display().to_string()))?;

    Ok(strip_extensions(file_name, 2).to_string())
}

fn run_command(workdir: &Path, args: &[String]) -> DebferryResult<()> {
    info!("Executing command: {} ...", args.join(" "));

    let status = Command::new(&args[0])
        .args(&args[1..])
        .current_dir(workdir)
        .status()
        .with_context(|| format!("executing command {}", args.join(" ")))?;

    if !status.success() {
        return Err(DebferryError::CommandFailed {
            command: args.join(" "),
            code: status.code(),
        });
    }

    Ok(())
}
