//! Error types for the registry crate.

use miette::Diagnostic;
use thiserror::Error;

/// Errors that can arise when syncing, storing or resolving package
/// metadata.
#[derive(Error, Diagnostic, Debug)]
pub enum RegistryError {
    #[error("Error while {action}: {source}")]
    #[diagnostic(code(debferry_registry::io))]
    IoError {
        action: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(code(debferry_registry::download))]
    DownloadError(#[from] debferry_dl::error::DownloadError),

    #[error(transparent)]
    #[diagnostic(
        code(debferry_registry::json),
        help("The metadata file may be corrupted or in an invalid format")
    )]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(code(debferry_registry::filesystem))]
    FileSystem(#[from] debferry_utils::error::FileSystemError),

    #[error("Provider {0} not found in the manifest")]
    #[diagnostic(
        code(debferry_registry::unknown_provider),
        help("Run `debferry repositories` to list the available providers")
    )]
    UnknownProvider(String),

    #[error("No repositories present on the system. Please sync repositories first.")]
    #[diagnostic(
        code(debferry_registry::not_synced),
        help("Run `debferry sync` to fetch repository metadata")
    )]
    NotSynced,

    #[error("Could not find package {0}")]
    #[diagnostic(
        code(debferry_registry::package_not_found),
        help("Run `debferry sync` to refresh the index, or check the package name")
    )]
    PackageNotFound(String),

    #[error("Sync task failed to complete: {0}")]
    #[diagnostic(code(debferry_registry::task_panic))]
    TaskPanicked(String),
}

/// Trait for adding context to IO errors.
pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> std::result::Result<T, RegistryError>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> std::result::Result<T, RegistryError>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| RegistryError::IoError {
            action: context(),
            source: err,
        })
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
