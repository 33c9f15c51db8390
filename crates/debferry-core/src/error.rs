//! Error types for debferry-core.

use miette::Diagnostic;
use thiserror::Error;

use crate::install::CONVERTER_RELEASES_URL;

/// Core error type for debferry operations.
#[derive(Error, Diagnostic, Debug)]
pub enum DebferryError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] debferry_config::error::ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Download(#[from] debferry_dl::error::DownloadError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Registry(#[from] debferry_registry::error::RegistryError),

    #[error(transparent)]
    #[diagnostic(code(debferry::filesystem))]
    FileSystem(#[from] debferry_utils::error::FileSystemError),

    #[error(transparent)]
    #[diagnostic(code(debferry::hash))]
    Hash(#[from] debferry_utils::error::HashError),

    #[error("Error while {action}: {source}")]
    #[diagnostic(code(debferry::io), help("Check file permissions and disk space"))]
    IoError {
        action: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Checksums don't match: actual={actual} expected={expected}")]
    #[diagnostic(
        code(debferry::checksum),
        help("The downloaded artifact may be corrupted. Try downloading again.")
    )]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Package xdeb not found. Please install from {CONVERTER_RELEASES_URL}.")]
    #[diagnostic(code(debferry::converter_not_found))]
    ConverterNotFound,

    #[error("Could not find any XBPS packages to install within {0}.")]
    #[diagnostic(
        code(debferry::no_installable),
        help("The converter may have failed to produce output. Check its log above.")
    )]
    NoInstallableArtifact(String),

    #[error("Command `{command}` failed with exit code {code:?}")]
    #[diagnostic(code(debferry::command))]
    CommandFailed { command: String, code: Option<i32> },

    #[error("Post-install hook `{name}` failed on `{command}`")]
    #[diagnostic(
        code(debferry::hook),
        help("The scratch directory is preserved for inspection")
    )]
    HookFailed { name: String, command: String },

    #[error("Invalid hook command line `{command}`: {reason}")]
    #[diagnostic(code(debferry::hook_parse))]
    InvalidHookCommand { command: String, reason: String },
}

/// Trait for adding context to IO errors.
pub trait ErrorContext<T> {
    fn with_context<C>(self, context: C) -> std::result::Result<T, DebferryError>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> std::result::Result<T, DebferryError>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| DebferryError::IoError {
            action: context(),
            source: err,
        })
    }
}
