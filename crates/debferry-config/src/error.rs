use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(debferry_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(debferry_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Architecture {0} not supported (yet)")]
    #[diagnostic(
        code(debferry_config::unsupported_architecture),
        help("Supported host architectures: x86_64, aarch64, i686")
    )]
    UnsupportedArchitecture(String),

    #[error("IO error: {0}")]
    #[diagnostic(code(debferry_config::io))]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(code(debferry_config::filesystem))]
    FileSystem(#[from] debferry_utils::error::FileSystemError),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
