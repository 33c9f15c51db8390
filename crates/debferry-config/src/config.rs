use std::{
    env, fs,
    path::PathBuf,
    sync::{LazyLock, RwLock},
};

use debferry_utils::path::xdg_config_home;
use serde::{Deserialize, Serialize};

use crate::{
    arch::Architecture,
    error::{ConfigError, Result},
};

pub const APP_NAME: &str = "debferry";

/// Default base URL of the remotely-maintained provider manifests.
pub const DEFAULT_MANIFEST_URL: &str =
    "https://raw.githubusercontent.com/debferry/debferry-repositories/main/repositories";

/// Default option string handed to the converter.
pub const DEFAULT_CONVERTER_OPTIONS: &str = "-Sde";

/// Application's configuration
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Root of the local metadata index.
    /// Default: $XDG_CONFIG_HOME/debferry/repositories
    pub repositories_path: Option<String>,

    /// Scratch root for downloads and conversions.
    /// Default: $TMPDIR/debferry
    pub temp_path: Option<String>,

    /// Base URL the provider manifest is fetched from on every sync.
    pub manifest_url: Option<String>,

    /// Default option string for the converter. `-i` is always stripped.
    pub converter_options: Option<String>,

    /// Host architecture override. Detected when unset.
    pub architecture: Option<String>,
}

pub static CONFIG: LazyLock<RwLock<Option<Config>>> = LazyLock::new(|| RwLock::new(None));

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match env::var("DEBFERRY_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join(APP_NAME).join("config.toml"),
    })
});

pub fn init() -> Result<()> {
    let config = Config::new()?;
    let mut global_config = CONFIG.write().unwrap();
    *global_config = Some(config);
    Ok(())
}

pub fn get_config() -> Config {
    {
        let config_guard = CONFIG.read().unwrap();
        if let Some(config) = config_guard.as_ref() {
            return config.clone();
        }
    }

    let mut config_guard = CONFIG.write().unwrap();
    if config_guard.is_none() {
        *config_guard = Some(Config::default());
    }
    config_guard.as_ref().unwrap().clone()
}

impl Config {
    /// Creates a new configuration by loading it from the configuration file.
    /// A missing file falls back to the default configuration.
    pub fn new() -> Result<Self> {
        let config_path = CONFIG_PATH.read().unwrap().to_path_buf();

        match fs::read_to_string(&config_path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::IoError(err)),
        }
    }

    /// Resolves the host architecture, honoring the config override.
    pub fn architecture(&self) -> Result<Architecture> {
        match self.architecture {
            Some(ref name) => Architecture::from_name(name),
            None => Architecture::detect(),
        }
    }

    /// Base directory of the local index; the architecture-specific tree
    /// lives one level below.
    pub fn repositories_path(&self) -> PathBuf {
        self.repositories_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| xdg_config_home().join(APP_NAME).join("repositories"))
    }

    pub fn temp_path(&self) -> PathBuf {
        self.temp_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join(APP_NAME))
    }

    pub fn manifest_url(&self) -> &str {
        self.manifest_url.as_deref().unwrap_or(DEFAULT_MANIFEST_URL)
    }

    pub fn converter_options(&self) -> &str {
        self.converter_options
            .as_deref()
            .unwrap_or(DEFAULT_CONVERTER_OPTIONS)
    }
}
