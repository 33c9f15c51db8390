use crate::error::ConfigError;

/// Host architecture, resolved once and passed explicitly into the
/// synchronizer and resolver. The names follow the XBPS convention and
/// select both the index subtree and the provider-manifest variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Architecture(&'static str);

const SUPPORTED: &[&str] = &["x86_64", "aarch64", "i686"];

impl Architecture {
    /// Resolves the architecture of the running host.
    pub fn detect() -> Result<Self, ConfigError> {
        Self::from_name(match std::env::consts::ARCH {
            "x86" => "i686",
            other => other,
        })
    }

    /// Resolves an architecture by name, for config overrides.
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        SUPPORTED
            .iter()
            .copied()
            .find(|supported| *supported == name)
            .map(Self)
            .ok_or_else(|| ConfigError::UnsupportedArchitecture(name.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}
