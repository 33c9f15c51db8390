use std::{env, path::PathBuf};

/// Returns the user's config directory following the XDG Base Directory
/// Specification: `$XDG_CONFIG_HOME`, defaulting to `$HOME/.config`.
pub fn xdg_config_home() -> PathBuf {
    env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns the user's home directory from `$HOME`, falling back to `/root`
/// for uid 0 environments without one.
pub fn home_dir() -> PathBuf {
    env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/root"))
}

/// Strips the final dot-separated extension from a file name.
///
/// Returns the input unchanged when it contains no dot.
pub fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => name,
    }
}

/// Strips `count` trailing extensions from a file name.
pub fn strip_extensions(name: &str, count: usize) -> &str {
    let mut stem = name;
    for _ in 0..count {
        stem = strip_extension(stem);
    }
    stem
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("main.json"), "main");
        assert_eq!(strip_extension("main"), "main");
        assert_eq!(strip_extension("widget-2.0_1.x86_64.xbps"), "widget-2.0_1.x86_64");
    }

    #[test]
    fn test_strip_extensions() {
        assert_eq!(strip_extensions("main.json.zst", 2), "main");
        assert_eq!(strip_extensions("widget-2.0_1.x86_64.xbps", 2), "widget-2.0_1");
        assert_eq!(strip_extensions("plain", 3), "plain");
    }
}
