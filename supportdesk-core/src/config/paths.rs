//! Default path resolution for client files
//!
//! Uses XDG Base Directory specification when available, with sensible fallbacks.

use std::path::PathBuf;

/// Returns the default path for the client settings file.
///
/// - Linux/macOS: `~/.config/supportdesk/client.toml`
/// - Fallback: `/etc/supportdesk/client.toml`
pub fn default_settings_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("/etc"))
        .join("supportdesk")
        .join("client.toml")
}

/// Returns the default directory backing the persistent config cache.
///
/// - Linux: `~/.cache/supportdesk`
/// - Fallback: `/tmp/supportdesk`
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("supportdesk")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_path_is_toml() {
        let path = default_settings_path();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("toml"));
        assert!(path.ends_with("supportdesk/client.toml"));
    }

    #[test]
    fn test_default_cache_dir_ends_with_supportdesk() {
        assert!(default_cache_dir().ends_with("supportdesk"));
    }
}
