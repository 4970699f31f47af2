use std::path::Path;

use confy::ConfyError;
use xivparse_types::ParseSettings;

pub const APP_NAME: &str = "xivparse";

/// Load and store [`ParseSettings`] through confy.
pub trait ParseSettingsExt: Sized {
    /// Load from the platform config location, falling back to defaults on any error.
    fn load() -> Self;
    fn load_from(path: &Path) -> Result<Self, ConfyError>;
    fn save(&self) -> Result<(), ConfyError>;
    fn save_to(&self, path: &Path) -> Result<(), ConfyError>;
}

impl ParseSettingsExt for ParseSettings {
    fn load() -> Self {
        confy::load(APP_NAME, None).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Failed to load settings, using defaults");
            Self::default()
        })
    }

    fn load_from(path: &Path) -> Result<Self, ConfyError> {
        confy::load_path(path)
    }

    fn save(&self) -> Result<(), ConfyError> {
        confy::store(APP_NAME, None, self)
    }

    fn save_to(&self, path: &Path) -> Result<(), ConfyError> {
        confy::store_path(path, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_survive_a_store_and_load() {
        let dir = std::env::temp_dir().join(format!("xivparse-settings-{}", std::process::id()));
        let path = dir.join("settings.toml");

        let settings = ParseSettings {
            fighting_timeout_ms: 4000,
            store_history_interval: "12000".to_string(),
            enable_store_history_reset: false,
            history_based: true,
        };
        settings.save_to(&path).unwrap();
        let loaded = ParseSettings::load_from(&path).unwrap();
        assert_eq!(loaded, settings);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
