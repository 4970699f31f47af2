use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_FIGHTING_TIMEOUT_MS: u64 = 2500;
pub const DEFAULT_STORE_HISTORY_INTERVAL_MS: u64 = 5000;

/// Settings read by the timeline and its timers.
///
/// `store_history_interval` is kept as text because hosts write it straight from a settings
/// field; it is re-parsed every time the history timer fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseSettings {
    /// Quiet period after the last engagement before "fighting right now" drops.
    pub fighting_timeout_ms: u64,
    /// Milliseconds between history-reset checks.
    pub store_history_interval: String,
    pub enable_store_history_reset: bool,
    /// Set while a session is replaying previously stored history.
    pub history_based: bool,
}

impl Default for ParseSettings {
    fn default() -> Self {
        Self {
            fighting_timeout_ms: DEFAULT_FIGHTING_TIMEOUT_MS,
            store_history_interval: DEFAULT_STORE_HISTORY_INTERVAL_MS.to_string(),
            enable_store_history_reset: true,
            history_based: false,
        }
    }
}

impl ParseSettings {
    pub fn fighting_timeout(&self) -> Duration {
        Duration::from_millis(self.fighting_timeout_ms)
    }

    /// Parse `store_history_interval`. Returns `None` for anything that is not a positive,
    /// finite number of milliseconds.
    pub fn store_history_interval(&self) -> Option<Duration> {
        let ms: f64 = self.store_history_interval.trim().parse().ok()?;
        if !ms.is_finite() || ms <= 0.0 {
            return None;
        }
        Some(Duration::from_secs_f64(ms / 1000.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_configuration() {
        let settings = ParseSettings::default();
        assert_eq!(settings.fighting_timeout(), Duration::from_millis(2500));
        assert_eq!(
            settings.store_history_interval(),
            Some(Duration::from_millis(5000))
        );
        assert!(settings.enable_store_history_reset);
        assert!(!settings.history_based);
    }

    #[test]
    fn malformed_interval_is_rejected() {
        for bad in ["", "abc", "0", "-20", "NaN", "inf"] {
            let settings = ParseSettings {
                store_history_interval: bad.to_string(),
                ..Default::default()
            };
            assert_eq!(settings.store_history_interval(), None, "input {bad:?}");
        }
    }

    #[test]
    fn fractional_interval_is_accepted() {
        let settings = ParseSettings {
            store_history_interval: " 1500.5 ".to_string(),
            ..Default::default()
        };
        assert_eq!(
            settings.store_history_interval(),
            Some(Duration::from_secs_f64(1.5005))
        );
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml = r#"
store_history_interval = "60000"
history_based = true
"#;
        let settings: ParseSettings = toml::from_str(toml).unwrap();
        assert_eq!(settings.fighting_timeout_ms, DEFAULT_FIGHTING_TIMEOUT_MS);
        assert_eq!(
            settings.store_history_interval(),
            Some(Duration::from_secs(60))
        );
        assert!(settings.history_based);
        assert!(settings.enable_store_history_reset);
    }
}
