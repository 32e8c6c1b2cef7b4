use ronda_ai::AI_TYPES;
use ronda_engine::rules::RuleSet;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::RwLock;
use thiserror::Error;

/// Timing and rules applied to every session the host creates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HostSettings {
    /// How often the turn clock advances
    pub tick_interval_ms: u64,
    /// Pause between exhausted hands and the next deal
    pub redeal_delay_ms: u64,
    /// Hand a timed-out turn to the opponent instead of waiting
    pub pass_on_timeout: bool,
    /// Capacity of each session's command queue
    pub command_buffer: usize,
    /// AI the host binary seats when none is named on the command line
    pub default_ai: String,
    pub rules: RuleSet,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            redeal_delay_ms: 1_500,
            pass_on_timeout: true,
            command_buffer: 64,
            default_ai: "baseline".to_string(),
            rules: RuleSet::default(),
        }
    }
}

impl HostSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tick_interval_ms == 0 {
            return Err(SettingsError::InvalidValue(
                "tick_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.command_buffer == 0 {
            return Err(SettingsError::InvalidValue(
                "command_buffer must be greater than 0".to_string(),
            ));
        }
        if !AI_TYPES.contains(&self.default_ai.as_str()) {
            return Err(SettingsError::InvalidValue(format!(
                "default_ai must be one of {}",
                AI_TYPES.join(", ")
            )));
        }
        self.rules.validate().map_err(SettingsError::InvalidValue)
    }

    /// Parses and validates a TOML document. Missing keys keep their
    /// defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, SettingsError> {
        let settings: HostSettings =
            toml::from_str(s).map_err(|e| SettingsError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&s)
    }
}

/// Settings shared by the session manager. Updates apply to sessions
/// created afterwards.
#[derive(Debug)]
pub struct SettingsStore {
    settings: RwLock<HostSettings>,
}

impl SettingsStore {
    pub fn with_settings(settings: HostSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            settings: RwLock::new(settings),
        })
    }

    pub fn get(&self) -> Result<HostSettings, SettingsError> {
        self.settings
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| SettingsError::StoragePoisoned)
    }

    /// Update settings with validation
    pub fn update(&self, new_settings: HostSettings) -> Result<HostSettings, SettingsError> {
        new_settings.validate()?;

        let mut guard = self
            .settings
            .write()
            .map_err(|_| SettingsError::StoragePoisoned)?;
        *guard = new_settings.clone();
        Ok(new_settings)
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self {
            settings: RwLock::new(HostSettings::default()),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    #[error("Failed to parse settings: {0}")]
    Parse(String),
    #[error("Failed to read settings: {0}")]
    Io(String),
    #[error("Settings storage poisoned")]
    StoragePoisoned,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ronda_engine::rules::ScoringPolicy;

    #[test]
    fn defaults_are_valid() {
        assert!(HostSettings::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let s = HostSettings::from_toml_str(
            "redeal_delay_ms = 0\n\n[rules]\nscoring = \"match_plus_run\"\ntarget_score = 21\n",
        )
        .unwrap();
        assert_eq!(s.redeal_delay_ms, 0);
        assert_eq!(s.tick_interval_ms, 100);
        assert_eq!(s.rules.scoring, ScoringPolicy::MatchPlusRun);
        assert_eq!(s.rules.target_score, 21);
        assert!(s.rules.played_card_to_pile);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            HostSettings::from_toml_str("tick_interval_ms = 0"),
            Err(SettingsError::InvalidValue(_))
        ));
        assert!(matches!(
            HostSettings::from_toml_str("default_ai = \"oracle\""),
            Err(SettingsError::InvalidValue(_))
        ));
        assert!(matches!(
            HostSettings::from_toml_str("command_buffer = \"many\""),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn store_update_validates() {
        let store = SettingsStore::default();
        let mut bad = store.get().unwrap();
        bad.command_buffer = 0;
        assert!(store.update(bad).is_err());

        let mut good = store.get().unwrap();
        good.pass_on_timeout = false;
        store.update(good).unwrap();
        assert!(!store.get().unwrap().pass_on_timeout);
    }
}
