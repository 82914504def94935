use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};

use super::{
    catalog::DEFAULT_CHORD_FILE,
    history::DEFAULT_HISTORY_CAPACITY,
    models::Difficulty,
    session::DEFAULT_TIMER_INTERVAL_SECS,
    TrainerError,
};
use crate::persistence::{
    get_data_file_path,
    load_json_or_default,
    save_json,
};

pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_SPEECH_ENDPOINT: &str = "https://www.google.com/speech-api/v2/recognize";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChordDisplay {
    /// Fret numbers inside the markers.
    #[default]
    Frets,
    /// Recommended finger numbers inside the markers.
    Fingers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    #[default]
    Right,
    Left,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Only "default" is rendered; the key is kept so older files round-trip.
    pub layout: String,
    pub difficulty: Difficulty,
    pub theme: ThemeMode,
    pub max_history: usize,
    pub timer_interval_secs: u32,
    pub chord_display: ChordDisplay,
    pub preferred_hand: Hand,
    pub speech_enabled: bool,
    pub speech_endpoint: String,
    /// Without a key the microphone stays off and commands are read from stdin.
    pub speech_api_key: String,
    pub chord_file: PathBuf,
    pub lang_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            layout: "default".to_string(),
            difficulty: Difficulty::Easy,
            theme: ThemeMode::Dark,
            max_history: DEFAULT_HISTORY_CAPACITY,
            timer_interval_secs: DEFAULT_TIMER_INTERVAL_SECS,
            chord_display: ChordDisplay::Frets,
            preferred_hand: Hand::Right,
            speech_enabled: true,
            speech_endpoint: DEFAULT_SPEECH_ENDPOINT.to_string(),
            speech_api_key: String::new(),
            chord_file: PathBuf::from(DEFAULT_CHORD_FILE),
            lang_dir: PathBuf::from("lang"),
        }
    }
}

impl AppConfig {
    pub fn default_path() -> PathBuf {
        get_data_file_path(CONFIG_FILE)
    }

    /// Missing files are created with defaults; broken ones are ignored.
    pub fn load(path: &Path) -> Self {
        let config: AppConfig = load_json_or_default(path);
        config.sanitized()
    }

    pub fn save(&self, path: &Path) -> Result<(), TrainerError> {
        save_json(self, path)
    }

    /// Saves and logs instead of failing.
    pub fn save_best_effort(&self, path: &Path) {
        if let Err(e) = self.save(path) {
            tracing::warn!("Failed to save config to {}: {}", path.display(), e);
        }
    }

    fn sanitized(mut self) -> Self {
        self.max_history = self.max_history.max(1);
        self.timer_interval_secs = self.timer_interval_secs.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_absent_config_is_written_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let config = AppConfig::load(&path);
        assert_eq!(config, AppConfig::default());

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written["difficulty"], "easy");
        assert_eq!(written["theme"], "dark");
        assert_eq!(written["layout"], "default");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{"difficulty": "hard", "theme": "light", "max_history": 0}"#).unwrap();

        let config = AppConfig::load(&path);
        assert_eq!(config.difficulty, Difficulty::Hard);
        assert_eq!(config.theme, ThemeMode::Light);
        assert_eq!(config.max_history, 1);
        assert_eq!(config.timer_interval_secs, DEFAULT_TIMER_INTERVAL_SECS);
        assert!(config.speech_enabled);
        assert_eq!(config.speech_endpoint, DEFAULT_SPEECH_ENDPOINT);
        assert!(config.speech_api_key.is_empty());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let config = AppConfig {
            preferred_hand: Hand::Left,
            chord_display: ChordDisplay::Fingers,
            ..AppConfig::default()
        };

        config.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path), config);
    }
}
