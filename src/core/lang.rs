use std::{
    collections::HashMap,
    fmt::Display,
    fs,
    io,
    path::Path,
};

use serde_json::Value;

use super::TrainerError;

pub const DEFAULT_LANG: &str = "en_US";

const LOCALE_ALIASES: &[(&str, &str)] = &[
    ("Japanese_Japan", "jp_JP"),
    ("German_Germany", "de_DE"),
    ("English_United States", "en_US"),
    ("Italian_Italy", "it_IT"),
];

/// Localized UI strings for one locale.
#[derive(Debug, Clone, Default)]
pub struct Lang {
    code: String,
    strings: HashMap<String, Value>,
}

impl Lang {
    pub fn from_map(code: impl Into<String>, strings: HashMap<String, Value>) -> Self {
        Self { code: code.into(), strings }
    }

    /// Loads `<dir>/<code>.json`, falling back to `en_US`.
    ///
    /// A missing `en_US` file is the one error the application cannot recover from.
    pub fn load(dir: &Path, code: &str) -> Result<Self, TrainerError> {
        let path = dir.join(format!("{code}.json"));

        match fs::read_to_string(&path) {
            Ok(content) => {
                let strings: HashMap<String, Value> = serde_json::from_str(&content)?;
                tracing::info!("Loaded language {} ({} strings)", code, strings.len());
                Ok(Self { code: code.to_string(), strings })
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound && code != DEFAULT_LANG => {
                tracing::warn!(
                    "Language file not found: {}. Falling back to {}.",
                    path.display(),
                    DEFAULT_LANG
                );
                Self::load(dir, DEFAULT_LANG)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::error!("{} language file missing", DEFAULT_LANG);
                Err(TrainerError::MissingLanguageFile(path.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the key itself when no string exists for it.
    pub fn get<'a>(&'a self, key: &'a str) -> &'a str {
        match self.strings.get(key) {
            Some(Value::String(value)) => value,
            _ => {
                tracing::debug!("Missing string for key '{}' in {}", key, self.code);
                key
            }
        }
    }

    /// Replaces `{name}` placeholders in the string for `key`.
    pub fn format(&self, key: &str, args: &[(&str, &dyn Display)]) -> String {
        args.iter().fold(self.get(key).to_string(), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), &value.to_string())
        })
    }

    /// Multi-line entries are stored as arrays of lines.
    pub fn lines(&self, key: &str) -> String {
        match self.strings.get(key) {
            Some(Value::Array(lines)) => {
                lines.iter().filter_map(Value::as_str).collect::<Vec<_>>().join("\n")
            }
            _ => self.get(key).to_string(),
        }
    }

    /// Lowercased phrase used to match voice transcripts.
    pub fn phrase(&self, key: &str) -> String {
        self.get(key).trim().to_lowercase()
    }
}

/// Locale code of the running system, e.g. `de_DE`.
pub fn system_language() -> String {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty() && value != "C" && value != "POSIX")
        .map(|value| normalize_locale(&value))
        .unwrap_or_else(|| DEFAULT_LANG.to_string())
}

pub fn normalize_locale(raw: &str) -> String {
    let base = raw.split(['.', '@']).next().unwrap_or_default().trim();
    if base.is_empty() {
        return DEFAULT_LANG.to_string();
    }

    LOCALE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == base)
        .map(|(_, code)| code.to_string())
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn write(dir: &Path, code: &str, json: &str) {
        fs::write(dir.join(format!("{code}.json")), json).unwrap();
    }

    #[test]
    fn test_missing_locale_falls_back_to_english() {
        let dir = tempdir().unwrap();
        write(dir.path(), "en_US", r#"{"title": "Ukulele Chord Trainer"}"#);

        let lang = Lang::load(dir.path(), "it_IT").unwrap();
        assert_eq!(lang.code(), "en_US");
        assert_eq!(lang.get("title"), "Ukulele Chord Trainer");
    }

    #[test]
    fn test_missing_english_is_fatal() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            Lang::load(dir.path(), "de_DE"),
            Err(TrainerError::MissingLanguageFile(_))
        ));
    }

    #[test]
    fn test_format_lines_and_missing_keys() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "de_DE",
            r#"{
                "learned_chords_text": "Gelernte Akkorde: {count}",
                "short_manual_text": ["Eins", "Zwei"],
                "speech_next": " Weiter "
            }"#,
        );

        let lang = Lang::load(dir.path(), "de_DE").unwrap();
        assert_eq!(lang.format("learned_chords_text", &[("count", &3)]), "Gelernte Akkorde: 3");
        assert_eq!(lang.lines("short_manual_text"), "Eins\nZwei");
        assert_eq!(lang.get("nope"), "nope");
        assert_eq!(lang.phrase("speech_next"), "weiter");
    }

    #[test]
    fn test_normalize_locale() {
        assert_eq!(normalize_locale("de_DE.UTF-8"), "de_DE");
        assert_eq!(normalize_locale("German_Germany.1252"), "de_DE");
        assert_eq!(normalize_locale("fr_FR@euro"), "fr_FR");
        assert_eq!(normalize_locale(""), "en_US");
    }

    #[test]
    fn test_bundled_locales_share_keys() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("lang");
        let english = Lang::load(&dir, "en_US").unwrap();
        let german = Lang::load(&dir, "de_DE").unwrap();

        let mut english_keys: Vec<_> = english.strings.keys().collect();
        let mut german_keys: Vec<_> = german.strings.keys().collect();
        english_keys.sort();
        german_keys.sort();
        assert_eq!(english_keys, german_keys);
        assert_eq!(german.phrase("speech_next"), "weiter");
    }
}
