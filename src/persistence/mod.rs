use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::core::TrainerError;

const APP_NAME: &str = "uketrainer";

pub fn get_app_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        let app_dir = data_dir.join(APP_NAME);
        if let Err(e) = fs::create_dir_all(&app_dir) {
            tracing::warn!("Could not create {}: {}", app_dir.display(), e);
            return PathBuf::from(".");
        }
        app_dir
    } else {
        PathBuf::from(".")
    }
}

pub fn get_data_file_path(filename: &str) -> PathBuf {
    get_app_data_dir().join(filename)
}

pub fn save_json<T: Serialize>(data: &T, path: &Path) -> Result<(), TrainerError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(data)?;
    fs::write(path, json)?;
    tracing::debug!("Data saved to: {}", path.display());
    Ok(())
}

/// Reads `path`, writing `T::default()` there first when the file does not exist yet.
pub fn load_json<T: for<'de> Deserialize<'de> + Serialize + Default>(
    path: &Path,
) -> Result<T, TrainerError> {
    if !path.exists() {
        let data = T::default();
        save_json(&data, path)?;
        tracing::info!("Created default {}", path.display());
        return Ok(data);
    }

    let json = fs::read_to_string(path)?;
    let data: T = serde_json::from_str(&json)?;
    tracing::debug!("Data loaded from: {}", path.display());
    Ok(data)
}

pub fn load_json_or_default<T: for<'de> Deserialize<'de> + Serialize + Default>(path: &Path) -> T {
    match load_json::<T>(path) {
        Ok(data) => data,
        Err(e) => {
            tracing::warn!("Failed to load {}: {}. Using defaults.", path.display(), e);
            T::default()
        }
    }
}

/// Overwrites `path` with `contents`. Failures are logged and reported as `false`.
pub fn write_text_best_effort(path: &Path, contents: &str) -> bool {
    match fs::write(path, contents) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Could not write {}: {}", path.display(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{
        Deserialize,
        Serialize,
    };
    use tempfile::tempdir;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        #[serde(default)]
        count: u32,
        #[serde(default = "default_label")]
        label: String,
    }

    fn default_label() -> String {
        "fallback".to_string()
    }

    impl Default for Sample {
        fn default() -> Self {
            Self { count: 7, label: default_label() }
        }
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("sample.json");

        let loaded: Sample = load_json(&path).unwrap();
        assert_eq!(loaded, Sample::default());
        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample.json");
        fs::write(&path, "{ not json").unwrap();

        let loaded: Sample = load_json_or_default(&path);
        assert_eq!(loaded, Sample::default());
    }

    #[test]
    fn test_write_text_best_effort_reports_failure() {
        let dir = tempdir().unwrap();
        assert!(write_text_best_effort(&dir.path().join("ok.txt"), "A - B"));
        assert!(!write_text_best_effort(&dir.path().join("missing").join("x.txt"), "A"));
    }
}
