use std::fs;
use std::io::Write;
use std::path::Path;

use chat_core::ToolConfig;
use chat_logging::{chat_error, chat_info, chat_warn};
use serde::{Deserialize, Serialize};

const SETTINGS_FILENAME: &str = ".chat_settings.ron";
const TOOL_CONFIG_FILENAME: &str = "tools.json";

/// Connection settings for the event store and the chat backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    pub store_url: String,
    pub store_api_key: Option<String>,
    pub collection: String,
    pub poll_interval_ms: u64,
    pub backend_url: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            store_url: "http://localhost:6333".to_string(),
            store_api_key: None,
            collection: "events".to_string(),
            poll_interval_ms: 500,
            backend_url: "http://localhost:8000".to_string(),
        }
    }
}

pub(crate) fn load_settings(dir: &Path) -> AppSettings {
    let path = dir.join(SETTINGS_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let settings = AppSettings::default();
            save_settings(dir, &settings);
            return settings;
        }
        Err(err) => {
            chat_warn!("Failed to read settings from {path:?}: {err}");
            return AppSettings::default();
        }
    };

    match ron::from_str(&content) {
        Ok(settings) => settings,
        Err(err) => {
            chat_warn!("Failed to parse settings from {path:?}: {err}");
            AppSettings::default()
        }
    }
}

pub(crate) fn save_settings(dir: &Path, settings: &AppSettings) {
    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(settings, pretty) {
        Ok(text) => text,
        Err(err) => {
            chat_error!("Failed to serialize settings: {err}");
            return;
        }
    };
    write_atomic(dir, SETTINGS_FILENAME, &content);
}

/// Loads the admin tool configuration, writing the defaults when none exists
/// yet. A present-but-invalid file is left untouched; the defaults apply for
/// this run only.
pub(crate) fn ensure_tool_config(dir: &Path) -> ToolConfig {
    let path = dir.join(TOOL_CONFIG_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let config = ToolConfig::default();
            save_tool_config(dir, &config);
            return config;
        }
        Err(err) => {
            chat_warn!("Failed to read tool config from {path:?}: {err}");
            return ToolConfig::default();
        }
    };

    match ToolConfig::from_json(&content) {
        Ok(config) => {
            chat_info!("Loaded tool config from {path:?}");
            config
        }
        Err(err) => {
            chat_warn!("Invalid tool config in {path:?}: {err}");
            ToolConfig::default()
        }
    }
}

pub(crate) fn save_tool_config(dir: &Path, config: &ToolConfig) {
    let content = match config.to_json() {
        Ok(text) => text,
        Err(err) => {
            chat_error!("Failed to serialize tool config: {err}");
            return;
        }
    };
    write_atomic(dir, TOOL_CONFIG_FILENAME, &content);
}

/// Writes content to `{dir}/{filename}` via a temp file and rename, so a
/// crash mid-write never leaves a truncated file behind.
fn write_atomic(dir: &Path, filename: &str, content: &str) {
    let target = dir.join(filename);
    let result = tempfile::NamedTempFile::new_in(dir).and_then(|mut tmp| {
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&target).map_err(|err| err.error)?;
        Ok(())
    });
    if let Err(err) = result {
        chat_error!("Failed to write {target:?}: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let settings = AppSettings {
            store_url: "http://qdrant.internal:6333".to_string(),
            poll_interval_ms: 750,
            ..AppSettings::default()
        };

        save_settings(dir.path(), &settings);
        assert_eq!(load_settings(dir.path()), settings);
    }

    #[test]
    fn missing_settings_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(dir.path());

        assert_eq!(settings, AppSettings::default());
        assert!(dir.path().join(SETTINGS_FILENAME).exists());
    }

    #[test]
    fn malformed_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILENAME), "not ron at all").unwrap();

        assert_eq!(load_settings(dir.path()), AppSettings::default());
    }

    #[test]
    fn missing_tool_config_writes_validated_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ensure_tool_config(dir.path());

        assert_eq!(config, ToolConfig::default());
        let written = fs::read_to_string(dir.path().join(TOOL_CONFIG_FILENAME)).unwrap();
        ToolConfig::from_json(&written).unwrap();
    }

    #[test]
    fn invalid_tool_config_is_left_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TOOL_CONFIG_FILENAME);
        fs::write(&path, r#"{ "name": "someOtherTool" }"#).unwrap();

        let config = ensure_tool_config(dir.path());
        assert_eq!(config, ToolConfig::default());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"{ "name": "someOtherTool" }"#
        );
    }
}
