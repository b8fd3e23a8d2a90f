use league_api::client::DEFAULT_API_ROOT;
use log::{LevelFilter, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "settings.json";
const API_ROOT_ENV: &str = "LEAGUETUI_API_ROOT";
const LOG_ENV: &str = "LEAGUETUI_LOG";

/// On-disk settings. Every field is optional.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct SettingsFile {
    pub api_root: Option<String>,
    pub log_level: Option<String>,
    pub full_screen: bool,
}

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub api_root: String,
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    /// Team whose matches open on startup.
    pub team: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_root: DEFAULT_API_ROOT.to_string(),
            full_screen: false,
            log_level: None,
            team: None,
        }
    }
}

impl AppSettings {
    /// Settings file, then environment. Command-line flags are applied by the caller.
    pub fn load() -> Self {
        let file = settings_path()
            .and_then(|path| read_settings_file(&path))
            .unwrap_or_default();
        resolve(
            file,
            std::env::var(API_ROOT_ENV).ok(),
            std::env::var(LOG_ENV).ok(),
        )
    }
}

/// Merge the settings file with environment overrides. Environment wins.
pub fn resolve(file: SettingsFile, env_api_root: Option<String>, env_log: Option<String>) -> AppSettings {
    let api_root = non_empty(env_api_root)
        .or_else(|| non_empty(file.api_root))
        .unwrap_or_else(|| DEFAULT_API_ROOT.to_string());
    let log_level = non_empty(env_log)
        .or_else(|| non_empty(file.log_level))
        .and_then(|level| parse_level(&level));

    AppSettings { api_root, full_screen: file.full_screen, log_level, team: None }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_level(level: &str) -> Option<LevelFilter> {
    match level.parse::<LevelFilter>() {
        Ok(filter) => Some(filter),
        Err(_) => {
            warn!("ignoring unknown log level {level:?}");
            None
        }
    }
}

fn settings_path() -> Option<PathBuf> {
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return Some(PathBuf::from(config_dir).join("leaguetui").join(SETTINGS_FILE));
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join("leaguetui")
                .join(SETTINGS_FILE),
        );
    }
    None
}

fn read_settings_file(path: &Path) -> Option<SettingsFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(file) => Some(file),
        Err(e) => {
            warn!("ignoring malformed settings file {}: {e}", path.display());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file_or_env() {
        let settings = resolve(SettingsFile::default(), None, None);
        assert_eq!(settings.api_root, DEFAULT_API_ROOT);
        assert_eq!(settings.log_level, None);
        assert!(!settings.full_screen);
    }

    #[test]
    fn environment_overrides_file() {
        let file: SettingsFile = serde_json::from_str(
            r#"{"api_root": "http://file:1", "log_level": "warn", "full_screen": true}"#,
        )
        .expect("valid settings");
        let settings = resolve(file.clone(), Some("http://env:2".into()), Some("DEBUG".into()));
        assert_eq!(settings.api_root, "http://env:2");
        assert_eq!(settings.log_level, Some(LevelFilter::Debug));
        assert!(settings.full_screen);

        let settings = resolve(file, Some("  ".into()), None);
        assert_eq!(settings.api_root, "http://file:1");
        assert_eq!(settings.log_level, Some(LevelFilter::Warn));
    }

    #[test]
    fn unknown_log_level_is_ignored() {
        let settings = resolve(SettingsFile::default(), None, Some("loud".into()));
        assert_eq!(settings.log_level, None);
    }

    #[test]
    fn partial_settings_file_parses() {
        let file: SettingsFile = serde_json::from_str("{}").expect("empty object");
        assert!(file.api_root.is_none());
    }
}
