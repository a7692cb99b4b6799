use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::recent::RecentContainers;

const PREFERENCES_VERSION: u32 = 1;
pub const PREFERENCES_FILE: &str = "preferences.json";
pub const CONFIG_DIR_ENV: &str = "RCEDITOR_CONFIG_DIR";
pub const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to read preferences {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse preferences {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize preferences {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write preferences {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("no configuration directory: set RCEDITOR_CONFIG_DIR or HOME")]
    NoConfigDir,
}

/// 編輯器偏好設定。 / Editor preferences persisted between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorPreferences {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub recent: RecentContainers,
    #[serde(default)]
    pub last_directory: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_version() -> u32 {
    PREFERENCES_VERSION
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for EditorPreferences {
    fn default() -> Self {
        Self {
            version: PREFERENCES_VERSION,
            recent: RecentContainers::default(),
            last_directory: None,
            log_level: default_log_level(),
        }
    }
}

impl EditorPreferences {
    pub fn sanitize(&mut self) {
        if self.version == 0 {
            self.version = PREFERENCES_VERSION;
        }
        let level = self.log_level.trim().to_ascii_lowercase();
        self.log_level = match level.as_str() {
            "warning" => "warn".to_string(),
            known if LOG_LEVELS.contains(&known) => known.to_string(),
            _ => default_log_level(),
        };
        if self
            .last_directory
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            self.last_directory = None;
        }
        self.recent.sanitize();
    }

    /// 記錄剛開啟或建立的容器。 / Remembers a container that was just opened or created.
    ///
    /// The chooser's starting point becomes the container's parent directory.
    pub fn remember_container(&mut self, dir: &Path) {
        self.recent.touch(dir);
        self.last_directory = dir
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf);
    }
}

#[derive(Debug)]
pub struct PreferencesStore {
    path: PathBuf,
    data: EditorPreferences,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>, preferences: EditorPreferences) -> Self {
        Self {
            path: path.into(),
            data: preferences,
        }
    }

    /// 讀取設定；檔案不存在時回傳預設值。 / Loads preferences, defaulting when the file is missing.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PreferencesError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            let mut data = EditorPreferences::default();
            data.sanitize();
            return Ok(Self { path, data });
        }

        let contents = fs::read_to_string(&path).map_err(|source| PreferencesError::Read {
            path: path.clone(),
            source,
        })?;
        let mut data: EditorPreferences =
            serde_json::from_str(&contents).map_err(|source| PreferencesError::Parse {
                path: path.clone(),
                source,
            })?;
        data.sanitize();
        Ok(Self { path, data })
    }

    /// Loads `preferences.json` from the user configuration directory.
    pub fn load_default() -> Result<Self, PreferencesError> {
        let dir = config_dir().ok_or(PreferencesError::NoConfigDir)?;
        Self::load(dir.join(PREFERENCES_FILE))
    }

    pub fn preferences(&self) -> &EditorPreferences {
        &self.data
    }

    pub fn preferences_mut(&mut self) -> &mut EditorPreferences {
        &mut self.data
    }

    pub fn update<F>(&mut self, mut op: F) -> Result<(), PreferencesError>
    where
        F: FnMut(&mut EditorPreferences),
    {
        op(&mut self.data);
        self.data.sanitize();
        self.save()
    }

    /// 移除已消失的最近容器並寫回磁碟。 / Drops recent containers that lost their `marker`
    /// file and persists the list when anything was removed.
    pub fn prune_recent(&mut self, marker: &str) -> Result<usize, PreferencesError> {
        let removed = self.data.recent.prune_missing(marker);
        if removed > 0 {
            self.save()?;
        }
        Ok(removed)
    }

    pub fn save(&self) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| PreferencesError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let payload = serde_json::to_string_pretty(&self.data).map_err(|source| {
            PreferencesError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, payload.as_bytes()).map_err(|source| PreferencesError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| PreferencesError::Write {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory holding the preferences file; logs are written next to it.
    pub fn dir(&self) -> Option<&Path> {
        self.path.parent()
    }
}

/// 使用者設定目錄。 / `$RCEDITOR_CONFIG_DIR`, else `$HOME/.rceditor`.
pub fn config_dir() -> Option<PathBuf> {
    resolve_config_dir(std::env::var_os(CONFIG_DIR_ENV), std::env::var_os("HOME"))
}

fn resolve_config_dir(overridden: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    if let Some(dir) = overridden.filter(|dir| !dir.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    home.filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(".rceditor"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_over_home() {
        let dir = resolve_config_dir(Some("/srv/rc".into()), Some("/home/ana".into()));
        assert_eq!(dir, Some(PathBuf::from("/srv/rc")));
    }

    #[test]
    fn home_fallback_and_missing_both() {
        let dir = resolve_config_dir(Some("".into()), Some("/home/ana".into()));
        assert_eq!(dir, Some(PathBuf::from("/home/ana/.rceditor")));
        assert_eq!(resolve_config_dir(None, None), None);
    }

    #[test]
    fn sanitize_normalizes_log_level() {
        let mut prefs = EditorPreferences {
            log_level: " WARNING ".into(),
            ..EditorPreferences::default()
        };
        prefs.sanitize();
        assert_eq!(prefs.log_level, "warn");

        prefs.log_level = "loud".into();
        prefs.sanitize();
        assert_eq!(prefs.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn remember_container_tracks_parent() {
        let mut prefs = EditorPreferences::default();
        prefs.remember_container(Path::new("/work/rcs/en_ulb"));
        assert_eq!(prefs.last_directory, Some(PathBuf::from("/work/rcs")));
        assert_eq!(prefs.recent.first(), Some(Path::new("/work/rcs/en_ulb")));
    }
}
