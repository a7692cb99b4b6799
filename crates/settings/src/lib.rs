pub mod preferences;
pub mod recent;

pub use preferences::{
    config_dir, EditorPreferences, PreferencesError, PreferencesStore, CONFIG_DIR_ENV,
    DEFAULT_LOG_LEVEL, PREFERENCES_FILE,
};
pub use recent::{RecentContainers, DEFAULT_RECENT_CAPACITY};
