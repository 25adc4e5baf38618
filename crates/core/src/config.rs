use std::path::PathBuf;

pub const DEFAULT_WEB_APP_TITLE: &str = "React App";
pub const WEB_APP_TITLE_ENV: &str = "VIDNOTE_WEB_APP_TITLE";
pub const STORAGE_PATH_ENV: &str = "VIDNOTE_STORAGE_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VidnoteConfig {
    /// Page title identifying the companion web-app tab.
    pub web_app_title: String,
    pub storage_path: PathBuf,
}

impl Default for VidnoteConfig {
    fn default() -> Self {
        Self {
            web_app_title: DEFAULT_WEB_APP_TITLE.to_string(),
            storage_path: default_storage_path(),
        }
    }
}

impl VidnoteConfig {
    /// Defaults overridden by `VIDNOTE_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(title) = lookup(WEB_APP_TITLE_ENV).filter(|t| !t.trim().is_empty()) {
            config.web_app_title = title;
        }
        if let Some(path) = lookup(STORAGE_PATH_ENV).filter(|p| !p.trim().is_empty()) {
            config.storage_path = PathBuf::from(path);
        }

        config
    }
}

pub fn get_root_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("vidnote")
}

pub fn default_storage_path() -> PathBuf {
    get_root_data_dir().join("notes.json")
}
