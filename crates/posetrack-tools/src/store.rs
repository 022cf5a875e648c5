//! 基于配置文件的本地配置存储

use std::path::{Path, PathBuf};

use posetrack_backend::ConfigStore;

use crate::settings::{Settings, SettingsError};

/// 读写 `[store]` 段落的配置存储
#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
    settings: Settings,
}

impl FileConfigStore {
    /// 打开配置文件（不存在时为空配置）
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let settings = Settings::load(&path)?;
        Ok(Self { path, settings })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.settings.store.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.settings.store.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.settings.store.remove(key)
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        self.settings.save(&self.path)
    }
}

impl ConfigStore for FileConfigStore {
    fn read_string(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_reads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileConfigStore::open(dir.path().join("config.toml")).unwrap();
        assert_eq!(store.read_string("environment", ""), "");
        assert_eq!(store.read_string("placement", "x"), "x");
    }

    #[test]
    fn test_set_save_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut store = FileConfigStore::open(&path).unwrap();
        store.set("environment", "1@0,0,2");
        store.set("placement", "0,0,0;0,0,0,1");
        store.save().unwrap();

        let mut reopened = FileConfigStore::open(&path).unwrap();
        assert_eq!(reopened.read_string("environment", ""), "1@0,0,2");
        assert_eq!(reopened.remove("placement").as_deref(), Some("0,0,0;0,0,0,1"));
        assert_eq!(reopened.read_string("placement", "none"), "none");
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[store\nenvironment=").unwrap();
        assert!(matches!(
            FileConfigStore::open(&path),
            Err(SettingsError::Parse(_))
        ));
    }
}
