//! settings.json で設定を保存・読み込みするアダプタ
//!
//! FEATGEN_API_KEY が与えられていれば読み込み時に api_key を差し替える（ファイルには書かない）。

use crate::domain::Settings;
use crate::ports::outbound::SettingsStore;
use common::error::Error;
use common::ports::outbound::FileSystem;
use std::path::PathBuf;
use std::sync::Arc;

pub struct FileSettingsStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
    api_key_override: Option<String>,
}

impl FileSettingsStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            path: path.into(),
            api_key_override: None,
        }
    }

    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        self.api_key_override = key;
        self
    }

    fn load_file(&self) -> Result<Settings, Error> {
        if !self.fs.exists(&self.path) {
            return Ok(Settings::default());
        }
        let s = self.fs.read_to_string(&self.path)?;
        Settings::parse(&s).map_err(|e| {
            Error::json(format!("Failed to parse '{}': {}", self.path.display(), e))
        })
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> Result<Settings, Error> {
        let mut settings = self.load_file()?;
        if let Some(key) = &self.api_key_override {
            settings.api_key = Some(key.clone());
            settings.api_key_from_env = true;
        }
        Ok(settings)
    }

    fn save(&self, settings: &Settings) -> Result<(), Error> {
        let mut settings = settings.clone();
        if settings.api_key_from_env {
            // 上書き値はファイルに書かず、保存済みの値を残す
            settings.api_key = self.load_file()?.api_key;
        }
        if let Some(parent) = self.path.parent() {
            self.fs.create_dir_all(parent)?;
        }
        let json =
            serde_json::to_string_pretty(&settings).map_err(|e| Error::json(e.to_string()))?;
        self.fs.write_atomic(&self.path, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::adapter::StdFileSystem;

    #[test]
    fn test_load_defaults_when_missing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(Arc::new(StdFileSystem), tmp.path().join("settings.json"));
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("settings.json");
        let store = FileSettingsStore::new(Arc::new(StdFileSystem), &path);
        let settings = Settings {
            api_key: Some("abc".to_string()),
            width: 512,
            ..Settings::default()
        };
        store.save(&settings).unwrap();
        assert_eq!(store.load().unwrap(), settings);
    }

    #[test]
    fn test_api_key_override_wins_but_is_not_persisted() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
        FileSettingsStore::new(Arc::clone(&fs), &path)
            .save(&Settings {
                api_key: Some("stored".to_string()),
                ..Settings::default()
            })
            .unwrap();
        let store = FileSettingsStore::new(fs, &path)
            .with_api_key_override(Some("from-env".to_string()));
        assert_eq!(store.load().unwrap().api_key.as_deref(), Some("from-env"));
        assert!(std::fs::read_to_string(&path).unwrap().contains("stored"));

        // 他の項目を変えて保存しても上書き値はファイルに残らない
        let mut settings = store.load().unwrap();
        settings.width = 640;
        store.save(&settings).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("stored"));
        assert!(!written.contains("from-env"));
        assert!(written.contains("640"));
    }

    #[test]
    fn test_explicit_key_equal_to_override_is_persisted() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        let store = FileSettingsStore::new(Arc::new(StdFileSystem), &path)
            .with_api_key_override(Some("from-env".to_string()));
        let mut settings = store.load().unwrap();
        assert!(settings.api_key_from_env);
        settings.set_api_key(Some("from-env".to_string()));
        store.save(&settings).unwrap();
        let on_disk = Settings::parse(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn test_invalid_json_is_json_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = FileSettingsStore::new(Arc::new(StdFileSystem), &path);
        assert!(matches!(store.load(), Err(Error::Json(_))));
    }
}
