//! 設定の保存・読み込み Outbound ポート

use crate::domain::Settings;
use common::error::Error;

pub trait SettingsStore: Send + Sync {
    /// ファイルが無ければデフォルト設定を返す
    fn load(&self) -> Result<Settings, Error>;
    fn save(&self, settings: &Settings) -> Result<(), Error>;
}
