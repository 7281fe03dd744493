//! 設定画面に相当するユースケース（表示・資格情報の保存/消去・項目の書き換え）

use crate::domain::SettingsCommand;
use crate::ports::outbound::SettingsStore;
use common::error::Error;
use serde_json::Value;
use std::sync::Arc;

pub struct SettingsUseCase {
    store: Arc<dyn SettingsStore>,
}

impl SettingsUseCase {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// 操作を適用し、保存後の設定（api_key は伏せる）を返す
    pub fn run(&self, command: &SettingsCommand) -> Result<Value, Error> {
        let mut settings = self.store.load()?;
        match command {
            SettingsCommand::Show => return Ok(settings.to_display_json()),
            SettingsCommand::SetKey(key) => {
                if key.trim().is_empty() {
                    return Err(Error::invalid_argument(
                        "API key must not be empty; use `settings clear-key` to remove it",
                    ));
                }
                settings.set_api_key(Some(key.trim().to_string()));
            }
            SettingsCommand::ClearKey => settings.set_api_key(None),
            SettingsCommand::Set { name, value } => {
                settings
                    .set_field(name, value)
                    .map_err(Error::invalid_argument)?;
            }
        }
        self.store.save(&settings)?;
        // FEATGEN_API_KEY による上書きも反映した実効値を返す
        Ok(self.store.load()?.to_display_json())
    }
}
