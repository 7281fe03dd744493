//! settings.json 用の設定型
//!
//! 資格情報（api_key）と生成オプション。api_key 以外は省略時にデフォルトを使う。

use super::credential::mask;
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://api.together.xyz/v1/images/generations";
pub const DEFAULT_MODEL: &str = "black-forest-labs/FLUX.1-schnell-Free";
pub const DEFAULT_WIDTH: u32 = 1024;
pub const DEFAULT_HEIGHT: u32 = 768;
pub const DEFAULT_STEPS: u32 = 1;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// settings.json のルート
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// 画像生成 API のキー。未設定なら生成できない
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_steps")]
    pub steps: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// 生成・アイキャッチ設定の対象にする投稿タイプ
    #[serde(default = "default_eligible_post_types")]
    pub eligible_post_types: Vec<String>,
    /// api_key が FEATGEN_API_KEY から来ている間は true（ファイルには書かない）
    #[serde(skip)]
    pub api_key_from_env: bool,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_width() -> u32 {
    DEFAULT_WIDTH
}

fn default_height() -> u32 {
    DEFAULT_HEIGHT
}

fn default_steps() -> u32 {
    DEFAULT_STEPS
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_eligible_post_types() -> Vec<String> {
    vec!["post".to_string()]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            endpoint: default_endpoint(),
            width: default_width(),
            height: default_height(),
            steps: default_steps(),
            timeout_secs: default_timeout_secs(),
            eligible_post_types: default_eligible_post_types(),
            api_key_from_env: false,
        }
    }
}

impl Settings {
    /// JSON 文字列からパース（ファイル読みは adapter で行う）
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// 利用者が明示的に設定した api_key（環境変数の上書きは外れる）
    pub fn set_api_key(&mut self, key: Option<String>) {
        self.api_key = key;
        self.api_key_from_env = false;
    }

    pub fn is_eligible(&self, post_type: &str) -> bool {
        self.eligible_post_types.iter().any(|t| t == post_type)
    }

    /// 表示用（api_key を伏せた JSON）
    pub fn to_display_json(&self) -> serde_json::Value {
        let mut v = serde_json::json!({
            "model": self.model,
            "endpoint": self.endpoint,
            "width": self.width,
            "height": self.height,
            "steps": self.steps,
            "timeout_secs": self.timeout_secs,
            "eligible_post_types": self.eligible_post_types,
        });
        v["api_key"] = match &self.api_key {
            Some(k) if !k.trim().is_empty() => serde_json::json!(mask(k.trim())),
            _ => serde_json::Value::Null,
        };
        if self.api_key_from_env {
            v["api_key_source"] = serde_json::json!("env");
        }
        v
    }

    /// `featgen settings set <name> <value>` で 1 項目を書き換える
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), String> {
        fn num<T: std::str::FromStr>(name: &str, value: &str) -> Result<T, String> {
            value
                .trim()
                .parse::<T>()
                .map_err(|_| format!("'{}' expects a number, got '{}'", name, value))
        }
        match name {
            "model" => self.model = value.to_string(),
            "endpoint" => self.endpoint = value.to_string(),
            "width" => self.width = num(name, value)?,
            "height" => self.height = num(name, value)?,
            "steps" => self.steps = num(name, value)?,
            "timeout_secs" => self.timeout_secs = num(name, value)?,
            "eligible_post_types" => {
                self.eligible_post_types = value
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            }
            _ => return Err(format!("unknown setting '{}'", name)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_object_uses_defaults() {
        let s = Settings::parse("{}").unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.width, 1024);
        assert_eq!(s.height, 768);
        assert_eq!(s.steps, 1);
        assert_eq!(s.timeout_secs, 30);
        assert!(s.is_eligible("post"));
        assert!(!s.is_eligible("page"));
    }

    #[test]
    fn test_parse_overrides() {
        let s = Settings::parse(
            r#"{"api_key":"k-123456","model":"m","eligible_post_types":["post","page"]}"#,
        )
        .unwrap();
        assert_eq!(s.api_key.as_deref(), Some("k-123456"));
        assert_eq!(s.model, "m");
        assert!(s.is_eligible("page"));
        assert_eq!(s.to_display_json()["api_key"], "****3456");
    }

    #[test]
    fn test_set_field() {
        let mut s = Settings::default();
        s.set_field("width", "512").unwrap();
        s.set_field("eligible_post_types", "post, page").unwrap();
        assert_eq!(s.width, 512);
        assert_eq!(s.eligible_post_types, vec!["post", "page"]);
        assert!(s.set_field("width", "wide").is_err());
        assert!(s.set_field("colour", "red").is_err());
    }
}
