//! 画像生成 API の資格情報（不透明な文字列）

use common::error::Error;
use std::fmt;

/// API キー。存在（空でないこと）以外の検証はしない
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// 空・空白のみは MissingCredential
    pub fn new(key: impl Into<String>) -> Result<Self, Error> {
        let key = key.into();
        let key = key.trim();
        if key.is_empty() {
            return Err(Error::missing_credential(
                "no API key configured; run `featgen settings set-key <key>`",
            ));
        }
        Ok(Self(key.to_string()))
    }

    /// Authorization ヘッダの値
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }

    /// 表示用（末尾 4 文字以外を伏せる）
    pub fn masked(&self) -> String {
        mask(&self.0)
    }
}

pub(crate) fn mask(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), tail)
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.masked()).finish()
    }
}
