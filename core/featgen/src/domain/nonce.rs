//! 偽造防止トークン（nonce）のドメイン型

use std::fmt;

/// トークンを束縛する操作名
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceAction {
    /// 生成してステージする
    Generate,
    /// 既存アセットを直接アイキャッチにする
    Assign,
}

impl NonceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generate => "featgen_generate",
            Self::Assign => "featgen_assign",
        }
    }

    /// CLI の `featgen nonce <action>` の値から
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "generate" | "featgen_generate" => Some(Self::Generate),
            "assign" | "featgen_assign" => Some(Self::Assign),
            _ => None,
        }
    }
}

impl fmt::Display for NonceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 呼び出し元が提示したトークン
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nonce(String);

impl Nonce {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl AsRef<str> for Nonce {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
