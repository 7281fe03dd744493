//! 投稿 ID / アセット ID のドメイン型
//!
//! どちらも正の整数。0・空・数値でない入力は InvalidIdentifier。

use common::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! positive_id {
    ($name:ident, $label:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            pub fn new(id: u64) -> Result<Self, Error> {
                if id == 0 {
                    return Err(Error::invalid_identifier(concat!($label, " must be a positive integer")));
                }
                Ok(Self(id))
            }

            /// 呼び出し元から渡された文字列を検証して ID にする
            pub fn parse(s: &str) -> Result<Self, Error> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(Error::invalid_identifier(concat!($label, " is missing")));
                }
                let id = trimmed.parse::<u64>().map_err(|_| {
                    Error::invalid_identifier(format!("{} '{}' is not a number", $label, trimmed))
                })?;
                Self::new(id)
            }

            pub fn get(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

positive_id!(PostId, "post id");
positive_id!(AssetId, "asset id");
