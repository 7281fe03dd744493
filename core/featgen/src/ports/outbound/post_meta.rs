//! 投稿ごとのキー・値ストア Outbound ポート（ホストの postmeta）

use crate::domain::PostId;
use common::error::Error;

/// 投稿 ID × キーで 1 つの値を持つストア
pub trait PostMetaStore: Send + Sync {
    fn get_meta(&self, post: PostId, key: &str) -> Result<Option<String>, Error>;
    /// 値を上書きし、直前の値を返す（後勝ち）
    fn set_meta(&self, post: PostId, key: &str, value: &str) -> Result<Option<String>, Error>;
    /// 値を取り出して同時に消す（test-and-clear）。2 回目以降は None
    fn take_meta(&self, post: PostId, key: &str) -> Result<Option<String>, Error>;
}
