//! メディアアセット（添付ファイル）のドメイン型

use super::{AssetId, PostId};
use serde::{Deserialize, Serialize};

/// 添付の公開状態。親投稿から継承する
pub const STATUS_INHERIT: &str = "inherit";

/// メディアカタログに登録済みのアセット
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub id: AssetId,
    /// uploads ディレクトリからの相対パス（例: 2026/10/featgen-0AbC12xy.png）
    pub file_path: String,
    pub mime_type: String,
    pub parent: PostId,
    pub status: String,
    pub title: String,
    /// RFC3339
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AttachmentMetadata>,
}

/// カタログに登録する前のアセット
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMediaAsset {
    pub file_path: String,
    pub mime_type: String,
    pub parent: PostId,
    pub status: String,
    pub title: String,
    pub created_at: String,
}

/// 派生メタデータ（画素寸法・ファイルサイズ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    pub filesize: u64,
    pub file: String,
}
