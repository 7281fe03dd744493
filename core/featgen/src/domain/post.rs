//! 投稿（コンテンツアイテム）のドメイン型

use super::{AssetId, PostId};
use serde::{Deserialize, Serialize};

/// ホスト側の投稿
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    /// 例: post, page, attachment
    pub post_type: String,
    pub title: String,
    pub content: String,
    /// 例: draft, publish
    pub status: String,
    /// アイキャッチ画像（ホストの関連）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<AssetId>,
}

/// 新規投稿の入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub post_type: String,
    pub title: String,
    pub content: String,
    pub status: String,
}

/// 保存時に書き換えるフィールド（None は変更なし）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// ホストが投稿を保存したときに Save Hook へ渡すイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEvent {
    pub post: Post,
    /// 自動保存（バックグラウンド保存）
    pub is_autosave: bool,
    /// リビジョンの保存
    pub is_revision: bool,
}

impl SaveEvent {
    pub fn new(post: Post) -> Self {
        Self {
            post,
            is_autosave: false,
            is_revision: false,
        }
    }
}
