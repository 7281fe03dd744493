//! featgen コマンドの enum（Command Pattern）
//!
//! ID やトークンは生の文字列のまま運び、検証はユースケース側で行う。

use super::PostUpdate;
use std::path::PathBuf;

/// featgen の実行モード
#[derive(Debug, Clone, PartialEq)]
pub enum FeatgenCommand {
    /// ヘルプ表示
    Help,
    /// 偽造防止トークンを発行する
    Nonce { action: String },
    /// 画像を生成してアイキャッチ候補としてステージする
    Generate {
        post: String,
        nonce: String,
        preview_out: Option<PathBuf>,
    },
    /// 既存アセットを直接アイキャッチにする
    Assign {
        post: String,
        asset: String,
        nonce: String,
    },
    /// 投稿を保存し Save Hook を走らせる
    Save {
        post: String,
        update: PostUpdate,
        autosave: bool,
        revision: bool,
    },
    Post(PostCommand),
    Settings(SettingsCommand),
}

/// 投稿の管理（ホスト側の最小限の操作）
#[derive(Debug, Clone, PartialEq)]
pub enum PostCommand {
    New {
        title: String,
        content: String,
        post_type: String,
        status: String,
    },
    Show { post: String },
}

/// 設定画面に相当する操作
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsCommand {
    Show,
    SetKey(String),
    ClearKey,
    Set { name: String, value: String },
}
