//! 実行時ディレクトリ（FEATGEN_HOME / FEATGEN_SITE 解決結果）
//!
//! EnvResolver::resolve_dirs() で取得し、設定・ログ・サイトデータのパス計算に使う。

use super::{HomeDir, SiteDir};
use std::path::PathBuf;

/// 解決済みのホーム / サイトディレクトリ
#[derive(Debug, Clone)]
pub struct Dirs {
    pub home: HomeDir,
    pub site: SiteDir,
}

impl Dirs {
    /// 設定ファイル（settings.json）
    pub fn settings_path(&self) -> PathBuf {
        self.home.join("settings.json")
    }

    /// ログ格納ディレクトリ
    pub fn logs_dir(&self) -> PathBuf {
        self.home.join("logs")
    }

    /// JSONL ログファイル
    pub fn log_path(&self) -> PathBuf {
        self.logs_dir().join("featgen.jsonl")
    }
}
