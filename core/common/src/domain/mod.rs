//! ドメイン型（Newtype）
//!
//! PathBuf を直接運ばず、意味のある型に包んで境界を明確にする。

pub mod dirs;

use std::path::{Path, PathBuf};

pub use dirs::Dirs;

/// ホームディレクトリ（設定・ログの置き場所）のパス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeDir(PathBuf);

impl HomeDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }
}

impl std::ops::Deref for HomeDir {
    type Target = PathBuf;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for HomeDir {
    fn as_ref(&self) -> &Path {
        self.0.as_ref()
    }
}

/// サイトディレクトリ（投稿・メディア・postmeta・アップロードを保持する）のパス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDir(PathBuf);

impl SiteDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    /// アップロードファイルのルート
    pub fn uploads_dir(&self) -> PathBuf {
        self.0.join("uploads")
    }
}

impl std::ops::Deref for SiteDir {
    type Target = PathBuf;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for SiteDir {
    fn as_ref(&self) -> &Path {
        self.0.as_ref()
    }
}

impl From<PathBuf> for SiteDir {
    fn from(p: PathBuf) -> Self {
        Self(p)
    }
}
