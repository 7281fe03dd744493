//! 環境変数解決 Outbound ポート
//!
//! ホームディレクトリ・サイトディレクトリ・資格情報の上書きを環境変数から解決する。
//! usecase はこの trait 経由でのみ環境変数にアクセスする。

use crate::domain::{Dirs, HomeDir, SiteDir};
use crate::error::Error;

/// 環境変数解決抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdEnvResolver` やテスト用のモックなど。
pub trait EnvResolver: Send + Sync {
    /// ホームディレクトリを環境変数から解決する
    ///
    /// 優先順位:
    /// 1. FEATGEN_HOME（設定されていれば）
    /// 2. $XDG_CONFIG_HOME/featgen（XDG_CONFIG_HOME が設定されていれば）
    /// 3. $HOME/.config/featgen
    fn resolve_home_dir(&self) -> Result<HomeDir, Error>;

    /// サイトディレクトリ。FEATGEN_SITE が無ければ `<home>/site`
    fn resolve_site_dir(&self, home: &HomeDir) -> SiteDir;

    /// FEATGEN_API_KEY（設定ファイルの資格情報より優先する）
    fn api_key_override(&self) -> Option<String>;

    /// ホームとサイトをまとめて解決する
    fn resolve_dirs(&self) -> Result<Dirs, Error> {
        let home = self.resolve_home_dir()?;
        let site = self.resolve_site_dir(&home);
        Ok(Dirs { home, site })
    }
}
