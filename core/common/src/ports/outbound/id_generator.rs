//! 一意 ID 生成 Outbound ポート
//!
//! アップロードファイル名の一意部分に使う。テストでは固定 ID を返す実装を渡せる。

/// 固定長・辞書順＝生成順の ID を生成する抽象（Outbound ポート）
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}
