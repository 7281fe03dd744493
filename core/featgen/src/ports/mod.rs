//! Ports & Adapters のポート定義
//!
//! - inbound: CLI がアプリを呼び出すインターフェース
//! - outbound: アプリがホスト CMS・画像生成 API・設定に依頼するための trait

pub mod inbound;
pub mod outbound;
