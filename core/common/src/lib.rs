//! featgen 共通ライブラリ
//!
//! `featgen` コマンドと、その上に載るアダプタで共有される基盤（エラー型・ドメイン型・
//! Outbound ポート・標準アダプタ）を提供します。

/// エラーハンドリング
pub mod error;

/// ドメイン型（Newtype）
pub mod domain;

/// Ports & Adapters のポート定義
pub mod ports;

/// 標準アダプタ（std::fs / SystemTime / 環境変数 / JSONL ログ）
pub mod adapter;
