//! Outbound ポートの実装（画像生成 API・JSON ファイルのホスト状態・設定・nonce）

pub mod file_nonce_store;
pub mod file_settings_store;
pub mod json_site_store;
pub mod together_image_generator;

pub use file_nonce_store::FileNonceStore;
pub use file_settings_store::FileSettingsStore;
pub use json_site_store::JsonSiteStore;
pub use together_image_generator::{TogetherImageGenerator, TogetherImageGeneratorFactory};
