//! Outbound ポート: アプリが外界（画像生成 API・ホスト CMS・設定・nonce）を使うための trait

pub mod image_generator;
pub mod media_catalog;
pub mod nonce_service;
pub mod post_meta;
pub mod post_repository;
pub mod settings_store;

pub use image_generator::{ImageGenerator, ImageGeneratorFactory};
pub use media_catalog::MediaCatalog;
pub use nonce_service::NonceService;
pub use post_meta::PostMetaStore;
pub use post_repository::PostRepository;
pub use settings_store::SettingsStore;
