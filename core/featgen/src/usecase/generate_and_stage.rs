//! 「生成してステージ」ハンドラ
//!
//! nonce → 投稿 ID → 資格情報 → 投稿の存在 → 投稿タイプ の順に検証してから、
//! 生成・保存・昇格待ち記録を行う。資格情報が無ければ HTTP 呼び出しは一切しない。

use super::{AttachmentWriter, PendingFeaturedImage};
use crate::domain::{
    Credential, GeneratedImage, GenerationRequest, MediaAsset, Nonce, NonceAction, PostId, Prompt,
};
use crate::ports::outbound::{ImageGeneratorFactory, NonceService, PostRepository, SettingsStore};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use common::error::Error;
use common::ports::outbound::{Log, LogRecord};
use serde_json::{json, Value};
use std::sync::Arc;

/// 成功時の結果（プレビュー用に画像バイト列も返す）
#[derive(Debug, Clone)]
pub struct StagedImage {
    pub post: PostId,
    pub asset: MediaAsset,
    pub image: GeneratedImage,
}

impl StagedImage {
    /// エンベロープの data 部
    pub fn to_json(&self) -> Value {
        json!({
            "post_id": self.post.get(),
            "asset_id": self.asset.id.get(),
            "mime_type": self.asset.mime_type,
            "file_path": self.asset.file_path,
            "image_base64": STANDARD.encode(self.image.bytes()),
        })
    }
}

pub struct GenerateAndStage {
    nonces: Arc<dyn NonceService>,
    settings: Arc<dyn SettingsStore>,
    posts: Arc<dyn PostRepository>,
    generators: Arc<dyn ImageGeneratorFactory>,
    writer: Arc<AttachmentWriter>,
    pending: Arc<PendingFeaturedImage>,
    logger: Arc<dyn Log>,
}

impl GenerateAndStage {
    pub fn new(
        nonces: Arc<dyn NonceService>,
        settings: Arc<dyn SettingsStore>,
        posts: Arc<dyn PostRepository>,
        generators: Arc<dyn ImageGeneratorFactory>,
        writer: Arc<AttachmentWriter>,
        pending: Arc<PendingFeaturedImage>,
        logger: Arc<dyn Log>,
    ) -> Self {
        Self {
            nonces,
            settings,
            posts,
            generators,
            writer,
            pending,
            logger,
        }
    }

    pub fn handle(&self, post_id: &str, nonce: &Nonce) -> Result<StagedImage, Error> {
        self.nonces.verify(NonceAction::Generate, nonce)?;
        let post_id = PostId::parse(post_id)?;
        let settings = self.settings.load()?;
        let credential = Credential::new(settings.api_key.clone().unwrap_or_default())?;

        let post = self
            .posts
            .find_post(post_id)?
            .ok_or_else(|| Error::not_found(format!("post {} does not exist", post_id)))?;
        if !settings.is_eligible(&post.post_type) {
            return Err(Error::wrong_content_type(format!(
                "post {} has type '{}', which is not enabled for image generation",
                post_id, post.post_type
            )));
        }

        let prompt = Prompt::from_request(&GenerationRequest::new(&post.title, &post.content));
        let generator = self.generators.create(credential, &settings)?;
        let image = generator.generate(&prompt)?;
        let _ = self.logger.log(
            &LogRecord::info("image generated")
                .layer("usecase")
                .kind("generate")
                .field("post_id", post_id.get())
                .field("provider", generator.name())
                .field("prompt_chars", prompt.chars().count())
                .field("bytes", image.len()),
        );

        let asset = self.writer.store(&image, post_id)?;
        if let Some(orphan) = self.pending.mark_pending(post_id, asset.id)? {
            let _ = self.logger.log(
                &LogRecord::warn("pending featured image overwritten")
                    .layer("usecase")
                    .kind("pending")
                    .field("post_id", post_id.get())
                    .field("previous_asset_id", orphan.get())
                    .field("asset_id", asset.id.get()),
            );
        }

        Ok(StagedImage {
            post: post_id,
            asset,
            image,
        })
    }
}
