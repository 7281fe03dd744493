//! 「既存アセットを直接アイキャッチにする」ハンドラ（手動選択の経路）

use crate::domain::{AssetId, Nonce, NonceAction, PostId};
use crate::ports::outbound::{MediaCatalog, NonceService, PostRepository, SettingsStore};
use common::error::Error;
use common::ports::outbound::{Log, LogRecord};
use std::sync::Arc;

pub struct AssignFeaturedImage {
    nonces: Arc<dyn NonceService>,
    settings: Arc<dyn SettingsStore>,
    posts: Arc<dyn PostRepository>,
    catalog: Arc<dyn MediaCatalog>,
    logger: Arc<dyn Log>,
}

impl AssignFeaturedImage {
    pub fn new(
        nonces: Arc<dyn NonceService>,
        settings: Arc<dyn SettingsStore>,
        posts: Arc<dyn PostRepository>,
        catalog: Arc<dyn MediaCatalog>,
        logger: Arc<dyn Log>,
    ) -> Self {
        Self {
            nonces,
            settings,
            posts,
            catalog,
            logger,
        }
    }

    pub fn handle(
        &self,
        post_id: &str,
        asset_id: &str,
        nonce: &Nonce,
    ) -> Result<(PostId, AssetId), Error> {
        self.nonces.verify(NonceAction::Assign, nonce)?;
        let post_id = PostId::parse(post_id)?;
        let asset_id = AssetId::parse(asset_id)?;

        let post = self
            .posts
            .find_post(post_id)?
            .ok_or_else(|| Error::not_found(format!("post {} does not exist", post_id)))?;
        if !self.settings.load()?.is_eligible(&post.post_type) {
            return Err(Error::wrong_content_type(format!(
                "post {} has type '{}', which does not take a featured image here",
                post_id, post.post_type
            )));
        }
        if self.catalog.find_asset(asset_id)?.is_none() {
            return Err(Error::not_found(format!("asset {} does not exist", asset_id)));
        }

        self.posts.set_featured_image(post_id, asset_id)?;
        let _ = self.logger.log(
            &LogRecord::info("featured image assigned")
                .layer("usecase")
                .kind("assign")
                .field("post_id", post_id.get())
                .field("asset_id", asset_id.get()),
        );
        Ok((post_id, asset_id))
    }
}
