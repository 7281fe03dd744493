//! アイキャッチ昇格待ちのアセットを投稿ごとに 1 つだけ記録する
//!
//! 記録は postmeta の 1 キー。上書きは後勝ちで、消費は取り出しと削除を一度に行う。

use crate::domain::{AssetId, PostId};
use crate::ports::outbound::PostMetaStore;
use common::error::Error;
use std::sync::Arc;

pub const PENDING_META_KEY: &str = "_featgen_pending_featured_image";

pub struct PendingFeaturedImage {
    meta: Arc<dyn PostMetaStore>,
}

impl PendingFeaturedImage {
    pub fn new(meta: Arc<dyn PostMetaStore>) -> Self {
        Self { meta }
    }

    /// 昇格待ちとして記録する。直前に記録されていたアセットがあれば返す（孤立したアセット）
    pub fn mark_pending(&self, post: PostId, asset: AssetId) -> Result<Option<AssetId>, Error> {
        let previous = self
            .meta
            .set_meta(post, PENDING_META_KEY, &asset.to_string())?;
        // 上書き前の値が壊れていても記録自体は成功させる
        Ok(previous.and_then(|p| AssetId::parse(&p).ok()))
    }

    /// 記録を取り出して消す。何も無ければ None
    pub fn consume_pending(&self, post: PostId) -> Result<Option<AssetId>, Error> {
        match self.meta.take_meta(post, PENDING_META_KEY)? {
            Some(raw) => AssetId::parse(&raw).map(Some),
            None => Ok(None),
        }
    }

    /// 消費せずに覗く
    pub fn peek_pending(&self, post: PostId) -> Result<Option<AssetId>, Error> {
        match self.meta.get_meta(post, PENDING_META_KEY)? {
            Some(raw) => AssetId::parse(&raw).map(Some),
            None => Ok(None),
        }
    }
}
