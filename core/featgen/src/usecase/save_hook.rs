//! 投稿保存時フック: 昇格待ちのアセットをアイキャッチにする
//!
//! 判定順: 自動保存 → リビジョン → 投稿タイプ → 昇格待ちの有無。

use super::PendingFeaturedImage;
use crate::domain::{AssetId, SaveEvent};
use crate::ports::outbound::{PostRepository, SettingsStore};
use common::error::Error;
use common::ports::outbound::{Log, LogRecord};
use std::sync::Arc;

/// フックが何をしたか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveHookOutcome {
    SkippedAutosave,
    SkippedRevision,
    SkippedPostType,
    NothingPending,
    Assigned(AssetId),
}

impl SaveHookOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SkippedAutosave => "skipped_autosave",
            Self::SkippedRevision => "skipped_revision",
            Self::SkippedPostType => "skipped_post_type",
            Self::NothingPending => "nothing_pending",
            Self::Assigned(_) => "assigned",
        }
    }
}

pub struct SaveHook {
    pending: Arc<PendingFeaturedImage>,
    posts: Arc<dyn PostRepository>,
    settings: Arc<dyn SettingsStore>,
    logger: Arc<dyn Log>,
}

impl SaveHook {
    pub fn new(
        pending: Arc<PendingFeaturedImage>,
        posts: Arc<dyn PostRepository>,
        settings: Arc<dyn SettingsStore>,
        logger: Arc<dyn Log>,
    ) -> Self {
        Self {
            pending,
            posts,
            settings,
            logger,
        }
    }

    pub fn on_save(&self, event: &SaveEvent) -> Result<SaveHookOutcome, Error> {
        if event.is_autosave {
            return Ok(SaveHookOutcome::SkippedAutosave);
        }
        if event.is_revision {
            return Ok(SaveHookOutcome::SkippedRevision);
        }
        let settings = self.settings.load()?;
        if !settings.is_eligible(&event.post.post_type) {
            return Ok(SaveHookOutcome::SkippedPostType);
        }

        let post = event.post.id;
        let asset = match self.pending.consume_pending(post)? {
            Some(asset) => asset,
            None => return Ok(SaveHookOutcome::NothingPending),
        };

        if let Err(e) = self.posts.set_featured_image(post, asset) {
            // 次の保存で再試行できるよう記録を戻す
            if let Err(restore) = self.pending.mark_pending(post, asset) {
                let _ = self.logger.log(
                    &LogRecord::error("pending featured image lost")
                        .layer("usecase")
                        .kind("save_hook")
                        .field("post_id", post.get())
                        .field("asset_id", asset.get())
                        .field("error", restore.to_string()),
                );
            }
            return Err(e);
        }

        let _ = self.logger.log(
            &LogRecord::info("featured image assigned")
                .layer("usecase")
                .kind("save_hook")
                .field("post_id", post.get())
                .field("asset_id", asset.get()),
        );
        Ok(SaveHookOutcome::Assigned(asset))
    }
}
