//! 投稿の作成・表示・保存（ホスト側の最小限の操作）。保存のたびに Save Hook を走らせる

use super::{SaveHook, SaveHookOutcome};
use crate::domain::{NewPost, Post, PostId, PostUpdate, SaveEvent};
use crate::ports::outbound::PostRepository;
use common::error::Error;
use std::sync::Arc;

pub struct PostUseCase {
    posts: Arc<dyn PostRepository>,
    save_hook: Arc<SaveHook>,
}

impl PostUseCase {
    pub fn new(posts: Arc<dyn PostRepository>, save_hook: Arc<SaveHook>) -> Self {
        Self { posts, save_hook }
    }

    pub fn create(&self, post: NewPost) -> Result<Post, Error> {
        if post.post_type.trim().is_empty() {
            return Err(Error::invalid_argument("post type must not be empty"));
        }
        self.posts.insert_post(post)
    }

    pub fn show(&self, post_id: &str) -> Result<Post, Error> {
        let id = PostId::parse(post_id)?;
        self.find(id)
    }

    /// 変更を書き込み、そのあと Save Hook を呼ぶ（ホストの保存処理と同じ順序）
    pub fn save(
        &self,
        post_id: &str,
        update: &PostUpdate,
        is_autosave: bool,
        is_revision: bool,
    ) -> Result<(Post, SaveHookOutcome), Error> {
        let id = PostId::parse(post_id)?;
        let post = if update.is_empty() {
            self.find(id)?
        } else {
            self.posts.update_post(id, update)?
        };
        let event = SaveEvent {
            post,
            is_autosave,
            is_revision,
        };
        let outcome = self.save_hook.on_save(&event)?;
        // フックがアイキャッチを書き換えた場合に備えて読み直す
        let saved = self.find(id)?;
        Ok((saved, outcome))
    }

    fn find(&self, id: PostId) -> Result<Post, Error> {
        self.posts
            .find_post(id)?
            .ok_or_else(|| Error::not_found(format!("post {} does not exist", id)))
    }
}
