//! 投稿ストア Outbound ポート（ホストの投稿テーブルとアイキャッチ関連）

use crate::domain::{AssetId, NewPost, Post, PostId, PostUpdate};
use common::error::Error;

pub trait PostRepository: Send + Sync {
    fn find_post(&self, id: PostId) -> Result<Option<Post>, Error>;
    fn insert_post(&self, post: NewPost) -> Result<Post, Error>;
    /// 投稿が無ければ NotFound
    fn update_post(&self, id: PostId, update: &PostUpdate) -> Result<Post, Error>;
    /// ホストの「アイキャッチ画像を設定」操作。投稿が無ければ NotFound
    fn set_featured_image(&self, post: PostId, asset: AssetId) -> Result<(), Error>;
}
