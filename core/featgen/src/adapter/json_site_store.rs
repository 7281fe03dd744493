//! サイトディレクトリ上の JSON ファイルでホスト CMS の状態を持つアダプタ
//!
//! posts.json（投稿とアイキャッチ関連）/ media.json（メディアカタログ）/ postmeta.json（投稿ごとのキー・値）。
//! 読み込み→変更→書き戻しはプロセス内の Mutex とサイトディレクトリの `.lock`（排他ファイルロック）で
//! 直列化するので、別プロセスの featgen 同士でも取り出し（take）は 1 回だけ成功する。
//! 書き戻しは一時ファイル + rename で行う。

use crate::domain::{
    AssetId, AttachmentMetadata, MediaAsset, NewMediaAsset, NewPost, Post, PostId, PostUpdate,
};
use crate::ports::outbound::{MediaCatalog, PostMetaStore, PostRepository};
use common::domain::SiteDir;
use common::error::Error;
use common::ports::outbound::{FileLock, FileSystem};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

const POSTS_FILENAME: &str = "posts.json";
const MEDIA_FILENAME: &str = "media.json";
const POSTMETA_FILENAME: &str = "postmeta.json";
const LOCK_FILENAME: &str = ".lock";

#[derive(Debug, Default, Serialize, Deserialize)]
struct PostsFile {
    #[serde(default)]
    last_id: u64,
    #[serde(default)]
    posts: BTreeMap<u64, Post>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct MediaFile {
    #[serde(default)]
    last_id: u64,
    #[serde(default)]
    assets: BTreeMap<u64, MediaAsset>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PostMetaFile {
    #[serde(default)]
    meta: BTreeMap<u64, BTreeMap<String, String>>,
}

/// JSON ファイルで PostRepository / MediaCatalog / PostMetaStore を実装する
pub struct JsonSiteStore {
    fs: Arc<dyn FileSystem>,
    dir: SiteDir,
    lock: Mutex<()>,
}

impl JsonSiteStore {
    pub fn new(fs: Arc<dyn FileSystem>, dir: SiteDir) -> Self {
        Self {
            fs,
            dir,
            lock: Mutex::new(()),
        }
    }

    /// プロセス内とプロセス間の両方の排他を取る
    fn guard(&self) -> Result<SiteGuard<'_>, Error> {
        let local = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.fs.create_dir_all(&self.dir)?;
        let file = self.fs.lock_exclusive(&self.dir.join(LOCK_FILENAME))?;
        Ok(SiteGuard {
            _file: file,
            _local: local,
        })
    }

    /// ファイルが無ければ空（Default）として扱う
    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T, Error> {
        let path = self.dir.join(name);
        if !self.fs.exists(&path) {
            return Ok(T::default());
        }
        let s = self.fs.read_to_string(&path)?;
        serde_json::from_str(&s)
            .map_err(|e| Error::json(format!("Failed to parse '{}': {}", path.display(), e)))
    }

    fn save<T: Serialize>(&self, name: &str, value: &T) -> Result<(), Error> {
        self.fs.create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(value).map_err(|e| Error::json(e.to_string()))?;
        self.fs.write_atomic(&self.dir.join(name), &json)
    }
}

/// ファイルロックを先に解放する（フィールドの宣言順に drop される）
struct SiteGuard<'a> {
    _file: FileLock,
    _local: MutexGuard<'a, ()>,
}

fn next_id(last_id: &mut u64) -> u64 {
    *last_id += 1;
    *last_id
}

impl PostRepository for JsonSiteStore {
    fn find_post(&self, id: PostId) -> Result<Option<Post>, Error> {
        let _g = self.guard()?;
        let file: PostsFile = self.load(POSTS_FILENAME)?;
        Ok(file.posts.get(&id.get()).cloned())
    }

    fn insert_post(&self, post: NewPost) -> Result<Post, Error> {
        let _g = self.guard()?;
        let mut file: PostsFile = self.load(POSTS_FILENAME)?;
        let id = PostId::new(next_id(&mut file.last_id))?;
        let post = Post {
            id,
            post_type: post.post_type,
            title: post.title,
            content: post.content,
            status: post.status,
            featured_image: None,
        };
        file.posts.insert(id.get(), post.clone());
        self.save(POSTS_FILENAME, &file)?;
        Ok(post)
    }

    fn update_post(&self, id: PostId, update: &PostUpdate) -> Result<Post, Error> {
        let _g = self.guard()?;
        let mut file: PostsFile = self.load(POSTS_FILENAME)?;
        let post = file
            .posts
            .get_mut(&id.get())
            .ok_or_else(|| Error::not_found(format!("post {} does not exist", id)))?;
        if let Some(title) = &update.title {
            post.title = title.clone();
        }
        if let Some(content) = &update.content {
            post.content = content.clone();
        }
        let updated = post.clone();
        self.save(POSTS_FILENAME, &file)?;
        Ok(updated)
    }

    fn set_featured_image(&self, post: PostId, asset: AssetId) -> Result<(), Error> {
        let _g = self.guard()?;
        let mut file: PostsFile = self.load(POSTS_FILENAME)?;
        let entry = file
            .posts
            .get_mut(&post.get())
            .ok_or_else(|| Error::not_found(format!("post {} does not exist", post)))?;
        entry.featured_image = Some(asset);
        self.save(POSTS_FILENAME, &file)
    }
}

impl MediaCatalog for JsonSiteStore {
    fn insert_asset(&self, asset: NewMediaAsset) -> Result<MediaAsset, Error> {
        let _g = self.guard()?;
        let mut file: MediaFile = self.load(MEDIA_FILENAME)?;
        let id = AssetId::new(next_id(&mut file.last_id))?;
        let asset = MediaAsset {
            id,
            file_path: asset.file_path,
            mime_type: asset.mime_type,
            parent: asset.parent,
            status: asset.status,
            title: asset.title,
            created_at: asset.created_at,
            metadata: None,
        };
        file.assets.insert(id.get(), asset.clone());
        self.save(MEDIA_FILENAME, &file)?;
        Ok(asset)
    }

    fn find_asset(&self, id: AssetId) -> Result<Option<MediaAsset>, Error> {
        let _g = self.guard()?;
        let file: MediaFile = self.load(MEDIA_FILENAME)?;
        Ok(file.assets.get(&id.get()).cloned())
    }

    fn set_asset_metadata(&self, id: AssetId, metadata: AttachmentMetadata) -> Result<(), Error> {
        let _g = self.guard()?;
        let mut file: MediaFile = self.load(MEDIA_FILENAME)?;
        let asset = file
            .assets
            .get_mut(&id.get())
            .ok_or_else(|| Error::not_found(format!("asset {} does not exist", id)))?;
        asset.metadata = Some(metadata);
        self.save(MEDIA_FILENAME, &file)
    }
}

impl PostMetaStore for JsonSiteStore {
    fn get_meta(&self, post: PostId, key: &str) -> Result<Option<String>, Error> {
        let _g = self.guard()?;
        let file: PostMetaFile = self.load(POSTMETA_FILENAME)?;
        Ok(file
            .meta
            .get(&post.get())
            .and_then(|m| m.get(key))
            .cloned())
    }

    fn set_meta(&self, post: PostId, key: &str, value: &str) -> Result<Option<String>, Error> {
        let _g = self.guard()?;
        let mut file: PostMetaFile = self.load(POSTMETA_FILENAME)?;
        let previous = file
            .meta
            .entry(post.get())
            .or_default()
            .insert(key.to_string(), value.to_string());
        self.save(POSTMETA_FILENAME, &file)?;
        Ok(previous)
    }

    fn take_meta(&self, post: PostId, key: &str) -> Result<Option<String>, Error> {
        let _g = self.guard()?;
        let mut file: PostMetaFile = self.load(POSTMETA_FILENAME)?;
        let taken = match file.meta.get_mut(&post.get()) {
            Some(m) => {
                let v = m.remove(key);
                if m.is_empty() {
                    file.meta.remove(&post.get());
                }
                v
            }
            None => None,
        };
        if taken.is_some() {
            self.save(POSTMETA_FILENAME, &file)?;
        }
        Ok(taken)
    }
}
