//! usecase テスト用のスタブアダプタとフィクスチャ

use crate::adapter::JsonSiteStore;
use crate::domain::{
    AssetId, Credential, GeneratedImage, NewPost, Nonce, NonceAction, Post, PostId, PostUpdate,
    Prompt, Settings,
};
use crate::ports::outbound::{
    ImageGenerator, ImageGeneratorFactory, NonceService, PostRepository, SettingsStore,
};
use crate::usecase::{
    AssignFeaturedImage, AttachmentWriter, GenerateAndStage, PendingFeaturedImage, SaveHook,
};
use common::adapter::{NoopLog, StdClock, StdFileSystem, StdIdGenerator};
use common::domain::SiteDir;
use common::error::Error;
use common::ports::outbound::{Clock, FileSystem, Log};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub fn post_id(id: u64) -> PostId {
    PostId::new(id).unwrap()
}

pub fn asset_id(id: u64) -> AssetId {
    AssetId::new(id).unwrap()
}

pub fn post(id: u64, post_type: &str, title: &str, content: &str) -> Post {
    Post {
        id: post_id(id),
        post_type: post_type.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        status: "draft".to_string(),
        featured_image: None,
    }
}

/// メモリ上の設定
pub struct MemorySettings(Mutex<Settings>);

impl MemorySettings {
    pub fn with_key(key: Option<&str>) -> Self {
        Self(Mutex::new(Settings {
            api_key: key.map(str::to_string),
            ..Settings::default()
        }))
    }
}

impl SettingsStore for MemorySettings {
    fn load(&self) -> Result<Settings, Error> {
        Ok(self.0.lock().unwrap().clone())
    }

    fn save(&self, settings: &Settings) -> Result<(), Error> {
        *self.0.lock().unwrap() = settings.clone();
        Ok(())
    }
}

/// 操作名から決まる固定トークンだけを受け付ける
pub struct FixedNonces;

pub fn valid_nonce(action: NonceAction) -> Nonce {
    Nonce::new(format!("tok-{}", action.as_str()))
}

impl NonceService for FixedNonces {
    fn issue(&self, action: NonceAction) -> Result<Nonce, Error> {
        Ok(valid_nonce(action))
    }

    fn verify(&self, action: NonceAction, nonce: &Nonce) -> Result<(), Error> {
        if *nonce == valid_nonce(action) {
            Ok(())
        } else {
            Err(Error::invalid_nonce(format!(
                "token is not valid for '{}'",
                action
            )))
        }
    }
}

/// set_featured_image の呼び出しを記録する投稿ストア
#[derive(Default)]
pub struct RecordingPosts {
    posts: Mutex<BTreeMap<u64, Post>>,
    assigned: Mutex<Vec<(PostId, AssetId)>>,
    fail_assign: AtomicBool,
}

impl RecordingPosts {
    pub fn with_posts(posts: Vec<Post>) -> Self {
        let store = Self::default();
        {
            let mut map = store.posts.lock().unwrap();
            for p in posts {
                map.insert(p.id.get(), p);
            }
        }
        store
    }

    pub fn get(&self, id: u64) -> Post {
        self.posts.lock().unwrap().get(&id).cloned().unwrap()
    }

    pub fn assigned(&self) -> Vec<(PostId, AssetId)> {
        self.assigned.lock().unwrap().clone()
    }

    pub fn set_fail_assign(&self, fail: bool) {
        self.fail_assign.store(fail, Ordering::SeqCst);
    }
}

impl PostRepository for RecordingPosts {
    fn find_post(&self, id: PostId) -> Result<Option<Post>, Error> {
        Ok(self.posts.lock().unwrap().get(&id.get()).cloned())
    }

    fn insert_post(&self, new: NewPost) -> Result<Post, Error> {
        let mut map = self.posts.lock().unwrap();
        let id = map.keys().next_back().copied().unwrap_or(0) + 1;
        let mut p = post(id, &new.post_type, &new.title, &new.content);
        p.status = new.status;
        map.insert(id, p.clone());
        Ok(p)
    }

    fn update_post(&self, id: PostId, update: &PostUpdate) -> Result<Post, Error> {
        let mut map = self.posts.lock().unwrap();
        let p = map
            .get_mut(&id.get())
            .ok_or_else(|| Error::not_found(format!("post {} does not exist", id)))?;
        if let Some(title) = &update.title {
            p.title = title.clone();
        }
        if let Some(content) = &update.content {
            p.content = content.clone();
        }
        Ok(p.clone())
    }

    fn set_featured_image(&self, post: PostId, asset: AssetId) -> Result<(), Error> {
        if self.fail_assign.load(Ordering::SeqCst) {
            return Err(Error::io_msg("host refused to update the post"));
        }
        let mut map = self.posts.lock().unwrap();
        let p = map
            .get_mut(&post.get())
            .ok_or_else(|| Error::not_found(format!("post {} does not exist", post)))?;
        p.featured_image = Some(asset);
        self.assigned.lock().unwrap().push((post, asset));
        Ok(())
    }
}

/// 固定のバイト列を返す生成器。生成器の組み立て回数とプロンプトを記録する
pub struct StubGeneratorFactory {
    bytes: Vec<u8>,
    created: AtomicUsize,
    prompts: Arc<Mutex<Vec<String>>>,
    bearers: Mutex<Vec<String>>,
}

impl StubGeneratorFactory {
    pub fn new(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
            created: AtomicUsize::new(0),
            prompts: Arc::new(Mutex::new(Vec::new())),
            bearers: Mutex::new(Vec::new()),
        }
    }

    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// create に渡された資格情報（Authorization ヘッダの値）
    pub fn bearers(&self) -> Vec<String> {
        self.bearers.lock().unwrap().clone()
    }
}

impl ImageGeneratorFactory for StubGeneratorFactory {
    fn create(
        &self,
        credential: Credential,
        _settings: &Settings,
    ) -> Result<Box<dyn ImageGenerator>, Error> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.bearers.lock().unwrap().push(credential.bearer());
        Ok(Box::new(StubGenerator {
            bytes: self.bytes.clone(),
            prompts: Arc::clone(&self.prompts),
        }))
    }
}

struct StubGenerator {
    bytes: Vec<u8>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ImageGenerator for StubGenerator {
    fn name(&self) -> &str {
        "stub"
    }

    fn generate(&self, prompt: &Prompt) -> Result<GeneratedImage, Error> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        GeneratedImage::new(self.bytes.clone())
    }
}

/// ハンドラとフックを一式組み立てる。メディアと postmeta は一時ディレクトリの JsonSiteStore
pub struct Fixture {
    pub site: SiteDir,
    pub fs: Arc<dyn FileSystem>,
    pub posts: Arc<RecordingPosts>,
    pub catalog: Arc<JsonSiteStore>,
    pub generators: Arc<StubGeneratorFactory>,
    pub pending: Arc<PendingFeaturedImage>,
    pub generate: GenerateAndStage,
    pub assign: AssignFeaturedImage,
    pub save_hook: SaveHook,
    _dir: TempDir,
}

impl Fixture {
    pub fn new(api_key: Option<&str>, posts: Vec<Post>, image: &[u8]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let site = SiteDir::new(dir.path());
        let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
        let clock: Arc<dyn Clock> = Arc::new(StdClock);
        let logger: Arc<dyn Log> = Arc::new(NoopLog);
        let settings: Arc<dyn SettingsStore> = Arc::new(MemorySettings::with_key(api_key));
        let nonces: Arc<dyn NonceService> = Arc::new(FixedNonces);
        let posts = Arc::new(RecordingPosts::with_posts(posts));
        let catalog = Arc::new(JsonSiteStore::new(Arc::clone(&fs), site.clone()));
        let generators = Arc::new(StubGeneratorFactory::new(image));
        let pending = Arc::new(PendingFeaturedImage::new(catalog.clone()));
        let writer = Arc::new(AttachmentWriter::new(
            Arc::clone(&fs),
            Arc::clone(&clock),
            Arc::new(StdIdGenerator::new(clock)),
            catalog.clone(),
            site.uploads_dir(),
            Arc::clone(&logger),
        ));

        let generate = GenerateAndStage::new(
            Arc::clone(&nonces),
            Arc::clone(&settings),
            posts.clone(),
            generators.clone(),
            writer,
            Arc::clone(&pending),
            Arc::clone(&logger),
        );
        let assign = AssignFeaturedImage::new(
            nonces,
            Arc::clone(&settings),
            posts.clone(),
            catalog.clone(),
            Arc::clone(&logger),
        );
        let save_hook = SaveHook::new(Arc::clone(&pending), posts.clone(), settings, logger);

        Self {
            site,
            fs,
            posts,
            catalog,
            generators,
            pending,
            generate,
            assign,
            save_hook,
            _dir: dir,
        }
    }
}
