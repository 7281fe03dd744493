//! 配線: 標準アダプタで UseCase を組み立てる

use std::sync::Arc;

use common::adapter::{
    FileJsonLog, StdClock, StdEnvResolver, StdFileSystem, StdIdGenerator, TeeStderrLog,
};
use common::domain::Dirs;
use common::error::Error;
use common::ports::outbound::{Clock, EnvResolver, FileSystem, IdGenerator, Log};

use crate::adapter::{FileNonceStore, FileSettingsStore, JsonSiteStore, TogetherImageGeneratorFactory};
use crate::ports::outbound::{ImageGeneratorFactory, NonceService, SettingsStore};
use crate::usecase::{
    AssignFeaturedImage, AttachmentWriter, GenerateAndStage, PendingFeaturedImage, PostUseCase,
    SaveHook, SettingsUseCase,
};

/// 組み立て済みのアプリケーション（Runner が保持する）
pub struct App {
    pub fs: Arc<dyn FileSystem>,
    pub logger: Arc<dyn Log>,
    pub nonces: Arc<dyn NonceService>,
    pub pending: Arc<PendingFeaturedImage>,
    pub generate: GenerateAndStage,
    pub assign: AssignFeaturedImage,
    pub posts: PostUseCase,
    pub settings: SettingsUseCase,
}

/// 差し替え可能な外界の依存（テストではスタブの画像生成器や一時ディレクトリを渡す）
pub struct Deps {
    pub fs: Arc<dyn FileSystem>,
    pub clock: Arc<dyn Clock>,
    pub id_gen: Arc<dyn IdGenerator>,
    pub logger: Arc<dyn Log>,
    pub generators: Arc<dyn ImageGeneratorFactory>,
    pub dirs: Dirs,
    pub api_key_override: Option<String>,
}

/// 配線: 標準アダプタで App を組み立てる
///
/// verbose のときはログレコードを stderr にも出す。
pub fn wire_featgen(verbose: bool) -> Result<App, Error> {
    let env_resolver = StdEnvResolver;
    let dirs = env_resolver.resolve_dirs()?;
    let fs: Arc<dyn FileSystem> = Arc::new(StdFileSystem);
    let clock: Arc<dyn Clock> = Arc::new(StdClock);
    let id_gen: Arc<dyn IdGenerator> = Arc::new(StdIdGenerator::new(Arc::clone(&clock)));
    let file_log: Arc<dyn Log> = Arc::new(FileJsonLog::new(Arc::clone(&fs), dirs.log_path()));
    let logger: Arc<dyn Log> = if verbose {
        Arc::new(TeeStderrLog::new(file_log))
    } else {
        file_log
    };
    Ok(wire_with(Deps {
        fs,
        clock,
        id_gen,
        logger,
        generators: Arc::new(TogetherImageGeneratorFactory),
        dirs,
        api_key_override: env_resolver.api_key_override(),
    }))
}

/// 依存を受け取り App を組み立てる
pub fn wire_with(deps: Deps) -> App {
    let Deps {
        fs,
        clock,
        id_gen,
        logger,
        generators,
        dirs,
        api_key_override,
    } = deps;

    let site = Arc::new(JsonSiteStore::new(Arc::clone(&fs), dirs.site.clone()));
    let settings: Arc<dyn SettingsStore> = Arc::new(
        FileSettingsStore::new(Arc::clone(&fs), dirs.settings_path())
            .with_api_key_override(api_key_override),
    );
    let nonces: Arc<dyn NonceService> = Arc::new(FileNonceStore::new(
        Arc::clone(&fs),
        Arc::clone(&clock),
        dirs.site.clone(),
    ));
    let pending = Arc::new(PendingFeaturedImage::new(site.clone()));
    let writer = Arc::new(AttachmentWriter::new(
        Arc::clone(&fs),
        clock,
        id_gen,
        site.clone(),
        dirs.site.uploads_dir(),
        Arc::clone(&logger),
    ));
    let save_hook = Arc::new(SaveHook::new(
        Arc::clone(&pending),
        site.clone(),
        Arc::clone(&settings),
        Arc::clone(&logger),
    ));

    App {
        generate: GenerateAndStage::new(
            Arc::clone(&nonces),
            Arc::clone(&settings),
            site.clone(),
            generators,
            writer,
            Arc::clone(&pending),
            Arc::clone(&logger),
        ),
        assign: AssignFeaturedImage::new(
            Arc::clone(&nonces),
            Arc::clone(&settings),
            site.clone(),
            site.clone(),
            Arc::clone(&logger),
        ),
        posts: PostUseCase::new(site, save_hook),
        settings: SettingsUseCase::new(settings),
        fs,
        logger,
        nonces,
        pending,
    }
}
