//! 生成画像をアップロードディレクトリに書き、メディアカタログに添付として登録する

use crate::domain::media_asset::STATUS_INHERIT;
use crate::domain::{
    AttachmentMetadata, GeneratedImage, ImageKind, MediaAsset, NewMediaAsset, PostId,
};
use crate::ports::outbound::MediaCatalog;
use chrono::{DateTime, Datelike, Utc};
use common::error::Error;
use common::ports::outbound::{Clock, FileSystem, IdGenerator, Log, LogRecord};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 添付の書き込みと登録
pub struct AttachmentWriter {
    fs: Arc<dyn FileSystem>,
    clock: Arc<dyn Clock>,
    id_gen: Arc<dyn IdGenerator>,
    catalog: Arc<dyn MediaCatalog>,
    uploads_dir: PathBuf,
    logger: Arc<dyn Log>,
}

impl AttachmentWriter {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        clock: Arc<dyn Clock>,
        id_gen: Arc<dyn IdGenerator>,
        catalog: Arc<dyn MediaCatalog>,
        uploads_dir: impl Into<PathBuf>,
        logger: Arc<dyn Log>,
    ) -> Self {
        Self {
            fs,
            clock,
            id_gen,
            catalog,
            uploads_dir: uploads_dir.into(),
            logger,
        }
    }

    /// 画像を保存して owner に添付し、新しいアセットを返す
    ///
    /// 拡張子と MIME タイプは実際のエンコード形式から決める。成功時はアップロード先に
    /// 入力と同一内容のファイルがあることを読み戻しで確認済み。
    pub fn store(&self, image: &GeneratedImage, owner: PostId) -> Result<MediaAsset, Error> {
        let kind = image.sniff_kind()?;
        let now = self.now();
        let subdir = format!("{:04}/{:02}", now.year(), now.month());
        let filename = format!("featgen-{}.{}", self.id_gen.next_id(), kind.extension());
        let mime_type = mime_type_for(&filename)?;

        let dir = self.uploads_dir.join(&subdir);
        self.fs
            .create_dir_all(&dir)
            .map_err(|e| Error::write(e.to_string()))?;
        let path = dir.join(&filename);
        self.write_verified(&path, image.bytes())?;

        let relative = format!("{}/{}", subdir, filename);
        let asset = match self.catalog.insert_asset(NewMediaAsset {
            file_path: relative.clone(),
            mime_type: mime_type.to_string(),
            parent: owner,
            status: STATUS_INHERIT.to_string(),
            title: format!("AI image for post {}", owner),
            created_at: now.to_rfc3339(),
        }) {
            Ok(asset) => asset,
            Err(e) => {
                let _ = self.fs.remove_file(&path);
                return Err(e);
            }
        };

        let metadata = self.generate_metadata(image, &path, &relative);
        // 返すメタデータはカタログに保存できたものだけ
        let metadata = match self.catalog.set_asset_metadata(asset.id, metadata.clone()) {
            Ok(()) => Some(metadata),
            Err(e) => {
                let _ = self.logger.log(
                    &LogRecord::warn("attachment metadata not saved")
                        .layer("usecase")
                        .kind("attachment")
                        .field("asset_id", asset.id.get())
                        .field("error", e.to_string()),
                );
                None
            }
        };

        let _ = self.logger.log(
            &LogRecord::info("attachment stored")
                .layer("usecase")
                .kind("attachment")
                .field("asset_id", asset.id.get())
                .field("post_id", owner.get())
                .field("file", relative)
                .field("mime_type", mime_type)
                .field("bytes", image.len()),
        );
        Ok(MediaAsset { metadata, ..asset })
    }

    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.clock.now_ms() as i64).unwrap_or_else(Utc::now)
    }

    /// 新規ファイルとして書き、読み戻して同一内容であることを確かめる。違えばファイルを消して Write
    ///
    /// 同名のファイルが既にあれば上書きせずに Write。
    fn write_verified(&self, path: &Path, bytes: &[u8]) -> Result<(), Error> {
        self.fs
            .write_new(path, bytes)
            .map_err(|e| Error::write(e.to_string()))?;
        let written = self
            .fs
            .read(path)
            .map_err(|e| Error::write(e.to_string()))?;
        if written != bytes {
            let _ = self.fs.remove_file(path);
            return Err(Error::write(format!(
                "'{}' does not match the generated image after writing",
                path.display()
            )));
        }
        Ok(())
    }

    /// 画素寸法とファイルサイズ。寸法が読めなくても失敗にはしない
    fn generate_metadata(
        &self,
        image: &GeneratedImage,
        path: &Path,
        relative: &str,
    ) -> AttachmentMetadata {
        let dimensions = image::ImageReader::new(Cursor::new(image.bytes()))
            .with_guessed_format()
            .map_err(|e| e.to_string())
            .and_then(|r| r.into_dimensions().map_err(|e| e.to_string()));
        let (width, height) = match dimensions {
            Ok((w, h)) => (Some(w), Some(h)),
            Err(e) => {
                let _ = self.logger.log(
                    &LogRecord::warn("image dimensions unavailable")
                        .layer("usecase")
                        .kind("attachment")
                        .field("file", relative)
                        .field("error", e),
                );
                (None, None)
            }
        };
        AttachmentMetadata {
            width,
            height,
            filesize: self
                .fs
                .metadata(path)
                .map(|m| m.len())
                .unwrap_or(image.len() as u64),
            file: relative.to_string(),
        }
    }
}

fn mime_type_for(filename: &str) -> Result<&'static str, Error> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(ImageKind::mime_type_for_extension)
        .ok_or_else(|| {
            Error::invalid_file_type(format!("cannot determine MIME type of '{}'", filename))
        })
}
