//! 生成画像（base64 から復元した生バイト列）と、その形式判定

use common::error::Error;
use image::ImageFormat;

/// 生成された画像のバイト列。書き込むまでは永続化されない
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage(Vec<u8>);

impl GeneratedImage {
    /// 空のペイロードは MissingImageData
    pub fn new(bytes: Vec<u8>) -> Result<Self, Error> {
        if bytes.is_empty() {
            return Err(Error::missing_image_data("image payload is empty"));
        }
        Ok(Self(bytes))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// 先頭のマジックバイトから実際のエンコード形式を判定する
    pub fn sniff_kind(&self) -> Result<ImageKind, Error> {
        let format = image::guess_format(&self.0)
            .map_err(|e| Error::invalid_file_type(format!("unrecognised image data: {}", e)))?;
        ImageKind::from_format(format).ok_or_else(|| {
            Error::invalid_file_type(format!("unsupported image format: {:?}", format))
        })
    }
}

/// アップロードを受け付ける画像形式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
    Gif,
}

impl ImageKind {
    fn from_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::WebP => Some(Self::Webp),
            ImageFormat::Gif => Some(Self::Gif),
            _ => None,
        }
    }

    /// ファイル名に付ける拡張子
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Webp => "webp",
            Self::Gif => "gif",
        }
    }

    /// 拡張子から MIME タイプを決める。判定できなければ None
    pub fn mime_type_for_extension(ext: &str) -> Option<&'static str> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "jpe" => Some("image/jpeg"),
            "png" => Some("image/png"),
            "webp" => Some("image/webp"),
            "gif" => Some("image/gif"),
            _ => None,
        }
    }
}
