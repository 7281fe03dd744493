//! 画像生成 Outbound ポート
//!
//! 資格情報と生成オプションは構築時に渡す（グローバルな設定は読まない）。

use crate::domain::{Credential, GeneratedImage, Prompt, Settings};
use common::error::Error;

/// プロンプトから画像を 1 枚生成する能力
pub trait ImageGenerator: Send + Sync {
    /// プロバイダ名（ログ用）
    fn name(&self) -> &str;

    /// 同期的に 1 回だけ呼び出す。リトライ・キャッシュはしない
    ///
    /// # Returns
    /// * `Ok(GeneratedImage)` - 復元済みの画像バイト列
    /// * `Err(Error::Transport)` - ネットワークエラー・非 2xx
    /// * `Err(Error::MissingImageData)` - レスポンスに画像が無い
    /// * `Err(Error::Decode)` - base64 が不正
    fn generate(&self, prompt: &Prompt) -> Result<GeneratedImage, Error>;
}

/// 資格情報と設定から ImageGenerator を組み立てる
pub trait ImageGeneratorFactory: Send + Sync {
    fn create(
        &self,
        credential: Credential,
        settings: &Settings,
    ) -> Result<Box<dyn ImageGenerator>, Error>;
}
