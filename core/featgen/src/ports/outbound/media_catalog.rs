//! メディアカタログ Outbound ポート（ホストのメディアライブラリ）

use crate::domain::{AssetId, AttachmentMetadata, MediaAsset, NewMediaAsset};
use common::error::Error;

/// アセットの登録・参照
pub trait MediaCatalog: Send + Sync {
    /// 新しい ID を採番して登録する
    fn insert_asset(&self, asset: NewMediaAsset) -> Result<MediaAsset, Error>;
    fn find_asset(&self, id: AssetId) -> Result<Option<MediaAsset>, Error>;
    /// 派生メタデータを付与する。アセットが無ければ NotFound
    fn set_asset_metadata(&self, id: AssetId, metadata: AttachmentMetadata) -> Result<(), Error>;
}
