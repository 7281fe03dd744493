//! 偽造防止トークン Outbound ポート（ホストのセッション機構）

use crate::domain::{Nonce, NonceAction};
use common::error::Error;

pub trait NonceService: Send + Sync {
    /// 操作に束縛したトークンを発行する
    fn issue(&self, action: NonceAction) -> Result<Nonce, Error>;
    /// 無い・一致しない・期限切れは InvalidNonce
    fn verify(&self, action: NonceAction, nonce: &Nonce) -> Result<(), Error>;
}
