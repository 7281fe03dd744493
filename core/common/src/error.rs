//! エラーハンドリング
//!
//! 1 リクエストの中で起きた失敗はすべてこの型で呼び出し元へ返す。リトライはしない。
//! 各バリアントは終了コード（sysexits 準拠）を持ち、CLI はそのまま終了コードに使う。

use thiserror::Error as ThisError;

pub const EXIT_USAGE: i32 = 64;
pub const EXIT_DATAERR: i32 = 65;
pub const EXIT_NOINPUT: i32 = 66;
pub const EXIT_UNAVAILABLE: i32 = 69;
pub const EXIT_CANTCREAT: i32 = 73;
pub const EXIT_IOERR: i32 = 74;
pub const EXIT_PROTOCOL: i32 = 76;
pub const EXIT_NOPERM: i32 = 77;
pub const EXIT_CONFIG: i32 = 78;

/// エラー型
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    /// コマンドライン引数の誤り（usage を表示する）
    #[error("{0}")]
    InvalidArgument(String),
    /// 投稿 ID / アセット ID が無い・0・数値でない
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
    #[error("missing credential: {0}")]
    MissingCredential(String),
    /// 偽造防止トークンが無い・一致しない・期限切れ
    #[error("invalid nonce: {0}")]
    InvalidNonce(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// 対象外の投稿タイプに対する操作
    #[error("wrong content type: {0}")]
    WrongContentType(String),
    /// リモート呼び出しの失敗（ネットワーク・非 2xx）
    #[error("transport error: {0}")]
    Transport(String),
    /// レスポンスに画像ペイロードが無い
    #[error("missing image data: {0}")]
    MissingImageData(String),
    /// base64 ペイロードが不正
    #[error("decode error: {0}")]
    Decode(String),
    /// アップロード先への書き込み失敗
    #[error("write error: {0}")]
    Write(String),
    /// 画像形式（拡張子・MIME）が判定できない
    #[error("invalid file type: {0}")]
    InvalidFileType(String),
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Json(String),
    /// 環境変数・設定ディレクトリの解決失敗
    #[error("{0}")]
    Env(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invalid_identifier(msg: impl Into<String>) -> Self {
        Self::InvalidIdentifier(msg.into())
    }

    pub fn missing_credential(msg: impl Into<String>) -> Self {
        Self::MissingCredential(msg.into())
    }

    pub fn invalid_nonce(msg: impl Into<String>) -> Self {
        Self::InvalidNonce(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn wrong_content_type(msg: impl Into<String>) -> Self {
        Self::WrongContentType(msg.into())
    }

    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn missing_image_data(msg: impl Into<String>) -> Self {
        Self::MissingImageData(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub fn write(msg: impl Into<String>) -> Self {
        Self::Write(msg.into())
    }

    pub fn invalid_file_type(msg: impl Into<String>) -> Self {
        Self::InvalidFileType(msg.into())
    }

    pub fn io_msg(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn json(msg: impl Into<String>) -> Self {
        Self::Json(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Self::Env(msg.into())
    }

    /// usage を表示すべきエラーか
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// CLI の終了コード
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) | Self::InvalidIdentifier(_) => EXIT_USAGE,
            Self::WrongContentType(_)
            | Self::Decode(_)
            | Self::InvalidFileType(_)
            | Self::Json(_) => EXIT_DATAERR,
            Self::NotFound(_) => EXIT_NOINPUT,
            Self::Transport(_) => EXIT_UNAVAILABLE,
            Self::Write(_) => EXIT_CANTCREAT,
            Self::Io(_) => EXIT_IOERR,
            Self::MissingImageData(_) => EXIT_PROTOCOL,
            Self::InvalidNonce(_) => EXIT_NOPERM,
            Self::MissingCredential(_) | Self::Env(_) => EXIT_CONFIG,
        }
    }
}
