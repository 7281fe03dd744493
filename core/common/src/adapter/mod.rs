//! アダプター（外界の I/O を Outbound ポートの実装として提供）
//!
//! usecase はポートの trait 経由でのみファイル・時刻・環境変数・ログに触れる。
//! 実装は標準実装（Std*）やテスト用のモックを注入する。

pub mod file_json_log;
pub mod std_clock;
pub mod std_env_resolver;
pub mod std_fs;
pub mod std_id_generator;

pub use crate::ports::outbound::{
    Clock, EnvResolver, FileLock, FileMetadata, FileSystem, IdGenerator, Log,
};
pub use file_json_log::{FileJsonLog, NoopLog, TeeStderrLog};
pub use std_clock::StdClock;
pub use std_env_resolver::StdEnvResolver;
pub use std_fs::StdFileSystem;
pub use std_id_generator::StdIdGenerator;
