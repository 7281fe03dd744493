//! nonces.json で偽造防止トークンを発行・検証するアダプタ
//!
//! トークンは操作名に束縛され、発行から NONCE_LIFETIME_MS の間だけ有効。
//! 検証しても消さない（同じ画面から何度でも送れる）。期限切れは発行時に掃除する。

use crate::domain::{Nonce, NonceAction};
use crate::ports::outbound::NonceService;
use common::domain::SiteDir;
use common::error::Error;
use common::ports::outbound::{Clock, FileSystem};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

const NONCES_FILENAME: &str = "nonces.json";
const NONCES_LOCK_FILENAME: &str = ".nonces.lock";
/// 24 時間
pub const NONCE_LIFETIME_MS: u64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IssuedNonce {
    token: String,
    action: String,
    issued_at_ms: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct NoncesFile {
    #[serde(default)]
    nonces: Vec<IssuedNonce>,
}

pub struct FileNonceStore {
    fs: Arc<dyn FileSystem>,
    clock: Arc<dyn Clock>,
    dir: SiteDir,
    lock: Mutex<()>,
}

impl FileNonceStore {
    pub fn new(fs: Arc<dyn FileSystem>, clock: Arc<dyn Clock>, dir: SiteDir) -> Self {
        Self {
            fs,
            clock,
            dir,
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<NoncesFile, Error> {
        let path = self.dir.join(NONCES_FILENAME);
        if !self.fs.exists(&path) {
            return Ok(NoncesFile::default());
        }
        let s = self.fs.read_to_string(&path)?;
        serde_json::from_str(&s)
            .map_err(|e| Error::json(format!("Failed to parse '{}': {}", path.display(), e)))
    }

    fn save(&self, file: &NoncesFile) -> Result<(), Error> {
        self.fs.create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(file).map_err(|e| Error::json(e.to_string()))?;
        self.fs.write_atomic(&self.dir.join(NONCES_FILENAME), &json)
    }

    fn is_live(&self, n: &IssuedNonce, now_ms: u64) -> bool {
        now_ms.saturating_sub(n.issued_at_ms) < NONCE_LIFETIME_MS
    }
}

/// 長さが違えば即 false。同じ長さなら全バイトを比較する
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

impl NonceService for FileNonceStore {
    fn issue(&self, action: NonceAction) -> Result<Nonce, Error> {
        let _g = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        // 別プロセスの issue と同時に書き戻して発行済みの nonce を落とさない
        self.fs.create_dir_all(&self.dir)?;
        let _file_lock = self.fs.lock_exclusive(&self.dir.join(NONCES_LOCK_FILENAME))?;
        let now = self.clock.now_ms();
        let mut file = self.load()?;
        file.nonces.retain(|n| self.is_live(n, now));
        let token = uuid::Uuid::new_v4().simple().to_string();
        file.nonces.push(IssuedNonce {
            token: token.clone(),
            action: action.as_str().to_string(),
            issued_at_ms: now,
        });
        self.save(&file)?;
        Ok(Nonce::new(token))
    }

    fn verify(&self, action: NonceAction, nonce: &Nonce) -> Result<(), Error> {
        let presented = nonce.as_ref().trim();
        if presented.is_empty() {
            return Err(Error::invalid_nonce("security token is missing"));
        }
        let _g = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        let now = self.clock.now_ms();
        let file = self.load()?;
        let matched = file
            .nonces
            .iter()
            .find(|n| constant_time_eq(n.token.as_bytes(), presented.as_bytes()));
        match matched {
            Some(n) if n.action != action.as_str() => Err(Error::invalid_nonce(format!(
                "security token was issued for a different action than '{}'",
                action
            ))),
            Some(n) if !self.is_live(n, now) => {
                Err(Error::invalid_nonce("security token has expired"))
            }
            Some(_) => Ok(()),
            None => Err(Error::invalid_nonce("security token check failed")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::adapter::StdFileSystem;
    use std::sync::atomic::{AtomicU64, Ordering};

    struct MockClock(AtomicU64);
    impl Clock for MockClock {
        fn now_ms(&self) -> u64 {
            self.0.load(Ordering::SeqCst)
        }
    }

    fn setup(tmp: &tempfile::TempDir) -> (FileNonceStore, Arc<MockClock>) {
        let clock = Arc::new(MockClock(AtomicU64::new(1_000)));
        let store = FileNonceStore::new(
            Arc::new(StdFileSystem),
            clock.clone(),
            SiteDir::new(tmp.path().to_path_buf()),
        );
        (store, clock)
    }

    #[test]
    fn test_issue_then_verify() {
        let tmp = tempfile::tempdir().unwrap();
        let (store, _) = setup(&tmp);
        let nonce = store.issue(NonceAction::Generate).unwrap();
        assert!(store.verify(NonceAction::Generate, &nonce).is_ok());
        // 検証しても消えない
        assert!(store.verify(NonceAction::Generate, &nonce).is_ok());
    }

    #[test]
    fn test_verify_rejects_missing_unknown_and_wrong_action() {
        let tmp = tempfile::tempdir().unwrap();
        let (store, _) = setup(&tmp);
        let nonce = store.issue(NonceAction::Assign).unwrap();
        for (action, token) in [
            (NonceAction::Assign, Nonce::new("")),
            (NonceAction::Assign, Nonce::new("deadbeef")),
            (NonceAction::Generate, nonce.clone()),
        ] {
            assert!(matches!(
                store.verify(action, &token),
                Err(Error::InvalidNonce(_))
            ));
        }
    }

    #[test]
    fn test_verify_rejects_expired() {
        let tmp = tempfile::tempdir().unwrap();
        let (store, clock) = setup(&tmp);
        let nonce = store.issue(NonceAction::Generate).unwrap();
        clock.0.store(1_000 + NONCE_LIFETIME_MS, Ordering::SeqCst);
        let err = store.verify(NonceAction::Generate, &nonce).unwrap_err();
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn test_issue_from_separate_stores_keeps_every_nonce() {
        let tmp = tempfile::tempdir().unwrap();
        let nonces: Vec<Nonce> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..6)
                .map(|_| {
                    let tmp = &tmp;
                    scope.spawn(move || {
                        let (store, _) = setup(tmp);
                        (0..5)
                            .map(|_| store.issue(NonceAction::Generate).unwrap())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().unwrap())
                .collect()
        });
        let (store, _) = setup(&tmp);
        assert_eq!(nonces.len(), 30);
        for nonce in &nonces {
            assert!(store.verify(NonceAction::Generate, nonce).is_ok());
        }
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"ab"));
    }
}
