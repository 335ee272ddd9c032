//! File-backed key/value store with one advisory lock per key
//!
//! Every key owns two files in the state directory: `<key>` holds the
//! decimal value and `<key>.lock` carries the exclusive `flock`. Values are
//! replaced by writing `.<key>.tmp` and renaming it over `<key>`, so readers
//! that skip the lock never observe a half-written value.

use crate::error::{DdcVolumeError, DdcVolumeResult};
use fs2::FileExt;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs;
use tracing::debug;

/// Delay between attempts while another process holds a lock
const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Named entries kept in the state directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    /// Last known monitor volume
    Volume,
    /// Volume last confirmed written to the monitor
    Commit,
    /// Handle of the notification to replace
    NotificationId,
}

impl StateKey {
    /// File name of the entry inside the state directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Volume => "volume",
            Self::Commit => "commit",
            Self::NotificationId => "notification_id",
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

/// Shared on-disk state
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
    lock_timeout: Duration,
    commit_lock_timeout: Duration,
}

impl StateStore {
    /// Open the store, creating the state directory if needed
    pub async fn open(dir: impl Into<PathBuf>, lock_timeout: Duration) -> DdcVolumeResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await.map_err(|e| {
            DdcVolumeError::io(format!("creating state directory {}", dir.display()), e)
        })?;

        Ok(Self {
            dir,
            lock_timeout,
            commit_lock_timeout: lock_timeout,
        })
    }

    /// Use a separate wait limit for the commit lock
    ///
    /// The commit lock is held across the hardware write, which can take far
    /// longer than the short read-modify-write sections on the other keys.
    pub fn with_commit_lock_timeout(mut self, timeout: Duration) -> Self {
        self.commit_lock_timeout = timeout;
        self
    }

    /// Wait limit for `key`
    pub fn lock_timeout(&self, key: StateKey) -> Duration {
        match key {
            StateKey::Commit => self.commit_lock_timeout,
            StateKey::Volume | StateKey::NotificationId => self.lock_timeout,
        }
    }

    /// State directory path
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read the raw content of an entry without taking its lock
    pub async fn read(&self, key: StateKey) -> DdcVolumeResult<Option<String>> {
        read_entry(&self.dir.join(key.file_name())).await
    }

    /// Acquire the exclusive lock for `key`
    ///
    /// Waits at most the configured lock timeout, then fails with
    /// [`DdcVolumeError::LockTimeout`]. The lock is released when the guard
    /// is dropped.
    pub async fn lock(&self, key: StateKey) -> DdcVolumeResult<StateGuard> {
        let lock_path = self.dir.join(format!("{}.lock", key.file_name()));
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)
            .map_err(|e| {
                DdcVolumeError::io(format!("opening lock file {}", lock_path.display()), e)
            })?;

        let timeout = self.lock_timeout(key);
        let started = Instant::now();
        loop {
            match FileExt::try_lock_exclusive(&file) {
                Ok(()) => break,
                Err(e) if is_contended(&e) => {
                    let waited = started.elapsed();
                    if waited >= timeout {
                        return Err(DdcVolumeError::LockTimeout {
                            key: key.to_string(),
                            waited_ms: waited.as_millis() as u64,
                        });
                    }
                    tokio::time::sleep(LOCK_POLL_INTERVAL).await;
                }
                Err(e) => {
                    return Err(DdcVolumeError::io(
                        format!("locking {}", lock_path.display()),
                        e,
                    ))
                }
            }
        }

        debug!("Acquired {} lock after {:?}", key, started.elapsed());
        Ok(StateGuard {
            key,
            path: self.dir.join(key.file_name()),
            tmp_path: self.dir.join(format!(".{}.tmp", key.file_name())),
            lock_file: file,
        })
    }

    /// Read-modify-write an entry under its lock
    ///
    /// `update` receives the current content (empty if the entry was never
    /// written) and returns the replacement. If `update` fails, the entry is
    /// left untouched. Returns the written content.
    pub async fn scoped_update<F, Fut>(&self, key: StateKey, update: F) -> DdcVolumeResult<String>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = DdcVolumeResult<String>>,
    {
        let guard = self.lock(key).await?;
        let current = guard.read().await?.unwrap_or_default();
        let updated = update(current).await?;
        guard.write(&updated).await?;
        Ok(updated)
    }
}

/// Exclusive access to one state entry
///
/// Holding a guard is the only way to write an entry.
#[derive(Debug)]
pub struct StateGuard {
    key: StateKey,
    path: PathBuf,
    tmp_path: PathBuf,
    lock_file: File,
}

impl StateGuard {
    /// Key this guard protects
    pub fn key(&self) -> StateKey {
        self.key
    }

    /// Read the current content, `None` if never written
    pub async fn read(&self) -> DdcVolumeResult<Option<String>> {
        read_entry(&self.path).await
    }

    /// Replace the content
    pub async fn write(&self, content: &str) -> DdcVolumeResult<()> {
        fs::write(&self.tmp_path, content).await.map_err(|e| {
            DdcVolumeError::io(format!("writing {}", self.tmp_path.display()), e)
        })?;
        fs::rename(&self.tmp_path, &self.path)
            .await
            .map_err(|e| DdcVolumeError::io(format!("replacing {}", self.path.display()), e))?;

        debug!("Stored {} = {}", self.key, content);
        Ok(())
    }
}

impl Drop for StateGuard {
    fn drop(&mut self) {
        // Closing the descriptor releases the flock as well
        let _ = FileExt::unlock(&self.lock_file);
        debug!("Released {} lock", self.key);
    }
}

async fn read_entry(path: &Path) -> DdcVolumeResult<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(DdcVolumeError::io(format!("reading {}", path.display()), e)),
    }
}

fn is_contended(err: &std::io::Error) -> bool {
    err.kind() == ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
