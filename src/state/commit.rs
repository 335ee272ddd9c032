//! Pushing the cached volume to the monitor
//!
//! Volume updates only touch the cache. `commit` compares the cached value
//! with the last value written to the monitor and issues a write only when
//! they differ, so a burst of key presses collapses into a single slow DDC
//! transaction carrying the latest value.

use crate::device::HardwareBackend;
use crate::error::DdcVolumeResult;
use crate::state::store::{StateKey, StateStore};
use crate::state::volume::{parse_stored_volume, VolumeController};
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The monitor already had this volume
    Unchanged(u8),
    /// The volume was written to the monitor
    Written(u8),
}

/// Writes the cached volume to hardware when it changed
pub struct HardwareCommitter {
    store: StateStore,
    volume: VolumeController,
    hardware: Arc<dyn HardwareBackend>,
}

impl HardwareCommitter {
    /// Create a committer
    pub fn new(
        store: StateStore,
        volume: VolumeController,
        hardware: Arc<dyn HardwareBackend>,
    ) -> Self {
        Self {
            store,
            volume,
            hardware,
        }
    }

    /// Write the cached volume to the monitor if it differs from the last write
    ///
    /// The commit lock stays held across the hardware write so concurrent
    /// commits queue up behind it and then find nothing left to do. A failed
    /// write leaves the commit record untouched and is retried next time.
    ///
    /// A waiter that gives up with `LockTimeout` has already updated the
    /// cached volume; that value reaches the monitor on the next commit. The
    /// commit key therefore gets its own, longer wait limit
    /// (`state.commit_lock_timeout_ms`).
    pub async fn commit(&self) -> DdcVolumeResult<CommitOutcome> {
        let guard = self.store.lock(StateKey::Commit).await?;

        let committed = guard
            .read()
            .await?
            .as_deref()
            .and_then(parse_stored_volume);
        let volume = self.volume.get().await?;

        if committed == Some(volume) {
            debug!("Monitor already at volume {}, skipping write", volume);
            return Ok(CommitOutcome::Unchanged(volume));
        }

        self.hardware.write_volume(volume).await?;
        guard.write(&volume.to_string()).await?;

        info!("Committed volume {} to {}", volume, self.hardware.describe());
        Ok(CommitOutcome::Written(volume))
    }
}
