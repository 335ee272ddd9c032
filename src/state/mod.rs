//! Cached, lock-protected volume state
//!
//! Concurrent invocations (key repeat on a volume key spawns one process
//! per press) share three small files in the runtime directory:
//!
//! | Key | Written by | Meaning |
//! |-----|------------|---------|
//! | `volume` | `VolumeController` | last known volume |
//! | `commit` | `HardwareCommitter` | last volume written to the monitor |
//! | `notification_id` | `NotificationPublisher` | notification to replace |

pub mod commit;
pub mod store;
pub mod volume;

pub use commit::{CommitOutcome, HardwareCommitter};
pub use store::{StateGuard, StateKey, StateStore};
pub use volume::{VolumeController, VolumeUpdate, MAX_VOLUME, MIN_VOLUME};
