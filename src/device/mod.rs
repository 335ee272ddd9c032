//! Monitor hardware access
//!
//! Volume reads and writes go through [`HardwareBackend`] so the
//! subprocess-based implementation can be swapped out in tests.

pub mod bus;
pub mod ddcutil;

pub use bus::find_i2c_bus;
pub use ddcutil::DdcutilBackend;

use crate::error::DdcVolumeResult;
use async_trait::async_trait;

/// Abstract monitor volume control
#[async_trait]
pub trait HardwareBackend: Send + Sync {
    /// Read the current volume from the monitor
    async fn read_volume(&self) -> DdcVolumeResult<u8>;

    /// Write a volume to the monitor
    async fn write_volume(&self, volume: u8) -> DdcVolumeResult<()>;

    /// Human-readable backend description for logs
    fn describe(&self) -> String;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::error::DdcVolumeError;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory monitor that records every write
    #[derive(Default)]
    pub struct FakeMonitor {
        pub volume: Mutex<Option<u8>>,
        pub reads: AtomicUsize,
        pub writes: Mutex<Vec<u8>>,
        pub fail_reads: AtomicBool,
        pub fail_writes: AtomicBool,
    }

    impl FakeMonitor {
        pub fn with_volume(volume: u8) -> Self {
            Self {
                volume: Mutex::new(Some(volume)),
                ..Self::default()
            }
        }

        pub fn writes(&self) -> Vec<u8> {
            self.writes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HardwareBackend for FakeMonitor {
        async fn read_volume(&self) -> DdcVolumeResult<u8> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(DdcVolumeError::HardwareRead("monitor unplugged".to_string()));
            }
            self.volume
                .lock()
                .unwrap()
                .ok_or_else(|| DdcVolumeError::HardwareRead("no value".to_string()))
        }

        async fn write_volume(&self, volume: u8) -> DdcVolumeResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(DdcVolumeError::HardwareWrite("exit status: 1".to_string()));
            }
            *self.volume.lock().unwrap() = Some(volume);
            self.writes.lock().unwrap().push(volume);
            Ok(())
        }

        fn describe(&self) -> String {
            "fake monitor".to_string()
        }
    }
}
