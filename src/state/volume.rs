//! Cached volume updates

use crate::device::HardwareBackend;
use crate::error::{DdcVolumeError, DdcVolumeResult};
use crate::state::store::{StateGuard, StateKey, StateStore};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Lowest valid volume
pub const MIN_VOLUME: u8 = 0;

/// Highest valid volume
pub const MAX_VOLUME: u8 = 100;

/// Clamp an arbitrary integer into the valid volume range
pub fn clamp_volume(value: i64) -> u8 {
    value.clamp(i64::from(MIN_VOLUME), i64::from(MAX_VOLUME)) as u8
}

/// Parse stored volume content, `None` if empty or garbage
pub fn parse_stored_volume(raw: &str) -> Option<u8> {
    raw.trim().parse::<i64>().ok().map(clamp_volume)
}

/// A requested volume change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeUpdate {
    /// Set the volume to this value
    Absolute(i64),
    /// Change the volume by this amount
    Relative(i64),
}

impl VolumeUpdate {
    /// Compute the new volume from the current one
    pub fn apply(self, current: u8) -> u8 {
        match self {
            Self::Absolute(value) => clamp_volume(value),
            Self::Relative(delta) => clamp_volume(i64::from(current).saturating_add(delta)),
        }
    }
}

impl FromStr for VolumeUpdate {
    type Err = DdcVolumeError;

    /// `+N` and `-N` are relative, anything else must be an absolute value
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let expr = s.trim();
        let invalid = || DdcVolumeError::InvalidInput(format!("'{}'", s));

        let (sign, digits) = match expr.as_bytes().first() {
            Some(b'+') => (Some(1), &expr[1..]),
            Some(b'-') => (Some(-1), &expr[1..]),
            _ => (None, expr),
        };

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let magnitude: i64 = digits.parse().map_err(|_| invalid())?;

        Ok(match sign {
            Some(sign) => Self::Relative(sign * magnitude),
            None => Self::Absolute(magnitude),
        })
    }
}

/// Reads and updates the cached volume
///
/// The monitor is only queried when nothing is cached yet.
#[derive(Clone)]
pub struct VolumeController {
    store: StateStore,
    hardware: Arc<dyn HardwareBackend>,
}

impl VolumeController {
    /// Create a controller over `store`, seeding from `hardware` when needed
    pub fn new(store: StateStore, hardware: Arc<dyn HardwareBackend>) -> Self {
        Self { store, hardware }
    }

    /// Parse `expr` and apply it to the cached volume
    ///
    /// An unparsable expression fails before the cache is touched.
    pub async fn update(&self, expr: &str) -> DdcVolumeResult<u8> {
        let update: VolumeUpdate = expr.parse()?;
        self.apply(update).await
    }

    /// Apply an already parsed update to the cached volume
    pub async fn apply(&self, update: VolumeUpdate) -> DdcVolumeResult<u8> {
        let guard = self.store.lock(StateKey::Volume).await?;
        let current = self.current(&guard).await?;
        let volume = update.apply(current);

        guard.write(&volume.to_string()).await?;
        debug!("Volume {} -> {} ({:?})", current, volume, update);
        Ok(volume)
    }

    /// Cached volume, read from the monitor if nothing is cached
    pub async fn get(&self) -> DdcVolumeResult<u8> {
        let guard = self.store.lock(StateKey::Volume).await?;
        self.current(&guard).await
    }

    /// Drop the cached value and re-read it from the monitor
    pub async fn refresh(&self) -> DdcVolumeResult<u8> {
        let guard = self.store.lock(StateKey::Volume).await?;
        self.seed(&guard).await
    }

    async fn current(&self, guard: &StateGuard) -> DdcVolumeResult<u8> {
        match guard.read().await? {
            Some(raw) => match parse_stored_volume(&raw) {
                Some(volume) => Ok(volume),
                None => {
                    if !raw.trim().is_empty() {
                        warn!("Ignoring unreadable cached volume '{}'", raw.trim());
                    }
                    self.seed(guard).await
                }
            },
            None => self.seed(guard).await,
        }
    }

    async fn seed(&self, guard: &StateGuard) -> DdcVolumeResult<u8> {
        debug!("Reading volume from {}", self.hardware.describe());
        let volume = self.hardware.read_volume().await?;
        guard.write(&volume.to_string()).await?;
        Ok(volume)
    }
}
