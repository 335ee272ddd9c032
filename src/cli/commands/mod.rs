//! CLI command implementations

pub mod get;
pub mod refresh;
pub mod set;

pub use get::execute as get;
pub use refresh::execute as refresh;
pub use set::execute as set;

use crate::config::{Config, ConfigManager};
use crate::device::{find_i2c_bus, DdcutilBackend, HardwareBackend};
use crate::error::DdcVolumeResult;
use crate::state::StateStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Open the state store described by the config
pub(crate) async fn open_store(config: &Config) -> DdcVolumeResult<StateStore> {
    let dir = ConfigManager::state_dir(config);
    debug!("Using state directory {}", dir.display());
    let store = StateStore::open(dir, Duration::from_millis(config.state.lock_timeout_ms)).await?;
    Ok(store.with_commit_lock_timeout(Duration::from_millis(
        config.state.commit_lock_timeout_ms,
    )))
}

/// Build the hardware backend, discovering the bus unless configured
pub(crate) async fn connect_monitor(config: &Config) -> DdcVolumeResult<Arc<dyn HardwareBackend>> {
    let bus = match config.device.bus {
        Some(bus) => bus,
        None => find_i2c_bus(&config.device.sysfs_dir, &config.device.name).await?,
    };

    Ok(Arc::new(DdcutilBackend::new(&config.ddcutil, bus)))
}
