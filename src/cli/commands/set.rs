//! Set command - update the cached volume, notify, and commit to the monitor

use crate::cli::commands::{connect_monitor, open_store};
use crate::config::Config;
use crate::error::DdcVolumeResult;
use crate::notify::{DbusNotifier, NotificationPublisher};
use crate::state::{CommitOutcome, HardwareCommitter, VolumeController, VolumeUpdate};
use std::sync::Arc;
use tracing::{debug, warn};

/// Execute the set command
pub async fn execute(expr: &str, config: &Config) -> DdcVolumeResult<()> {
    // Reject bad input before touching the device or the cache
    let update: VolumeUpdate = expr.parse()?;

    let store = open_store(config).await?;
    let monitor = connect_monitor(config).await?;

    let controller = VolumeController::new(store.clone(), monitor.clone());
    let volume = controller.apply(update).await?;

    if config.notification.enabled {
        let notifier = Arc::new(DbusNotifier::new(config.notification.app_name.clone()));
        let publisher =
            NotificationPublisher::new(store.clone(), notifier, config.notification.timeout_ms);
        if let Err(e) = publisher.publish(volume).await {
            warn!("{}", e);
        }
    }

    // Commit re-reads the cache, which may already hold a newer value
    match HardwareCommitter::new(store, controller, monitor).commit().await? {
        CommitOutcome::Written(v) => debug!("Monitor volume now {}", v),
        CommitOutcome::Unchanged(v) => debug!("Monitor volume unchanged at {}", v),
    }

    Ok(())
}
