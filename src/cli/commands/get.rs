//! Get command - print the cached volume

use crate::cli::commands::{connect_monitor, open_store};
use crate::config::Config;
use crate::error::DdcVolumeResult;
use crate::state::VolumeController;

/// Execute the get command
pub async fn execute(config: &Config) -> DdcVolumeResult<()> {
    let store = open_store(config).await?;
    let monitor = connect_monitor(config).await?;

    let volume = VolumeController::new(store, monitor).get().await?;
    println!("{}", volume);

    Ok(())
}
