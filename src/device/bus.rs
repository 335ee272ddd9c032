//! i2c bus discovery
//!
//! Finds the bus number of the adapter the monitor hangs off by matching
//! the adapter's advertised name under `/sys/bus/i2c/devices`.

use crate::error::{DdcVolumeError, DdcVolumeResult};
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Parse the bus number out of an `i2c-<N>` entry name
fn bus_number(entry_name: &str) -> Option<u32> {
    let digits = entry_name.strip_prefix("i2c-")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Find the lowest bus number whose adapter advertises `name`
pub async fn find_i2c_bus(devices_dir: &Path, name: &str) -> DdcVolumeResult<u32> {
    let mut entries = fs::read_dir(devices_dir).await.map_err(|e| {
        DdcVolumeError::io(format!("reading {}", devices_dir.display()), e)
    })?;

    let mut found: Option<u32> = None;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| DdcVolumeError::io("reading i2c device entry", e))?
    {
        let file_name = entry.file_name();
        let Some(bus) = file_name.to_str().and_then(bus_number) else {
            continue;
        };

        let name_path = entry.path().join("name");
        let adapter = match fs::read_to_string(&name_path).await {
            Ok(content) => content,
            Err(e) => {
                debug!("Skipping {}: {}", name_path.display(), e);
                continue;
            }
        };

        if adapter.trim_end() == name {
            debug!("Adapter '{}' is on bus {}", name, bus);
            found = Some(found.map_or(bus, |prev| prev.min(bus)));
        }
    }

    found.ok_or_else(|| DdcVolumeError::DeviceNotFound {
        name: name.to_string(),
    })
}
