//! Configuration schema for ddcvolume
//!
//! Configuration is stored at `~/.config/ddcvolume/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Monitor discovery settings
    pub device: DeviceConfig,

    /// External ddcutil invocation settings
    pub ddcutil: DdcutilConfig,

    /// Desktop notification settings
    pub notification: NotificationConfig,

    /// Cached state settings
    pub state: StateConfig,
}

/// Monitor discovery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Name advertised by the i2c adapter the monitor is attached to
    pub name: String,

    /// Fixed bus number (skips discovery)
    pub bus: Option<u32>,

    /// Directory enumerating i2c adapters
    pub sysfs_dir: PathBuf,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: "Radeon i2c bit bus 0x92".to_string(),
            bus: None,
            sysfs_dir: PathBuf::from("/sys/bus/i2c/devices"),
        }
    }
}

/// ddcutil settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DdcutilConfig {
    /// ddcutil executable name or path
    pub path: PathBuf,

    /// Run ddcutil through sudo
    pub sudo: bool,

    /// Pass --noverify to skip read-back after setvcp
    pub noverify: bool,

    /// VCP feature code for audio volume
    pub vcp_code: String,
}

impl Default for DdcutilConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("ddcutil"),
            sudo: true,
            noverify: true,
            vcp_code: "62".to_string(),
        }
    }
}

/// Notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Show a notification after --set
    pub enabled: bool,

    /// Application name reported to the notification server
    pub app_name: String,

    /// Expiry in milliseconds
    pub timeout_ms: i32,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            app_name: "ddcvolume volume control".to_string(),
            timeout_ms: 2000,
        }
    }
}

/// Cached state settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// State directory (defaults to `$XDG_RUNTIME_DIR/ddcvolume`)
    pub dir: Option<PathBuf>,

    /// Maximum time to wait for a state lock
    pub lock_timeout_ms: u64,

    /// Maximum time to wait for the commit lock, which is held while
    /// ddcutil writes to the monitor
    pub commit_lock_timeout_ms: u64,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            dir: None,
            lock_timeout_ms: 5000,
            commit_lock_timeout_ms: 30000,
        }
    }
}
