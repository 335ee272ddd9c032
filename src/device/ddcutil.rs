//! ddcutil-based hardware backend
//!
//! Shells out to `ddcutil getvcp` / `ddcutil setvcp`, optionally through
//! sudo since raw i2c access usually needs elevated privileges.

use crate::config::schema::DdcutilConfig;
use crate::device::HardwareBackend;
use crate::error::{DdcVolumeError, DdcVolumeResult};
use crate::state::volume::clamp_volume;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

/// Monitor control through the ddcutil CLI
#[derive(Debug, Clone)]
pub struct DdcutilBackend {
    program: PathBuf,
    sudo: bool,
    noverify: bool,
    vcp_code: String,
    bus: u32,
}

impl DdcutilBackend {
    /// Create a backend for the monitor on `bus`
    pub fn new(config: &DdcutilConfig, bus: u32) -> Self {
        Self {
            program: config.path.clone(),
            sudo: config.sudo,
            noverify: config.noverify,
            vcp_code: config.vcp_code.clone(),
            bus,
        }
    }

    /// Arguments for reading the volume feature
    fn getvcp_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.noverify {
            args.push("--noverify".to_string());
        }
        args.extend([
            "--brief".to_string(),
            "--bus".to_string(),
            self.bus.to_string(),
            "getvcp".to_string(),
            self.vcp_code.clone(),
        ]);
        args
    }

    /// Arguments for writing the volume feature
    fn setvcp_args(&self, volume: u8) -> Vec<String> {
        let mut args = Vec::new();
        if self.noverify {
            args.push("--noverify".to_string());
        }
        args.extend([
            "--bus".to_string(),
            self.bus.to_string(),
            "setvcp".to_string(),
            self.vcp_code.clone(),
            "--".to_string(),
            volume.to_string(),
        ]);
        args
    }

    /// Full argv, with the sudo wrapper when enabled
    fn argv(&self, args: Vec<String>) -> (OsString, Vec<OsString>) {
        let args = args.into_iter().map(OsString::from);
        if self.sudo {
            let argv = std::iter::once(self.program.clone().into_os_string())
                .chain(args)
                .collect();
            (OsString::from("sudo"), argv)
        } else {
            (self.program.clone().into_os_string(), args.collect())
        }
    }

    /// Run ddcutil and return its output, or a description of what went wrong
    async fn exec(&self, args: Vec<String>) -> Result<std::process::Output, String> {
        let (program, argv) = self.argv(args);
        let command_line = format!(
            "{} {}",
            program.to_string_lossy(),
            argv.iter()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
                .join(" ")
        );
        debug!("Executing: {}", command_line);

        let output = Command::new(&program)
            .args(&argv)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| format!("failed to run {}: {}", command_line, e))?;

        if output.status.success() {
            Ok(output)
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(format!(
                "{} exited with {}: {}",
                command_line,
                output.status,
                stderr.trim()
            ))
        }
    }
}

/// Extract the current value from `ddcutil --brief getvcp` output
///
/// Brief output looks like `VCP 62 C 30 100`; the fourth token is the
/// current value.
pub fn parse_getvcp_output(stdout: &str) -> Option<u8> {
    let raw: i64 = stdout.split_whitespace().nth(3)?.parse().ok()?;
    Some(clamp_volume(raw))
}

#[async_trait]
impl HardwareBackend for DdcutilBackend {
    async fn read_volume(&self) -> DdcVolumeResult<u8> {
        let output = self
            .exec(self.getvcp_args())
            .await
            .map_err(DdcVolumeError::HardwareRead)?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let volume = parse_getvcp_output(&stdout).ok_or_else(|| {
            DdcVolumeError::HardwareRead(format!("unexpected getvcp output: {}", stdout.trim()))
        })?;

        debug!("Monitor on bus {} reports volume {}", self.bus, volume);
        Ok(volume)
    }

    async fn write_volume(&self, volume: u8) -> DdcVolumeResult<()> {
        self.exec(self.setvcp_args(volume))
            .await
            .map_err(DdcVolumeError::HardwareWrite)?;

        info!("Set monitor volume to {}", volume);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{} on bus {}", self.program.display(), self.bus)
    }
}
