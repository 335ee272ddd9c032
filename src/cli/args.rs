//! CLI argument definitions using clap derive

use crate::config::Config;
use clap::{ArgAction, ArgGroup, Parser};
use std::path::PathBuf;

/// ddcvolume - Monitor volume control over DDC/CI
///
/// Changes are cached in the runtime directory and only pushed to the
/// monitor when the volume actually changed.
#[derive(Parser, Debug)]
#[command(name = "ddcvolume")]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .args(["set", "get", "refresh"])
))]
pub struct Cli {
    /// Set the volume: absolute (40) or relative (+5, -5)
    #[arg(long, value_name = "VOLUME", allow_hyphen_values = true)]
    pub set: Option<String>,

    /// Print the current volume
    #[arg(long)]
    pub get: bool,

    /// Re-read the volume from the monitor and print it
    #[arg(long)]
    pub refresh: bool,

    /// ddcutil executable to use
    #[arg(long, value_name = "PATH", env = "DDCVOLUME_DDCUTIL")]
    pub ddcutil: Option<PathBuf>,

    /// i2c bus of the monitor (skips discovery)
    #[arg(long, value_name = "N")]
    pub bus: Option<u32>,

    /// Don't show a desktop notification
    #[arg(long)]
    pub no_notify: bool,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, env = "DDCVOLUME_CONFIG")]
    pub config: Option<PathBuf>,
}

/// What the invocation should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Set(String),
    Get,
    Refresh,
}

impl Cli {
    /// The requested action
    pub fn action(&self) -> Action {
        match (&self.set, self.get) {
            (Some(expr), _) => Action::Set(expr.clone()),
            (None, true) => Action::Get,
            (None, false) => Action::Refresh,
        }
    }

    /// Apply command-line overrides on top of the loaded config
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(path) = &self.ddcutil {
            config.ddcutil.path = path.clone();
        }
        if let Some(bus) = self.bus {
            config.device.bus = Some(bus);
        }
        if self.no_notify {
            config.notification.enabled = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("ddcvolume").chain(args.iter().copied()))
    }

    #[test]
    fn set_accepts_negative_delta() {
        let cli = parse(&["--set", "-5"]).unwrap();
        assert_eq!(cli.action(), Action::Set("-5".to_string()));
    }

    #[test]
    fn set_accepts_positive_delta() {
        let cli = parse(&["--set", "+5"]).unwrap();
        assert_eq!(cli.action(), Action::Set("+5".to_string()));
    }

    #[test]
    fn get_and_refresh() {
        assert_eq!(parse(&["--get"]).unwrap().action(), Action::Get);
        assert_eq!(parse(&["--refresh"]).unwrap().action(), Action::Refresh);
    }

    #[test]
    fn action_required() {
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn actions_conflict() {
        assert!(parse(&["--get", "--set", "10"]).is_err());
    }

    #[test]
    fn overrides_apply() {
        let cli = parse(&["--get", "--ddcutil", "/opt/ddcutil", "--bus", "3", "--no-notify"])
            .unwrap();
        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.ddcutil.path, PathBuf::from("/opt/ddcutil"));
        assert_eq!(config.device.bus, Some(3));
        assert!(!config.notification.enabled);
    }

    #[test]
    fn no_overrides_keep_config() {
        let cli = parse(&["--get"]).unwrap();
        let mut config = Config::default();
        config.device.bus = Some(9);
        cli.apply_overrides(&mut config);

        assert_eq!(config.device.bus, Some(9));
        assert!(config.notification.enabled);
    }
}
