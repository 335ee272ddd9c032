//! ddcvolume - Monitor volume control over DDC/CI
//!
//! Caches the monitor volume in the runtime directory so repeated key
//! presses don't each pay for a DDC read, shows a desktop notification, and
//! writes the final value to the monitor through ddcutil.

pub mod cli;
pub mod config;
pub mod device;
pub mod error;
pub mod notify;
pub mod state;

pub use error::{DdcVolumeError, DdcVolumeResult};
