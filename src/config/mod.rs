//! Configuration module for the reaction fleet.
//!
//! Handles loading of bot credentials, welcome links and tuning knobs
//! from the environment, plus the fixed reaction emoji palette.

mod credentials;
mod palette;
mod settings;

pub use credentials::{AccountCredential, parse_credential_list};
pub use palette::{EMOJIS, EmojiPalette};
pub use settings::{
    ApiSettings, ConfigError, DEFAULT_API_URL, FleetConfig, WelcomeLinks, WorkerSettings,
};
