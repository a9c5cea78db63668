//! Autoreact Fleet Library
//!
//! Runs a fleet of Telegram bots that react to group messages with random
//! emoji.
//!
//! This crate provides the core functionality for:
//! - Loading bot tokens and tuning knobs from the environment
//! - Talking to the Telegram Bot API over HTTPS
//! - Polling updates per account and dispatching reactions concurrently
//! - Answering `/start` with a welcome message and action buttons

pub mod commands;
pub mod config;
pub mod fleet;
pub mod telegram;
pub mod worker;

#[cfg(test)]
mod testing;
