//! Remote secret store access.
//!
//! This module provides:
//! - One-shot authenticated reads against the store (`client`)
//! - The per-bundle channel secret cache (`channel`)

pub mod channel;
pub mod client;

pub use channel::ChannelSecrets;
pub use client::VaultClient;
