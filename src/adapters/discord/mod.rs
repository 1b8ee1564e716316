//! Discord adapter. REST client implementing ChatPort.

pub mod client;

pub use client::DiscordChat;
