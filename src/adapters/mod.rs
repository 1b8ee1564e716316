//! Infrastructure adapters. Implement outbound ports.
//!
//! Reddit, Discord, HTTP, filesystem, terminal UI. Map errors to DomainError.

pub mod discord;
pub mod http;
pub mod persistence;
pub mod reddit;
pub mod ui;
