//! reddit-relay: pull media submissions from a subreddit, then relay them to a Discord
//! channel or save them locally. Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
