//! Reddit adapter. Listing API client and JSON mapping.

pub mod client;
pub mod mapper;

pub use client::RedditFeed;
