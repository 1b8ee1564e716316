//! Generic HTTP adapters.

pub mod fetcher;

pub use fetcher::HttpMediaFetcher;
