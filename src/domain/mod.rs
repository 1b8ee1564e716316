//! Core domain layer. No external I/O dependencies.
//!
//! Entities and business rules live here. Dependencies flow inward.

pub mod classify;
pub mod entities;
pub mod errors;
pub mod sanitize;

pub use classify::{SkipReason, Skipped, classify, classify_detailed, extract_submissions};
pub use entities::{Category, ExtractedSubmission, FeedItem, FeedQuery, MediaKind};
pub use errors::DomainError;
pub use sanitize::sanitize_title;
