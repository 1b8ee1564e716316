//! Application use cases. Orchestrate domain logic via ports.

pub mod relay_service;
pub mod save_service;
pub mod submission_reader;

pub use relay_service::RelayService;
pub use save_service::{SaveService, SaveStats};
pub use submission_reader::SubmissionReader;
