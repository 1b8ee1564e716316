//! Inbound port. UI (adapter) calls into the application.

use crate::domain::DomainError;

/// Input port: UI/CLI invokes application use cases.
#[async_trait::async_trait]
pub trait InputPort: Send + Sync {
    /// Pick the run mode (send to chat or save locally) and run it once.
    async fn run(&self) -> Result<(), DomainError>;
}
