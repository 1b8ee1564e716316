//! Implements InputPort. Inquire-based mode picker and dispatch.

use crate::domain::DomainError;
use crate::ports::InputPort;
use crate::shared::config::RunMode;
use crate::usecases::{RelayService, SaveService, SubmissionReader};
use async_trait::async_trait;
use inquire::Select;
use tracing::info;

/// Returns `preset` if configured, otherwise asks the user.
pub fn select_mode(preset: Option<RunMode>) -> Result<RunMode, DomainError> {
    if let Some(mode) = preset {
        return Ok(mode);
    }
    Select::new("What should be done with the submissions?", RunMode::ALL.to_vec())
        .prompt()
        .map_err(|e| DomainError::Ui(e.to_string()))
}

/// Runs the selected mode once: read + classify, then relay or save.
pub struct TuiInputPort {
    reader: SubmissionReader,
    target: Target,
}

/// What happens to classified submissions.
pub enum Target {
    Chat(RelayService),
    Local(SaveService),
}

impl TuiInputPort {
    pub fn new(reader: SubmissionReader, target: Target) -> Self {
        Self { reader, target }
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        let submissions = self.reader.get_submissions().await?;
        match &self.target {
            Target::Chat(relay) => {
                relay.relay(&submissions).await?;
            }
            Target::Local(saver) => {
                let stats = saver.save_all(&submissions).await?;
                info!(
                    saved = stats.saved,
                    failed = stats.failed,
                    path = %stats.dir.display(),
                    "local save finished"
                );
            }
        }
        Ok(())
    }
}
