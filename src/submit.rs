//! Submission handlers receiving validated records

use anyhow::{Context, Result};
use tracing::info;

use crate::models::OutputSubmission;

/// Receives a record once it has passed validation
#[async_trait::async_trait]
pub trait SubmissionHandler: Send + Sync {
    async fn submit(&self, record: &OutputSubmission) -> Result<()>;
}

/// Logs the submitted record as JSON
#[derive(Debug, Default, Clone)]
pub struct LogSubmitter;

impl LogSubmitter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl SubmissionHandler for LogSubmitter {
    async fn submit(&self, record: &OutputSubmission) -> Result<()> {
        let json = serde_json::to_string(record).context("Failed to serialize submission")?;
        info!(submission = %json, "Output submitted");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Collects every record it receives. Clones share one log.
    #[derive(Default, Clone)]
    pub struct RecordingSubmitter {
        pub received: Arc<Mutex<Vec<OutputSubmission>>>,
    }

    impl RecordingSubmitter {
        pub fn received(&self) -> Vec<OutputSubmission> {
            self.received.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl SubmissionHandler for RecordingSubmitter {
        async fn submit(&self, record: &OutputSubmission) -> Result<()> {
            self.received.lock().unwrap().push(record.clone());
            Ok(())
        }
    }

    /// Always fails
    pub struct FailingSubmitter;

    #[async_trait::async_trait]
    impl SubmissionHandler for FailingSubmitter {
        async fn submit(&self, _record: &OutputSubmission) -> Result<()> {
            Err(anyhow::anyhow!("destination unavailable"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AsapFunded, OutputType};

    #[tokio::test]
    async fn test_log_submitter_accepts_record() {
        let record = OutputSubmission {
            title: "X".to_string(),
            url: "https://example.com".to_string(),
            usage_notes: None,
            output_type: OutputType::Preprint,
            asap_funded: AsapFunded::No,
        };
        LogSubmitter::new().submit(&record).await.unwrap();
    }
}
