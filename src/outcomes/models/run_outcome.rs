use crate::{app::errors::AppError, outcomes::enums::run_status::RunStatus};

pub const NO_PROMPT: &str = "No Prompt";
pub const STARTED: &str = "Process Started";
pub const QUEUE_EMPTY: &str = "Queue Empty (Nothing to Process)";
pub const DELIVERED: &str = "Image sent to Telegram successfully.";

/// One row of the log worksheet: prompt, status, detail, timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub prompt: String,
    pub status: RunStatus,
    pub detail: String,
    pub timestamp: String,
}

impl RunOutcome {
    pub fn started(timestamp: String) -> Self {
        Self {
            prompt: NO_PROMPT.to_string(),
            status: RunStatus::Unknown,
            detail: STARTED.to_string(),
            timestamp,
        }
    }

    pub fn queue_empty(&mut self) {
        self.status = RunStatus::Unknown;
        self.detail = QUEUE_EMPTY.to_string();
    }

    pub fn succeed(&mut self) {
        self.status = RunStatus::Success;
        self.detail = DELIVERED.to_string();
    }

    pub fn decline(&mut self, warning: &str) {
        self.status = RunStatus::Failed;
        self.detail = warning.to_string();
    }

    pub fn fail(&mut self, e: &AppError) {
        self.status = RunStatus::Failed;
        self.detail = e.to_string();
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.prompt.to_string(),
            self.status.value().to_string(),
            self.detail.to_string(),
            self.timestamp.to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_unknown() {
        let outcome = RunOutcome::started("2024-05-01 07:00:00".to_string());

        assert_eq!(
            outcome.to_row(),
            vec!["No Prompt", "UNKNOWN", "Process Started", "2024-05-01 07:00:00"]
        );
    }

    #[test]
    fn failure_detail_is_the_sanitized_message() {
        let mut outcome = RunOutcome::started("t".to_string());
        outcome.prompt = "x".to_string();
        outcome.succeed();
        outcome.fail(&AppError::Sheets);

        assert_eq!(outcome.status, RunStatus::Failed);
        assert_eq!(outcome.detail, "Google Sheets Connection Failed");
    }
}
