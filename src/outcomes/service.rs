use crate::app::{errors::AppError, util::retry::RetryPolicy};

use super::{log::OutcomeLog, models::run_outcome::RunOutcome};

/// Appends the outcome row. Never fails: a logging error is reported with a
/// fixed message and otherwise ignored. Returns whether the row was written.
///
/// An append that may have reached the server is not resent, so one run
/// never writes two rows.
pub async fn record_outcome_with_retry(
    log: &dyn OutcomeLog,
    outcome: &RunOutcome,
    policy: &RetryPolicy,
) -> bool {
    tracing::info!("logging result to spreadsheet");

    match policy
        .run_if(
            "record_outcome",
            || log.append_row(outcome.to_row()),
            AppError::is_safe_to_resend,
        )
        .await
    {
        Ok(_) => true,
        Err(_) => {
            tracing::error!("final logging failed: log worksheet not accessible or network error");
            false
        }
    }
}
