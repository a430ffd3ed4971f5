use async_trait::async_trait;

use crate::app::errors::AppError;

/// Append-only sink for run outcomes.
#[async_trait]
pub trait OutcomeLog: Send + Sync {
    async fn append_row(&self, values: Vec<String>) -> Result<(), AppError>;
}
