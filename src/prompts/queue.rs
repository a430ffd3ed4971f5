use async_trait::async_trait;

use crate::app::errors::AppError;

/// A list of pending prompts with a header row. Rows and columns are 1-based.
#[async_trait]
pub trait PromptQueue: Send + Sync {
    async fn column_values(&self, column: u32) -> Result<Vec<String>, AppError>;

    async fn row_values(&self, row: u32) -> Result<Vec<String>, AppError>;

    async fn delete_row(&self, row: u32) -> Result<(), AppError>;
}
