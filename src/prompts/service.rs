use std::sync::atomic::{AtomicBool, Ordering};

use crate::app::{errors::AppError, util::retry::RetryPolicy};

use super::{models::prompt_record::PromptRecord, queue::PromptQueue};

pub const PROMPT_COLUMN: u32 = 1;
/// Row 1 is the header; the next prompt always sits directly below it.
pub const PROMPT_ROW: u32 = 2;

pub async fn fetch_prompt_with_retry(
    queue: &dyn PromptQueue,
    policy: &RetryPolicy,
) -> Result<Option<PromptRecord>, AppError> {
    policy
        .run("fetch_prompt", || fetch_prompt(queue))
        .await
}

pub async fn fetch_prompt(queue: &dyn PromptQueue) -> Result<Option<PromptRecord>, AppError> {
    tracing::info!("scanning the prompt queue");

    let column = queue.column_values(PROMPT_COLUMN).await?;

    if column.len() <= 1 {
        tracing::info!("queue is empty");
        return Ok(None);
    }

    let row = queue.row_values(PROMPT_ROW).await?;
    let text = row.into_iter().next().unwrap_or_default();

    tracing::info!("picked up prompt: {:?}", text);
    Ok(Some(PromptRecord::new(text, PROMPT_ROW)))
}

/// Deletes the prompt's row. A failed delete may still have been applied, so
/// every later attempt first checks that the row still holds this prompt.
pub async fn remove_prompt_with_retry(
    queue: &dyn PromptQueue,
    prompt: &PromptRecord,
    policy: &RetryPolicy,
) -> Result<(), AppError> {
    tracing::info!("removing processed row {}", prompt.row);

    let retrying = &AtomicBool::new(false);

    policy
        .run("remove_prompt", move || async move {
            if retrying.swap(true, Ordering::Relaxed) && !still_queued(queue, prompt).await? {
                tracing::info!("row {} was already removed", prompt.row);
                return Ok(());
            }

            queue.delete_row(prompt.row).await
        })
        .await
}

async fn still_queued(queue: &dyn PromptQueue, prompt: &PromptRecord) -> Result<bool, AppError> {
    let row = queue.row_values(prompt.row).await?;
    Ok(row.first() == Some(&prompt.text))
}
