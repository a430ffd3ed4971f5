use async_trait::async_trait;

use crate::{
    app::{errors::AppError, util::retry::RetryPolicy},
    media::models::generated_image::GeneratedImage,
};

/// Chat endpoint that accepts an image with caption or a plain text notice.
/// A send counts as delivered only on HTTP 200.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_photo(&self, image: &GeneratedImage, caption: &str) -> Result<(), AppError>;

    async fn send_text(&self, text: &str) -> Result<(), AppError>;
}

pub async fn deliver_image_with_retry(
    messenger: &dyn Messenger,
    image: &GeneratedImage,
    caption: &str,
    policy: &RetryPolicy,
) -> Result<(), AppError> {
    tracing::info!("sending image to chat");

    policy
        .run("send_photo", || messenger.send_photo(image, caption))
        .await?;

    tracing::info!("image delivered");
    Ok(())
}

pub async fn deliver_notice_with_retry(
    messenger: &dyn Messenger,
    text: &str,
    policy: &RetryPolicy,
) -> Result<(), AppError> {
    tracing::info!("sending notice to chat");

    policy
        .run("send_text", || messenger.send_text(text))
        .await?;

    tracing::info!("notice delivered");
    Ok(())
}

/// Text sent instead of an image when generation was declined.
pub fn quota_notice(prompt: &str, warning: &str) -> String {
    format!(
        "Image generation paused.\n{}\nThe prompt \"{}\" stays in the queue and will be retried on the next run.",
        warning, prompt
    )
}
