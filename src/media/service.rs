use crate::app::{errors::AppError, util::retry::RetryPolicy};

use super::{
    enums::generation_result::GenerationResult,
    generator::{GenerationFailure, ImageGenerator},
    models::generated_image::GeneratedImage,
};

/// Validates the prompt, then asks the generator for an image under the retry
/// policy. Quota warnings come back as a value instead of an error.
pub async fn generate_image_with_retry(
    generator: &dyn ImageGenerator,
    prompt: &str,
    policy: &RetryPolicy,
) -> GenerationResult {
    if prompt.trim().is_empty() {
        tracing::error!("received an empty prompt");
        return GenerationResult::Failed(AppError::Validation);
    }

    tracing::info!("generating image for: {:?}", prompt);

    match policy
        .run("generate_image", || generate_image(generator, prompt))
        .await
    {
        Ok(image) => {
            tracing::info!(
                "image generated ({}x{}, {} bytes)",
                image.width,
                image.height,
                image.data.len()
            );
            GenerationResult::Image(image)
        }
        Err(GenerationFailure::Warning(text)) => {
            tracing::warn!("generation declined: {}", text);
            GenerationResult::Warning(text.to_string())
        }
        Err(GenerationFailure::Error(e)) => {
            tracing::error!("generation failed: {}", e);
            GenerationResult::Failed(e)
        }
    }
}

async fn generate_image(
    generator: &dyn ImageGenerator,
    prompt: &str,
) -> Result<GeneratedImage, GenerationFailure> {
    let bytes = generator.text_to_image(prompt).await?;
    Ok(GeneratedImage::from_bytes(bytes)?)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bytes::Bytes;

    use crate::{
        media::{classify::classify_message, generator::QUOTA_WARNING},
        test_helpers::{png_bytes, FakeGenerator},
    };

    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy::new(3, Duration::ZERO)
    }

    #[tokio::test]
    async fn blank_prompt_fails_before_any_call() {
        let generator = FakeGenerator::always(Ok(png_bytes(8, 8)));

        for prompt in ["", "   ", "\n\t"] {
            let result = generate_image_with_retry(&generator, prompt, &policy()).await;
            assert!(matches!(result, GenerationResult::Failed(AppError::Validation)));
        }

        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn returns_image() {
        let generator = FakeGenerator::always(Ok(png_bytes(64, 32)));
        let result = generate_image_with_retry(&generator, "a cat", &policy()).await;

        let image = match result {
            GenerationResult::Image(image) => image,
            other => panic!("expected an image, got {:?}", other),
        };
        assert_eq!((image.width, image.height), (64, 32));
        assert_eq!(generator.prompts(), vec!["a cat"]);
    }

    #[tokio::test]
    async fn credit_balance_becomes_warning_without_retry() {
        let generator =
            FakeGenerator::always(Err(classify_message("Your credit balance is too low")));
        let result = generate_image_with_retry(&generator, "a cat", &policy()).await;

        assert!(matches!(result, GenerationResult::Warning(ref text) if text == QUOTA_WARNING));
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn unauthorized_fails_without_retry() {
        let generator = FakeGenerator::always(Err(classify_message("401 Unauthorized")));
        let result = generate_image_with_retry(&generator, "a cat", &policy()).await;

        assert!(matches!(result, GenerationResult::Failed(AppError::Auth)));
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn model_loading_is_retried_until_ready() {
        let generator = FakeGenerator::sequence(vec![
            Err(AppError::ServiceBusy.into()),
            Err(AppError::ServiceBusy.into()),
            Ok(png_bytes(8, 8)),
        ]);
        let result = generate_image_with_retry(&generator, "a cat", &policy()).await;

        assert!(matches!(result, GenerationResult::Image(_)));
        assert_eq!(generator.calls(), 3);
    }

    #[tokio::test]
    async fn garbage_payload_is_not_retried() {
        let generator = FakeGenerator::always(Ok(Bytes::from_static(b"not an image")));
        let result = generate_image_with_retry(&generator, "a cat", &policy()).await;

        assert!(matches!(result, GenerationResult::Failed(AppError::InvalidResponse)));
        assert_eq!(generator.calls(), 1);
    }
}
