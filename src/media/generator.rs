use async_trait::async_trait;
use bytes::Bytes;

use crate::app::{errors::AppError, util::retry::Retryable};

/// Message sent to the chat when the generation account has run out of credits.
pub const QUOTA_WARNING: &str = "Generation credits exhausted (Top up the inference account)";

/// Why a single generation attempt produced no image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationFailure {
    /// A business-rule condition the user should hear about; never retried.
    Warning(&'static str),
    Error(AppError),
}

impl From<AppError> for GenerationFailure {
    fn from(e: AppError) -> Self {
        GenerationFailure::Error(e)
    }
}

impl Retryable for GenerationFailure {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Warning(_) => false,
            Self::Error(e) => e.is_retryable(),
        }
    }
}

impl std::fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Warning(text) => f.write_str(text),
            Self::Error(e) => e.fmt(f),
        }
    }
}

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Submits one prompt and returns the raw image payload.
    async fn text_to_image(&self, prompt: &str) -> Result<Bytes, GenerationFailure>;
}
