use crate::{app::errors::AppError, media::models::generated_image::GeneratedImage};

#[derive(Debug)]
pub enum GenerationResult {
    Image(GeneratedImage),
    /// The service refused for a reason the user should be told about.
    Warning(String),
    Failed(AppError),
}
