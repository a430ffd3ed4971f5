use bytes::Bytes;
use imagesize::ImageType;
use mime::Mime;

use crate::app::errors::AppError;

#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub data: Bytes,
    pub mime_type: Mime,
    pub extension: &'static str,
    pub width: usize,
    pub height: usize,
}

impl GeneratedImage {
    /// Sniffs the payload and rejects anything that is not a usable image.
    pub fn from_bytes(data: Bytes) -> Result<GeneratedImage, AppError> {
        if data.is_empty() {
            tracing::error!("generation service returned an empty payload");
            return Err(AppError::InvalidResponse);
        }

        let Ok(image_type) = imagesize::image_type(&data) else {
            tracing::error!("generation service returned an unrecognized payload");
            return Err(AppError::InvalidResponse);
        };

        let (mime_type, extension) = match image_type {
            ImageType::Png => (mime::IMAGE_PNG, "png"),
            ImageType::Jpeg => (mime::IMAGE_JPEG, "jpg"),
            ImageType::Gif => (mime::IMAGE_GIF, "gif"),
            ImageType::Webp => match "image/webp".parse::<Mime>() {
                Ok(mime_type) => (mime_type, "webp"),
                Err(_) => return Err(AppError::Internal),
            },
            other => {
                tracing::error!("unsupported image type {:?}", other);
                return Err(AppError::InvalidResponse);
            }
        };

        let Ok(size) = imagesize::blob_size(&data) else {
            tracing::error!("generated image header is truncated");
            return Err(AppError::InvalidResponse);
        };

        Ok(GeneratedImage {
            data,
            mime_type,
            extension,
            width: size.width,
            height: size.height,
        })
    }

    pub fn file_name(&self) -> String {
        format!("generated_image.{}", self.extension)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_helpers::png_bytes;

    use super::*;

    #[test]
    fn reads_png_header() {
        let image = GeneratedImage::from_bytes(png_bytes(1024, 768)).unwrap();

        assert_eq!(image.mime_type, mime::IMAGE_PNG);
        assert_eq!(image.file_name(), "generated_image.png");
        assert_eq!((image.width, image.height), (1024, 768));
    }

    #[test]
    fn empty_payload_is_rejected() {
        let result = GeneratedImage::from_bytes(Bytes::new());
        assert_eq!(result.unwrap_err(), AppError::InvalidResponse);
    }

    #[test]
    fn json_payload_is_rejected() {
        let result = GeneratedImage::from_bytes(Bytes::from_static(br#"{"error": "nope"}"#));
        assert_eq!(result.unwrap_err(), AppError::InvalidResponse);
    }
}
