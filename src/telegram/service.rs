use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Response, StatusCode,
};
use serde_json::json;

use crate::{
    app::{
        errors::{AppError, DeliveryFailure},
        util::reqwest::delivery_failure,
    },
    media::models::generated_image::GeneratedImage,
};

use super::{
    config::{API_URL, CAPTION_LIMIT, TEXT_LIMIT},
    messenger::Messenger,
};

pub struct TelegramClient {
    http_client: reqwest::Client,
    token: String,
    chat_id: String,
}

impl TelegramClient {
    pub fn new(http_client: reqwest::Client, token: String, chat_id: String) -> Self {
        Self {
            http_client,
            token,
            chat_id,
        }
    }

    // the token is part of the path, so this url must never be logged
    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", API_URL, self.token, method)
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_photo(&self, image: &GeneratedImage, caption: &str) -> Result<(), AppError> {
        let part = match Part::bytes(image.data.to_vec())
            .file_name(image.file_name())
            .mime_str(image.mime_type.as_ref())
        {
            Ok(part) => part,
            Err(_) => {
                tracing::error!("send_photo: invalid mime type {}", image.mime_type);
                return Err(AppError::Internal);
            }
        };

        let form = Form::new()
            .text("chat_id", self.chat_id.to_string())
            .text("caption", truncate(caption, CAPTION_LIMIT))
            .part("photo", part);

        let result = self
            .http_client
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()
            .await;

        check_delivery("send_photo", result)
    }

    async fn send_text(&self, text: &str) -> Result<(), AppError> {
        let result = self
            .http_client
            .post(self.method_url("sendMessage"))
            .json(&json!({
                "chat_id": self.chat_id,
                "text": truncate(text, TEXT_LIMIT),
            }))
            .send()
            .await;

        check_delivery("send_text", result)
    }
}

fn check_delivery(
    operation: &str,
    result: Result<Response, reqwest::Error>,
) -> Result<(), AppError> {
    let failure = match result {
        Ok(res) => match res.status() {
            StatusCode::OK => return Ok(()),
            status => DeliveryFailure::Status(status.as_u16()),
        },
        Err(e) => delivery_failure(&e),
    };

    tracing::warn!("{}: telegram refused ({})", operation, failure.value());
    Err(AppError::Delivery(failure))
}

fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}
