use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{
    header::{ACCEPT, CONTENT_TYPE},
    Response, StatusCode,
};

use crate::{
    app::util::reqwest::transport_error,
    media::{
        classify::classify_status,
        generator::{GenerationFailure, ImageGenerator},
    },
};

use super::{
    config::API_URL, models::input_spec::InputSpec,
    structs::hugging_face_error_response::HuggingFaceErrorResponse,
};

pub struct HuggingFaceClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
}

impl HuggingFaceClient {
    pub fn new(http_client: reqwest::Client, api_key: String, model: String) -> Self {
        Self {
            http_client,
            api_key,
            model,
        }
    }

    fn model_url(&self) -> String {
        format!("{}/{}", API_URL, self.model)
    }
}

#[async_trait]
impl ImageGenerator for HuggingFaceClient {
    async fn text_to_image(&self, prompt: &str) -> Result<Bytes, GenerationFailure> {
        let result = self
            .http_client
            .post(self.model_url())
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "image/png")
            .json(&InputSpec { inputs: prompt })
            .send()
            .await;

        match result {
            Ok(res) if res.status() == StatusCode::OK && !is_json(&res) => match res.bytes().await {
                Ok(bytes) => Ok(bytes),
                Err(e) => {
                    let error = transport_error(&e);
                    tracing::error!("text_to_image (1): {}", error);
                    Err(error.into())
                }
            },
            Ok(res) => Err(parse_failure(res).await),
            Err(e) => {
                let error = transport_error(&e);
                tracing::error!("text_to_image (2): {}", error);
                Err(error.into())
            }
        }
    }
}

fn is_json(res: &Response) -> bool {
    res.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/json"))
        .unwrap_or(false)
}

async fn parse_failure(res: Response) -> GenerationFailure {
    let status = res.status();
    let text = res.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<HuggingFaceErrorResponse>(&text) {
        Ok(error_response) => {
            if let Some(estimated_time) = error_response.estimated_time {
                tracing::info!("model is loading, estimated {:.0}s", estimated_time);
            }
            error_response.message()
        }
        Err(_) => text,
    };

    let failure = classify_status(status, &message);
    tracing::error!("text_to_image (3): {} -> {}", status.as_u16(), failure);

    failure
}
