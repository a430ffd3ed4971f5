use std::path::Path;

use serde::Deserialize;

use crate::app::errors::StartupError;

/// The fields of a Google service account key file that the token exchange needs.
#[derive(Clone, Deserialize)]
pub struct Config {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Config, StartupError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}
