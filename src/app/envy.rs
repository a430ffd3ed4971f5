use std::{fmt, time::Duration};

use serde::Deserialize;
use validator::Validate;

use super::{errors::StartupError, util::retry::RetryPolicy};

#[derive(Clone, Deserialize, Validate)]
pub struct Envy {
    #[serde(default = "default_app_env")]
    pub app_env: String,

    #[validate(length(min = 1))]
    pub telegram_token: String,
    #[validate(length(min = 1))]
    pub telegram_chat_id: String,

    #[validate(length(min = 1))]
    pub hf_token: String,
    #[serde(default = "default_hf_model")]
    #[validate(length(min = 1))]
    pub hf_model: String,

    #[serde(default = "default_service_account_file")]
    pub google_service_account_file: String,
    #[serde(default = "default_spreadsheet_name")]
    #[validate(length(min = 1))]
    pub spreadsheet_name: String,
    pub spreadsheet_id: Option<String>,
    #[serde(default = "default_queue_worksheet")]
    #[validate(length(min = 1))]
    pub queue_worksheet: String,
    #[serde(default = "default_log_worksheet")]
    #[validate(length(min = 1))]
    pub log_worksheet: String,

    #[serde(default = "default_retry_attempts")]
    #[validate(range(min = 1, max = 10))]
    pub retry_attempts: u32,
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
    pub run_interval_secs: Option<u64>,
}

impl Envy {
    pub fn from_env() -> Result<Self, StartupError> {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, StartupError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let envy = envy::from_iter::<_, Envy>(vars)?;
        envy.validate()?;

        Ok(envy)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_attempts,
            Duration::from_secs(self.retry_delay_secs),
        )
    }

    pub fn run_interval(&self) -> Option<Duration> {
        self.run_interval_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

// secrets stay out of debug output
impl fmt::Debug for Envy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Envy")
            .field("app_env", &self.app_env)
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &"<redacted>")
            .field("hf_token", &"<redacted>")
            .field("hf_model", &self.hf_model)
            .field(
                "google_service_account_file",
                &self.google_service_account_file,
            )
            .field("spreadsheet_name", &self.spreadsheet_name)
            .field("spreadsheet_id", &self.spreadsheet_id)
            .field("queue_worksheet", &self.queue_worksheet)
            .field("log_worksheet", &self.log_worksheet)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_delay_secs", &self.retry_delay_secs)
            .field("run_interval_secs", &self.run_interval_secs)
            .finish()
    }
}

fn default_app_env() -> String {
    "development".to_string()
}

fn default_hf_model() -> String {
    "stabilityai/stable-diffusion-xl-base-1.0".to_string()
}

fn default_service_account_file() -> String {
    "chatbot_key.json".to_string()
}

fn default_spreadsheet_name() -> String {
    "Image Prompt".to_string()
}

fn default_queue_worksheet() -> String {
    "Process".to_string()
}

fn default_log_worksheet() -> String {
    "Done".to_string()
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_secs() -> u64 {
    5
}
