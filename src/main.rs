use std::{env, path::Path, process::ExitCode, sync::Arc};

use tracing_subscriber::EnvFilter;

use crate::{
    app::{
        envy::Envy,
        errors::StartupError,
        util::{
            google::client::{config::Config, google_client::GoogleClient},
            retry::RetryPolicy,
        },
    },
    flow::service::Pipeline,
    media::apis::hugging_face::service::HuggingFaceClient,
    sheets::service::{Spreadsheet, Worksheet},
    telegram::service::TelegramClient,
};

mod app;
mod flow;
mod media;
mod outcomes;
mod prompts;
mod sheets;
mod telegram;
#[cfg(test)]
mod test_helpers;

pub struct AppState {
    pub queue: Worksheet,
    pub log: Worksheet,
    pub generator: HuggingFaceClient,
    pub messenger: TelegramClient,
    pub policy: RetryPolicy,
}

impl AppState {
    pub async fn connect(envy: &Envy) -> Result<AppState, StartupError> {
        let policy = envy.retry_policy();
        let http_client = app::util::reqwest::build_client()?;

        let config = Config::from_file(Path::new(&envy.google_service_account_file))?;
        let google = Arc::new(GoogleClient::new(config, http_client.clone()));

        let spreadsheet = policy
            .run("open_spreadsheet", || {
                Spreadsheet::open(
                    google.clone(),
                    envy.spreadsheet_id.as_deref().filter(|id| !id.is_empty()),
                    &envy.spreadsheet_name,
                )
            })
            .await?;
        let queue = policy
            .run("open_queue", || spreadsheet.worksheet(&envy.queue_worksheet))
            .await?;
        let log = policy
            .run("open_log", || spreadsheet.worksheet(&envy.log_worksheet))
            .await?;

        tracing::info!("connected to spreadsheet {}", spreadsheet.id);

        Ok(AppState {
            queue,
            log,
            generator: HuggingFaceClient::new(
                http_client.clone(),
                envy.hf_token.to_string(),
                envy.hf_model.to_string(),
            ),
            messenger: TelegramClient::new(
                http_client,
                envy.telegram_token.to_string(),
                envy.telegram_chat_id.to_string(),
            ),
            policy,
        })
    }

    pub fn pipeline(&self) -> Pipeline<'_> {
        Pipeline {
            queue: &self.queue,
            generator: &self.generator,
            messenger: &self.messenger,
            log: &self.log,
            policy: self.policy,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // environment
    let app_env = env::var("APP_ENV").unwrap_or("development".to_string());
    if dotenvy::from_filename(format!(".env.{}", app_env)).is_err() {
        let _ = dotenvy::dotenv();
    }
    let envy = match Envy::from_env() {
        Ok(envy) => envy,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::from(2);
        }
    };

    let state = match AppState::connect(&envy).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("startup failed: {}", e);
            return ExitCode::from(2);
        }
    };

    if let Some(period) = envy.run_interval() {
        app::util::scheduler::serve(&state, period).await;
        return ExitCode::SUCCESS;
    }

    let report = flow::service::run(&state.pipeline()).await;

    if !report.logged {
        tracing::warn!("run outcome was not recorded");
    }

    if report.exit.is_success() {
        tracing::info!("run finished: {}", report.outcome.detail);
        ExitCode::SUCCESS
    } else {
        tracing::error!("run failed: {}", report.outcome.detail);
        ExitCode::FAILURE
    }
}
