use crate::{
    app::{
        errors::AppError,
        util::{retry::RetryPolicy, time::current_timestamp},
    },
    media::{
        self, enums::generation_result::GenerationResult, generator::ImageGenerator,
    },
    outcomes::{self, log::OutcomeLog, models::run_outcome::RunOutcome},
    prompts::{self, queue::PromptQueue},
    telegram::messenger::{self, Messenger},
};

/// The collaborators one run talks to.
pub struct Pipeline<'a> {
    pub queue: &'a dyn PromptQueue,
    pub generator: &'a dyn ImageGenerator,
    pub messenger: &'a dyn Messenger,
    pub log: &'a dyn OutcomeLog,
    pub policy: RetryPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowExit {
    Delivered,
    QueueEmpty,
    QuotaNotified,
    Failed(AppError),
}

impl FlowExit {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub exit: FlowExit,
    pub logged: bool,
}

/// Runs the pipeline once. Exactly one outcome row is attempted whatever
/// happens before it, and a logging failure never changes the exit.
pub async fn run(pipeline: &Pipeline<'_>) -> RunReport {
    let mut outcome = RunOutcome::started(current_timestamp());

    let exit = match execute(pipeline, &mut outcome).await {
        Ok(exit) => exit,
        Err(e) => {
            tracing::error!("flow failed: {}", e);
            outcome.fail(&e);
            FlowExit::Failed(e)
        }
    };

    let logged =
        outcomes::service::record_outcome_with_retry(pipeline.log, &outcome, &pipeline.policy)
            .await;

    RunReport {
        outcome,
        exit,
        logged,
    }
}

async fn execute(pipeline: &Pipeline<'_>, outcome: &mut RunOutcome) -> Result<FlowExit, AppError> {
    let policy = &pipeline.policy;

    let prompt = match prompts::service::fetch_prompt_with_retry(pipeline.queue, policy).await? {
        Some(prompt) if !prompt.is_blank() => prompt,
        Some(prompt) => {
            tracing::warn!(
                "row {} is blank; the queue is stuck until it is filled or removed",
                prompt.row
            );
            return Err(AppError::Validation);
        }
        None => {
            tracing::info!("no prompt found, stopping");
            outcome.queue_empty();
            return Ok(FlowExit::QueueEmpty);
        }
    };

    outcome.prompt = prompt.text.to_string();

    match media::service::generate_image_with_retry(pipeline.generator, &prompt.text, policy).await
    {
        GenerationResult::Image(image) => {
            messenger::deliver_image_with_retry(pipeline.messenger, &image, &prompt.text, policy)
                .await?;
            outcome.succeed();

            prompts::service::remove_prompt_with_retry(pipeline.queue, &prompt, policy).await?;

            Ok(FlowExit::Delivered)
        }
        GenerationResult::Warning(warning) => {
            let notice = messenger::quota_notice(&prompt.text, &warning);
            messenger::deliver_notice_with_retry(pipeline.messenger, &notice, policy).await?;
            outcome.decline(&warning);

            Ok(FlowExit::QuotaNotified)
        }
        GenerationResult::Failed(e) => Err(e),
    }
}
