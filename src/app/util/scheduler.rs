use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};

use crate::{flow, AppState};

/// Runs the flow on a fixed interval until the process is stopped.
pub async fn serve(state: &AppState, period: Duration) {
    tracing::info!("serving every {}s", period.as_secs());

    let mut interval = interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let report = flow::service::run(&state.pipeline()).await;
        tracing::info!(
            "run finished: {} ({})",
            report.outcome.status.value(),
            report.outcome.detail
        );
    }
}
