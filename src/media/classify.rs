//! Maps generation-service failures onto the retry policy.
//!
//! Billing and auth markers in the message win over everything else. After
//! that the HTTP status is authoritative when there is one, and message text
//! is only consulted for statuses that do not say enough on their own.

use reqwest::StatusCode;

use crate::app::errors::AppError;

use super::generator::{GenerationFailure, QUOTA_WARNING};

const BILLING_MARKERS: [&str; 5] = [
    "credit balance",
    "exceeded your monthly included credits",
    "payment required",
    "insufficient credits",
    "402",
];
const AUTH_MARKERS: [&str; 5] = [
    "401",
    "unauthorized",
    "invalid credentials",
    "invalid token",
    "invalid username or password",
];
const RATE_LIMIT_MARKERS: [&str; 4] = ["429", "rate limit", "too many requests", "quota"];
const BUSY_MARKERS: [&str; 4] = [
    "503",
    "currently loading",
    "service unavailable",
    "overloaded",
];
const NETWORK_MARKERS: [&str; 3] = ["connection", "dns", "max retries"];
const TIMEOUT_MARKERS: [&str; 2] = ["timed out", "timeout"];
const PAYLOAD_MARKERS: [&str; 2] = ["json", "decode"];

pub fn classify_status(status: StatusCode, message: &str) -> GenerationFailure {
    let text = message.to_lowercase();

    if contains_any(&text, &BILLING_MARKERS) {
        return GenerationFailure::Warning(QUOTA_WARNING);
    }
    if contains_any(&text, &AUTH_MARKERS) {
        return AppError::Auth.into();
    }

    match status {
        StatusCode::PAYMENT_REQUIRED => GenerationFailure::Warning(QUOTA_WARNING),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Auth.into(),
        StatusCode::TOO_MANY_REQUESTS => AppError::RateLimited.into(),
        StatusCode::SERVICE_UNAVAILABLE => AppError::ServiceBusy.into(),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => AppError::Timeout.into(),
        StatusCode::BAD_GATEWAY => AppError::ServiceBusy.into(),
        _ => classify_message(message),
    }
}

/// Fallback classification by message content.
pub fn classify_message(message: &str) -> GenerationFailure {
    let text = message.to_lowercase();

    if contains_any(&text, &BILLING_MARKERS) {
        GenerationFailure::Warning(QUOTA_WARNING)
    } else if contains_any(&text, &AUTH_MARKERS) {
        AppError::Auth.into()
    } else if contains_any(&text, &RATE_LIMIT_MARKERS) {
        AppError::RateLimited.into()
    } else if contains_any(&text, &BUSY_MARKERS) {
        AppError::ServiceBusy.into()
    } else if contains_any(&text, &NETWORK_MARKERS) {
        AppError::Network.into()
    } else if contains_any(&text, &TIMEOUT_MARKERS) {
        AppError::Timeout.into()
    } else if contains_any(&text, &PAYLOAD_MARKERS) {
        AppError::InvalidResponse.into()
    } else {
        AppError::Internal.into()
    }
}

fn contains_any(text: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| text.contains(marker))
}
