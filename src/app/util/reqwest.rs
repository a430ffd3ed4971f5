use std::error::Error as _;

use crate::app::errors::{AppError, DeliveryFailure};

pub fn build_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::ClientBuilder::new()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
}

/// Maps a transport-level failure onto the shared taxonomy. The error itself
/// is dropped; its text can carry request URLs.
pub fn transport_error(e: &reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::Timeout
    } else if e.is_connect() {
        AppError::Unreachable
    } else if e.is_request() || is_tls(e) {
        AppError::Network
    } else if e.is_decode() || e.is_body() {
        AppError::InvalidResponse
    } else {
        AppError::Internal
    }
}

pub fn delivery_failure(e: &reqwest::Error) -> DeliveryFailure {
    if e.is_timeout() {
        DeliveryFailure::Timeout
    } else if is_tls(e) {
        DeliveryFailure::Tls
    } else if e.is_connect() || e.is_request() {
        DeliveryFailure::Network
    } else if let Some(status) = e.status() {
        DeliveryFailure::Status(status.as_u16())
    } else {
        DeliveryFailure::Other
    }
}

fn is_tls(e: &reqwest::Error) -> bool {
    let mut source = e.source();

    while let Some(cause) = source {
        let text = cause.to_string().to_lowercase();
        if text.contains("certificate") || text.contains("tls") || text.contains("ssl") {
            return true;
        }
        source = cause.source();
    }

    false
}
