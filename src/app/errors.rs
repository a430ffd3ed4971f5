use thiserror::Error;

/// Coarse bucket describing why a delivery request did not come back with
/// HTTP 200. Only used for logging; every bucket is retried the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailure {
    Network,
    Timeout,
    Tls,
    Status(u16),
    Other,
}

impl DeliveryFailure {
    pub fn value(&self) -> String {
        match *self {
            Self::Network => "network".to_string(),
            Self::Timeout => "timeout".to_string(),
            Self::Tls => "tls".to_string(),
            Self::Status(code) => format!("http {}", code),
            Self::Other => "other".to_string(),
        }
    }
}

/// Every failure a run can hit. The `Display` text of each variant is the
/// only thing ever written to the console or the log worksheet, so no variant
/// carries raw upstream text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Invalid Prompt (Empty or Blank)")]
    Validation,
    #[error("Authentication Error (Check API Keys)")]
    Auth,
    #[error("Rate Limit / Quota Exceeded")]
    RateLimited,
    #[error("Generation Service Busy (Model Loading)")]
    ServiceBusy,
    #[error("Network/Connection Error (Internet or DNS)")]
    Network,
    /// The connection was never established, so the request cannot have
    /// reached the server.
    #[error("Network/Connection Error (Internet or DNS)")]
    Unreachable,
    #[error("Operation Timed Out")]
    Timeout,
    #[error("API Response Error (Invalid Payload)")]
    InvalidResponse,
    #[error("Telegram Delivery Failed")]
    Delivery(DeliveryFailure),
    #[error("Google Sheets Connection Failed")]
    Sheets,
    #[error("Internal Error (Details hidden for security)")]
    Internal,
}

impl AppError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited
                | Self::ServiceBusy
                | Self::Network
                | Self::Unreachable
                | Self::Timeout
                | Self::Delivery(_)
                | Self::Sheets
        )
    }

    /// True when the failed request is known not to have been applied, so a
    /// non-idempotent write can be sent again.
    pub fn is_safe_to_resend(&self) -> bool {
        matches!(self, Self::Unreachable | Self::RateLimited)
    }
}

/// Anything that stops the process before a run can start.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("missing or malformed environment: {0}")]
    Env(#[from] envy::Error),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
    #[error("unreadable service account key: {0}")]
    KeyFile(#[from] std::io::Error),
    #[error("malformed service account key: {0}")]
    KeyFormat(#[from] serde_json::Error),
    #[error("failed to build http client")]
    Client(#[from] reqwest::Error),
    #[error("{0}")]
    Connect(#[from] AppError),
}
