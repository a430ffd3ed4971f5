use std::time::{Duration, Instant};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::app::{
    errors::AppError,
    util::{reqwest::transport_error, time::current_time_in_secs},
};

use super::config::Config;

const SCOPES: &str = "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive.readonly";
const TOKEN_LIFETIME_SECS: u64 = 3600;
// refresh a little before Google expires the token
const TOKEN_MARGIN_SECS: u64 = 60;

pub struct GoogleClient {
    config: Config,
    http_client: reqwest::Client,
    token: RwLock<Option<AccessToken>>,
}

struct AccessToken {
    value: String,
    issued_at: Instant,
    lifetime: Duration,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        self.issued_at.elapsed() + Duration::from_secs(TOKEN_MARGIN_SECS) < self.lifetime
    }
}

impl GoogleClient {
    pub fn new(config: Config, http_client: reqwest::Client) -> GoogleClient {
        GoogleClient {
            config,
            http_client,
            token: RwLock::new(None),
        }
    }

    pub fn http_client(&self) -> &reqwest::Client {
        &self.http_client
    }

    /// Returns a cached bearer token, logging in again once it is close to expiry.
    pub async fn bearer(&self) -> Result<String, AppError> {
        {
            let token = self.token.read().await;
            if let Some(token) = token.as_ref().filter(|t| t.is_fresh()) {
                return Ok(token.value.clone());
            }
        }

        let mut token = self.token.write().await;

        if let Some(current) = token.as_ref().filter(|t| t.is_fresh()) {
            return Ok(current.value.clone());
        }

        let fresh = self.login().await?;
        let value = fresh.value.clone();
        *token = Some(fresh);

        Ok(value)
    }

    /// Attaches the bearer token, sends the request and maps non-success
    /// statuses onto the shared taxonomy.
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, AppError> {
        let bearer = self.bearer().await?;

        match request.bearer_auth(bearer).send().await {
            Ok(res) => match res.status() {
                status if status.is_success() => Ok(res),
                status => {
                    tracing::warn!("google api refused request: {}", status.as_u16());
                    Err(status_error(status))
                }
            },
            Err(e) => {
                let error = transport_error(&e);
                tracing::warn!("google api request failed: {}", error);
                Err(error)
            }
        }
    }

    async fn login(&self) -> Result<AccessToken, AppError> {
        let current_time = current_time_in_secs();

        let claims = serde_json::json!({
            "iss": self.config.client_email,
            "scope": SCOPES,
            "aud": self.config.token_uri,
            "exp": current_time + TOKEN_LIFETIME_SECS,
            "iat": current_time,
        });

        let Ok(encoding_key) = EncodingKey::from_rsa_pem(self.config.private_key.as_bytes()) else {
            tracing::error!("service account private key is not a valid RSA PEM");
            return Err(AppError::Auth);
        };

        let assertion = match encode(&Header::new(Algorithm::RS256), &claims, &encoding_key) {
            Ok(assertion) => assertion,
            Err(_) => {
                tracing::error!("failed to sign service account assertion");
                return Err(AppError::Auth);
            }
        };

        let result = self
            .http_client
            .post(&self.config.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await;

        match result {
            Ok(res) if res.status().is_success() => match res.json::<OAuthTokenResponse>().await {
                Ok(oauth) => {
                    tracing::debug!("logged in to google as {}", self.config.client_email);

                    Ok(AccessToken {
                        value: oauth.access_token,
                        issued_at: Instant::now(),
                        lifetime: Duration::from_secs(
                            oauth.expires_in.unwrap_or(TOKEN_LIFETIME_SECS),
                        ),
                    })
                }
                Err(_) => {
                    tracing::error!("google token response was not understood");
                    Err(AppError::InvalidResponse)
                }
            },
            Ok(res) => {
                tracing::error!("google token exchange refused: {}", res.status().as_u16());
                Err(match res.status() {
                    StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => AppError::Auth,
                    status => status_error(status),
                })
            }
            Err(e) => {
                let error = transport_error(&e);
                tracing::error!("google token exchange failed: {}", error);
                Err(error)
            }
        }
    }
}

fn status_error(status: StatusCode) -> AppError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Auth,
        StatusCode::TOO_MANY_REQUESTS => AppError::RateLimited,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => AppError::Timeout,
        _ => AppError::Sheets,
    }
}

#[derive(Debug, Deserialize)]
struct OAuthTokenResponse {
    access_token: String,
    expires_in: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_map_onto_taxonomy() {
        assert_eq!(status_error(StatusCode::FORBIDDEN), AppError::Auth);
        assert_eq!(status_error(StatusCode::TOO_MANY_REQUESTS), AppError::RateLimited);
        assert_eq!(status_error(StatusCode::NOT_FOUND), AppError::Sheets);
        assert_eq!(status_error(StatusCode::INTERNAL_SERVER_ERROR), AppError::Sheets);
    }

    #[test]
    fn token_goes_stale_before_expiry() {
        let token = AccessToken {
            value: "t".to_string(),
            issued_at: Instant::now(),
            lifetime: Duration::from_secs(TOKEN_MARGIN_SECS / 2),
        };
        assert!(!token.is_fresh());

        let token = AccessToken {
            value: "t".to_string(),
            issued_at: Instant::now(),
            lifetime: Duration::from_secs(TOKEN_LIFETIME_SECS),
        };
        assert!(token.is_fresh());
    }

    #[tokio::test]
    async fn malformed_private_key_is_an_auth_error() {
        let client = GoogleClient::new(
            Config {
                client_email: "relay@example.com".to_string(),
                private_key: "not a pem".to_string(),
                token_uri: "http://127.0.0.1:9/token".to_string(),
            },
            reqwest::Client::new(),
        );

        assert_eq!(client.bearer().await, Err(AppError::Auth));
    }
}
