use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::{config::Config, error::AppError};

/// Verdict body returned by the verification service. Anything short of an
/// explicit `"success": true` counts as a rejection.
#[derive(Debug, Deserialize)]
pub struct VerifyResponse {
    #[serde(default)]
    pub success: bool,
}

/// Seam in front of the external bot-verification service.
#[async_trait]
pub trait BotVerifier: Send + Sync {
    async fn verify(&self, token: &str, source_ip: &str) -> Result<(), AppError>;
}

pub struct CaptchaClient {
    http: reqwest::Client,
    url: String,
    secret: String,
}

impl CaptchaClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            url: config.captcha_url.clone(),
            secret: config.captcha_secret.clone(),
        }
    }
}

#[async_trait]
impl BotVerifier for CaptchaClient {
    /// Fails closed: an unreachable service or an unreadable verdict denies
    /// the submission, same as an explicit rejection.
    async fn verify(&self, token: &str, source_ip: &str) -> Result<(), AppError> {
        if self.secret.is_empty() {
            return Err(AppError::Misconfigured("CAPTCHA_SECRET"));
        }

        let params = [
            ("secret", self.secret.as_str()),
            ("response", token),
            ("remoteip", source_ip),
        ];

        let response = match self.http.post(&self.url).form(&params).send().await {
            Ok(response) => response,
            Err(error) => {
                warn!("Verification service unreachable: {error}");
                return Err(AppError::CaptchaRejected);
            }
        };

        let verdict: VerifyResponse = match response.json().await {
            Ok(verdict) => verdict,
            Err(error) => {
                warn!("Unreadable verification verdict: {error}");
                return Err(AppError::CaptchaRejected);
            }
        };

        if verdict.success {
            Ok(())
        } else {
            Err(AppError::CaptchaRejected)
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    pub struct StubVerifier {
        pub allow: bool,
        pub calls: AtomicUsize,
    }

    impl StubVerifier {
        pub fn allowing() -> Self {
            Self {
                allow: true,
                calls: AtomicUsize::new(0),
            }
        }

        pub fn denying() -> Self {
            Self {
                allow: false,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl BotVerifier for StubVerifier {
        async fn verify(&self, _token: &str, _source_ip: &str) -> Result<(), AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if self.allow {
                Ok(())
            } else {
                Err(AppError::CaptchaRejected)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_success_is_the_only_allow() {
        let verdict: VerifyResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();

        assert!(verdict.success);
    }

    #[test]
    fn explicit_failure_denies() {
        let verdict: VerifyResponse = serde_json::from_str(r#"{"success":false}"#).unwrap();

        assert!(!verdict.success);
    }

    #[test]
    fn missing_success_field_denies() {
        let verdict: VerifyResponse = serde_json::from_str("{}").unwrap();

        assert!(!verdict.success);
    }

    #[test]
    fn unrelated_fields_do_not_sneak_an_allow() {
        let verdict: VerifyResponse =
            serde_json::from_str(r#"{"score":0.9,"hostname":"example.com"}"#).unwrap();

        assert!(!verdict.success);
    }
}
