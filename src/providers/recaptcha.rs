// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! reCAPTCHA server-side token verification.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

use crate::config::RecaptchaConfig;

#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    /// `true` only when the provider positively confirms the token.
    async fn validate(&self, token: &str) -> bool;
}

#[derive(Debug, Deserialize)]
struct SiteVerifyResponse {
    #[serde(default)]
    success: bool,
}

#[derive(Debug, Clone)]
pub struct RecaptchaVerifier {
    secret: String,
    verify_url: String,
    http: Client,
}

impl RecaptchaVerifier {
    pub fn new(config: &RecaptchaConfig) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            secret: config.secret.clone(),
            verify_url: config.verify_url.clone(),
            http,
        })
    }
}

#[async_trait]
impl CaptchaVerifier for RecaptchaVerifier {
    async fn validate(&self, token: &str) -> bool {
        let response = self
            .http
            .post(&self.verify_url)
            .form(&[("secret", self.secret.as_str()), ("response", token)])
            .send()
            .await;

        let response = match response {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                warn!(status = r.status().as_u16(), "reCAPTCHA verification returned error status");
                return false;
            }
            Err(e) => {
                warn!(error = %e, "reCAPTCHA verification request failed");
                return false;
            }
        };

        match response.json::<SiteVerifyResponse>().await {
            Ok(body) => body.success,
            Err(e) => {
                warn!(error = %e, "reCAPTCHA verification response was invalid");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn verifier_for(server: &MockServer) -> RecaptchaVerifier {
        RecaptchaVerifier::new(&RecaptchaConfig {
            enabled: true,
            secret: "shh".to_string(),
            verify_url: format!("{}/siteverify", server.uri()),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn accepts_confirmed_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("secret=shh"))
            .and(body_string_contains("response=good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
            .mount(&server)
            .await;

        assert!(verifier_for(&server).validate("good").await);
    }

    #[tokio::test]
    async fn rejects_unconfirmed_or_failed_checks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("response=bad"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("response=boom"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let verifier = verifier_for(&server);
        assert!(!verifier.validate("bad").await);
        assert!(!verifier.validate("boom").await);
    }
}
