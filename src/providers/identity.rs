// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity verification provider (Onfido-style API).
//!
//! Two implementations of [`IdentityVerificationClient`] exist: the HTTP
//! [`OnfidoClient`] and the in-process [`DummyIdentityClient`]. Which one is
//! used is decided once from [`IdentityProviderConfig`].

use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::config::IdentityProviderConfig;

const APPLICANTS_PATH: &str = "/v3/applicants/";
const SDK_TOKEN_PATH: &str = "/v3/sdk_token";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Fields forwarded to the provider when creating an applicant.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ApplicantRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "dob", skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
}

/// Provider-side applicant. `data` is the provider's JSON record verbatim.
#[derive(Debug, Clone)]
pub struct Applicant {
    pub id: String,
    pub data: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The provider answered with an unexpected status. `detail` is kept for
    /// logs only and never returned to API callers.
    #[error("identity provider rejected request with status {status}")]
    Rejected { status: u16, detail: Value },

    #[error("identity provider request failed: {0}")]
    Request(String),

    #[error("identity provider response was invalid: {0}")]
    InvalidResponse(String),
}

impl IdentityError {
    /// Caller-facing text for a rejection. Provider detail is suppressed.
    pub fn client_message(&self) -> &'static str {
        match self {
            IdentityError::Rejected { detail, .. } if is_validation_error(detail) => {
                "Identity provider rejected the request due to invalid incoming data or SDK settings"
            }
            IdentityError::Rejected { .. } => "Identity provider rejected the request",
            IdentityError::Request(_) | IdentityError::InvalidResponse(_) => {
                "Identity provider unavailable"
            }
        }
    }
}

fn is_validation_error(detail: &Value) -> bool {
    detail
        .pointer("/error/type")
        .and_then(Value::as_str)
        .is_some_and(|kind| kind == "validation_error")
}

#[async_trait]
pub trait IdentityVerificationClient: Send + Sync {
    async fn create_applicant(&self, request: &ApplicantRequest)
        -> Result<Applicant, IdentityError>;

    /// Issue an SDK token bound to `applicant_id` and `referrer`.
    async fn get_sdk_token(&self, applicant_id: &str, referrer: &str)
        -> Result<String, IdentityError>;
}

/// Build the client selected by configuration.
pub fn identity_client_from_config(
    config: &IdentityProviderConfig,
) -> Result<Arc<dyn IdentityVerificationClient>, IdentityError> {
    if config.use_test_client {
        info!("Using deterministic identity verification client");
        return Ok(Arc::new(DummyIdentityClient::default()));
    }
    Ok(Arc::new(OnfidoClient::new(
        &config.base_url,
        &config.api_token,
    )?))
}

// =============================================================================
// HTTP client
// =============================================================================

#[derive(Debug, Clone)]
pub struct OnfidoClient {
    base_url: String,
    api_token: String,
    http: Client,
}

impl OnfidoClient {
    pub fn new(base_url: &str, api_token: &str) -> Result<Self, IdentityError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| IdentityError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
            http,
        })
    }

    async fn post_json(
        &self,
        path: &str,
        payload: &Value,
        expected: StatusCode,
    ) -> Result<Value, IdentityError> {
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Token token={}", self.api_token))
            .json(payload)
            .send()
            .await
            .map_err(|e| IdentityError::Request(format!("POST {path} failed: {e}")))?;

        let status = response.status();
        if status != expected {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str(&body).unwrap_or(Value::String(body));
            warn!(path, status = status.as_u16(), detail = %detail, "Identity provider rejected request");
            return Err(IdentityError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        response
            .json()
            .await
            .map_err(|e| IdentityError::InvalidResponse(format!("POST {path} invalid JSON: {e}")))
    }
}

#[async_trait]
impl IdentityVerificationClient for OnfidoClient {
    async fn create_applicant(
        &self,
        request: &ApplicantRequest,
    ) -> Result<Applicant, IdentityError> {
        let payload = serde_json::to_value(request)
            .map_err(|e| IdentityError::InvalidResponse(format!("serialize body failed: {e}")))?;
        let data = self
            .post_json(APPLICANTS_PATH, &payload, StatusCode::CREATED)
            .await?;

        let id = data
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                IdentityError::InvalidResponse("missing applicant id in response".to_string())
            })?
            .to_string();

        info!(applicant_id = %id, "Identity applicant created");
        Ok(Applicant { id, data })
    }

    async fn get_sdk_token(
        &self,
        applicant_id: &str,
        referrer: &str,
    ) -> Result<String, IdentityError> {
        let payload = json!({
            "applicant_id": applicant_id,
            "referrer": referrer,
        });
        let response = self
            .post_json(SDK_TOKEN_PATH, &payload, StatusCode::OK)
            .await?;

        response
            .get("token")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .ok_or_else(|| IdentityError::InvalidResponse("missing token in response".to_string()))
    }
}

// =============================================================================
// Deterministic client
// =============================================================================

/// In-process stand-in that never calls the network.
///
/// Applicant ids are sequential (`DUMMY00001`, ...) and tokens derive from
/// the id, so repeated runs produce the same values.
#[derive(Debug, Default)]
pub struct DummyIdentityClient {
    next_id: AtomicU64,
}

#[async_trait]
impl IdentityVerificationClient for DummyIdentityClient {
    async fn create_applicant(
        &self,
        request: &ApplicantRequest,
    ) -> Result<Applicant, IdentityError> {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        let id = format!("DUMMY{n:05}");
        let data = json!({
            "id": id,
            "first_name": request.first_name,
            "last_name": request.last_name,
            "created_at": Utc::now().to_rfc3339(),
        });
        Ok(Applicant { id, data })
    }

    async fn get_sdk_token(
        &self,
        applicant_id: &str,
        _referrer: &str,
    ) -> Result<String, IdentityError> {
        Ok(format!("sdk-{applicant_id}"))
    }
}
