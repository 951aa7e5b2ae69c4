// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Address screening provider (Chainalysis KYT withdrawal pre-screening).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::config::ScreeningProviderConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// One verdict entry of a pre-screening response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrescreeningRecord {
    pub asset: String,
    pub address: String,
    #[serde(default)]
    pub rating: Option<String>,
    #[serde(default)]
    pub cluster: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum ScreeningError {
    /// Non-200 answer, or no answer at all (`status` is `None`).
    #[error("screening request failed (status {status:?}): {detail}")]
    FailedRequest { status: Option<u16>, detail: String },

    #[error("screening response was invalid: {0}")]
    InvalidResponse(String),
}

impl ScreeningError {
    /// Whether the runner may retry this failure.
    pub fn is_failed_request(&self) -> bool {
        matches!(self, ScreeningError::FailedRequest { .. })
    }
}

#[async_trait]
pub trait AddressScreeningClient: Send + Sync {
    async fn post_prescreening(
        &self,
        address: &str,
        asset: &str,
        user_id: &str,
    ) -> Result<Vec<PrescreeningRecord>, ScreeningError>;
}

#[derive(Debug, Clone)]
pub struct ChainalysisClient {
    base_url: String,
    api_token: String,
    http: Client,
}

impl ChainalysisClient {
    pub fn new(config: &ScreeningProviderConfig) -> Result<Self, ScreeningError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ScreeningError::FailedRequest {
                status: None,
                detail: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            http,
        })
    }
}

#[async_trait]
impl AddressScreeningClient for ChainalysisClient {
    async fn post_prescreening(
        &self,
        address: &str,
        asset: &str,
        user_id: &str,
    ) -> Result<Vec<PrescreeningRecord>, ScreeningError> {
        let url = format!("{}/users/{}/withdrawaladdresses/", self.base_url, user_id);
        let payload = json!([{ "asset": asset, "address": address }]);

        let response = self
            .http
            .post(&url)
            .header("Token", &self.api_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ScreeningError::FailedRequest {
                status: None,
                detail: e.to_string(),
            })?;

        // Only 200 is documented as success; 201/202 are failures too.
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ScreeningError::FailedRequest {
                status: Some(status.as_u16()),
                detail: body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ScreeningError::InvalidResponse(e.to_string()))
    }
}
