// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Domain and API Data Models
//!
//! Persisted entities ([`Country`], [`User`]) and the request/response bodies
//! of the REST API. All API types derive `ToSchema` for the OpenAPI document.
//!
//! Addresses are stored in their EIP-55 checksummed form; see
//! [`crate::blockchain::parse_checksummed`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Reference country entry. Seeded at startup, never created by signup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Country {
    pub name: String,
    /// ISO 3166-1 alpha-2, primary key.
    pub iso2: String,
    /// ISO 3166-1 alpha-3, used in API input.
    pub iso3: String,
    pub numeric: u16,
    /// Only users from enabled countries may sign up.
    pub is_enabled: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationStatus {
    Pending,
    Frozen,
    Failed,
    Verified,
    Onboarding,
}

/// User record created by a successful signup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct User {
    /// Checksummed chain address, unique and immutable.
    pub address: String,
    /// Unique (case-insensitive) email.
    pub email: String,
    pub name: String,
    pub lastname: String,
    /// ISO2 key of the user's country.
    pub country: String,
    /// Set by downstream risk assessment, never by signup.
    pub risk_score: Option<u16>,
    pub verification_status: VerificationStatus,
    pub is_source_of_funds_verified: bool,
    pub is_dormant: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl User {
    /// A fresh record in its initial verification state.
    pub fn new_pending(
        address: String,
        email: String,
        name: String,
        lastname: String,
        country: &Country,
    ) -> Self {
        let now = Utc::now();
        Self {
            address,
            email,
            name,
            lastname,
            country: country.iso2.clone(),
            risk_score: None,
            verification_status: VerificationStatus::Pending,
            is_source_of_funds_verified: false,
            is_dormant: false,
            created_at: now,
            modified_at: now,
        }
    }
}

/// Body of `POST /v1/users/{address}`.
///
/// Documents the wire shape. The handler reads the body as a raw JSON object
/// so that missing fields and wrongly typed values are reported per field,
/// together with every other validation failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SignupRequest {
    /// ISO3 country code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    /// `YYYY-MM-DD`. Forwarded to the identity provider when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    /// reCAPTCHA response token; required only when captcha is enabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recaptcha: Option<String>,
}

/// Response of a successful signup.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
    /// Applicant record as returned by the identity provider.
    #[schema(value_type = Object)]
    pub applicant: Value,
    /// Short-lived token for the client-side verification SDK.
    pub sdk_token: String,
}

/// Body of `POST /v1/aml/screening/{address}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ScreeningRequest {
    /// Asset symbol, e.g. `ETH` or `DAI`.
    #[serde(default)]
    pub asset: Option<String>,
    /// Identifier of the user at the screening provider.
    #[serde(default)]
    pub user_id: Option<String>,
    /// Retry on provider failure (default true).
    #[serde(default)]
    pub retry: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScreeningAccepted {
    pub job_id: String,
    pub address: String,
    pub asset: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AboutResponse {
    pub name: String,
    pub version: String,
    pub api_version: String,
}
