// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signup workflow: validate, persist, register with the identity provider.
//!
//! The user row and both identity provider calls share one
//! [`SignupTransaction`](crate::storage::SignupTransaction). Any failure after
//! the insert drops the transaction, so the row never becomes visible.
//! Provider calls that already succeeded are not undone; an applicant created
//! before a failing SDK token call stays orphaned at the provider.

use std::sync::Arc;

use serde_json::Value;
use tracing::{info, warn};

use crate::{
    blockchain::{checksummed, parse_checksummed, AddressError},
    error::{ApiError, FieldErrors, NON_FIELD_ERRORS},
    models::{SignupResponse, User},
    providers::{ApplicantRequest, IdentityError, IdentityVerificationClient},
    signup::validator::{SignupValidator, ValidationFailure},
    storage::{ComplianceDatabase, DbError},
};

#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error("malformed address: {0}")]
    MalformedAddress(#[from] AddressError),

    #[error("signup validation failed")]
    Validation(FieldErrors),

    /// A concurrent signup claimed the same value after validation passed.
    #[error("unique constraint violated on {field}")]
    Conflict { field: &'static str },

    #[error("identity provider rejected signup: {0}")]
    ProviderRejected(IdentityError),

    #[error("upstream dependency unavailable: {0}")]
    Unavailable(String),

    #[error("storage error: {0}")]
    Storage(DbError),
}

impl From<ValidationFailure> for SignupError {
    fn from(failure: ValidationFailure) -> Self {
        match failure {
            ValidationFailure::Fields(errors) => SignupError::Validation(errors),
            ValidationFailure::Oracle(e) => SignupError::Unavailable(e.to_string()),
            ValidationFailure::Storage(e) => SignupError::from(e),
        }
    }
}

impl From<DbError> for SignupError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Conflict { field } => SignupError::Conflict { field },
            other => SignupError::Storage(other),
        }
    }
}

impl From<IdentityError> for SignupError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Rejected { .. } => SignupError::ProviderRejected(err),
            other => SignupError::Unavailable(other.to_string()),
        }
    }
}

impl From<SignupError> for ApiError {
    fn from(err: SignupError) -> Self {
        match err {
            SignupError::MalformedAddress(e) => ApiError::unprocessable(e.to_string()),
            SignupError::Validation(errors) => ApiError::validation(errors),
            SignupError::Conflict { field } => ApiError::validation(FieldErrors::single(
                field,
                format!("A user with this {field} already exists."),
            )),
            SignupError::ProviderRejected(e) => {
                ApiError::validation(FieldErrors::single(NON_FIELD_ERRORS, e.client_message()))
            }
            SignupError::Unavailable(detail) => ApiError::service_unavailable(detail),
            SignupError::Storage(e) => ApiError::internal(e),
        }
    }
}

pub struct SignupService {
    db: Arc<ComplianceDatabase>,
    validator: SignupValidator,
    identity: Arc<dyn IdentityVerificationClient>,
    sdk_referrer: String,
}

impl SignupService {
    pub fn new(
        db: Arc<ComplianceDatabase>,
        validator: SignupValidator,
        identity: Arc<dyn IdentityVerificationClient>,
        sdk_referrer: impl Into<String>,
    ) -> Self {
        Self {
            db,
            validator,
            identity,
            sdk_referrer: sdk_referrer.into(),
        }
    }

    /// Run a complete signup for the address taken from the request path.
    ///
    /// `body` is the raw JSON request body; its shape is checked by the
    /// validator so that every problem is reported per field.
    pub async fn signup(
        &self,
        raw_address: &str,
        body: &Value,
    ) -> Result<SignupResponse, SignupError> {
        let address = parse_checksummed(raw_address)?;
        let validated = self.validator.validate(address, body).await?;

        let applicant_request = ApplicantRequest {
            first_name: validated.name.clone(),
            last_name: validated.lastname.clone(),
            date_of_birth: validated.date_of_birth,
        };
        let user = User::new_pending(
            checksummed(&validated.address),
            validated.email,
            validated.name,
            validated.lastname,
            &validated.country,
        );

        let mut txn = self.db.begin_signup();
        txn.insert_user(user)?;

        let applicant = self.identity.create_applicant(&applicant_request).await?;
        let sdk_token = match self
            .identity
            .get_sdk_token(&applicant.id, &self.sdk_referrer)
            .await
        {
            Ok(token) => token,
            Err(e) => {
                warn!(
                    applicant_id = %applicant.id,
                    error = %e,
                    "SDK token request failed; applicant left orphaned at provider"
                );
                return Err(e.into());
            }
        };

        let user = txn.commit()?;
        info!(
            address = %user.address,
            applicant_id = %applicant.id,
            country = %user.country,
            "User signed up"
        );

        Ok(SignupResponse {
            applicant: applicant.data,
            sdk_token,
        })
    }
}
