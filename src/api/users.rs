// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signup endpoint.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::{
    blockchain::parse_checksummed,
    error::{ApiError, ErrorBody, FieldErrors, NON_FIELD_ERRORS},
    models::{SignupRequest, SignupResponse},
    signup::SignupError,
    state::AppState,
};

/// Sign up the owner of `address`.
///
/// Creates the user, registers an applicant with the identity provider and
/// returns the applicant together with an SDK token for the client.
#[utoipa::path(
    post,
    path = "/v1/users/{address}",
    params(("address" = String, Path, description = "EIP-55 checksummed address")),
    request_body = SignupRequest,
    tag = "Users",
    responses(
        (status = 201, description = "User created", body = SignupResponse),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 422, description = "Malformed address", body = ErrorBody),
        (status = 503, description = "Upstream unavailable", body = ErrorBody)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Path(address): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<SignupResponse>), ApiError> {
    // A malformed address wins over a malformed body
    parse_checksummed(&address).map_err(SignupError::from)?;
    let Json(body) = body.map_err(|e| {
        ApiError::validation(FieldErrors::single(
            NON_FIELD_ERRORS,
            format!("JSON parse error - {}", e.body_text()),
        ))
    })?;

    let response = state.signup.signup(&address, &body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}
