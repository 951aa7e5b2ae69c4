// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! AML pre-screening endpoint.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    blockchain::{checksummed, parse_checksummed},
    error::{ApiError, ErrorBody, FieldErrors},
    models::{ScreeningAccepted, ScreeningRequest},
    screening::ScreeningJob,
    state::AppState,
};

fn required(field: &str, value: Option<String>, errors: &mut FieldErrors) -> Option<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Some(v),
        Some(_) => {
            errors.add(field, "This field may not be blank.");
            None
        }
        None => {
            errors.add(field, "This field is required.");
            None
        }
    }
}

/// Queue a pre-screening of a registered user's address.
///
/// The screening runs in the background; the response only confirms that
/// the job was queued.
#[utoipa::path(
    post,
    path = "/v1/aml/screening/{address}",
    params(("address" = String, Path, description = "EIP-55 checksummed address")),
    request_body = ScreeningRequest,
    tag = "Screening",
    responses(
        (status = 201, description = "Screening queued", body = ScreeningAccepted),
        (status = 400, description = "Validation failed", body = ErrorBody),
        (status = 422, description = "Malformed address", body = ErrorBody)
    )
)]
pub async fn request_screening(
    State(state): State<AppState>,
    Path(address): Path<String>,
    body: Result<Json<ScreeningRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ScreeningAccepted>), ApiError> {
    let address = parse_checksummed(&address)
        .map(|a| checksummed(&a))
        .map_err(|e| ApiError::unprocessable(e.to_string()))?;
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let mut errors = FieldErrors::new();
    let asset = required("asset", request.asset, &mut errors);
    let user_id = required("user_id", request.user_id, &mut errors);
    if !state
        .db
        .user_exists_by_address(&address)
        .map_err(ApiError::internal)?
    {
        errors.add("address", format!("User with address {address} does not exist"));
    }

    let (Some(asset), Some(user_id)) = (asset, user_id) else {
        return Err(ApiError::validation(errors));
    };
    if !errors.is_empty() {
        return Err(ApiError::validation(errors));
    }

    let job = ScreeningJob::new(
        address.clone(),
        asset.clone(),
        user_id,
        request.retry.unwrap_or(true),
    );
    let job_id = job.id.to_string();
    state
        .screening
        .enqueue(job)
        .await
        .map_err(ApiError::service_unavailable)?;

    Ok((
        StatusCode::CREATED,
        Json(ScreeningAccepted {
            job_id,
            address,
            asset,
            status: "QUEUED".to_string(),
        }),
    ))
}
