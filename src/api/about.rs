// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Json;

use crate::models::AboutResponse;

#[utoipa::path(
    get,
    path = "/v1/about",
    tag = "About",
    responses((status = 200, body = AboutResponse))
)]
pub async fn about() -> Json<AboutResponse> {
    Json(AboutResponse {
        name: "Compliance Service".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        api_version: "v1".to_string(),
    })
}
