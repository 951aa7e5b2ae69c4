// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::{ErrorBody, FieldErrors},
    models::{
        AboutResponse, ScreeningAccepted, ScreeningRequest, SignupRequest, SignupResponse,
    },
    state::AppState,
};

pub mod about;
pub mod health;
pub mod screening;
pub mod users;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/users/{address}", post(users::signup))
        .route(
            "/aml/screening/{address}",
            post(screening::request_screening),
        )
        .route("/about", get(about::about))
        .with_state(state.clone());

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .nest("/v1", v1_routes)
        .merge(health_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        users::signup,
        screening::request_screening,
        about::about,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            SignupRequest,
            SignupResponse,
            ScreeningRequest,
            ScreeningAccepted,
            AboutResponse,
            ErrorBody,
            FieldErrors,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Users", description = "KYC signup"),
        (name = "Screening", description = "AML address pre-screening"),
        (name = "About", description = "Service metadata"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
