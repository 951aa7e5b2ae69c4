// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{net::SocketAddr, process::ExitCode, sync::Arc};

use compliance_server::{
    api::router,
    blockchain::{ChainClient, ChainClientError},
    config::{AppConfig, ConfigError},
    providers::{
        identity_client_from_config, CaptchaVerifier, ChainalysisClient, IdentityError,
        RecaptchaVerifier, ScreeningError,
    },
    screening::{LockManager, ScreeningRunner},
    signup::{SignupService, SignupValidator},
    state::AppState,
    storage::{seed_countries, ComplianceDatabase, DbError},
    telemetry::init_tracing,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("database: {0}")]
    Database(#[from] DbError),

    #[error("balance oracle: {0}")]
    Chain(#[from] ChainClientError),

    #[error("identity provider: {0}")]
    Identity(#[from] IdentityError),

    #[error("screening provider: {0}")]
    Screening(#[from] ScreeningError),

    #[error("reCAPTCHA client: {0}")]
    Recaptcha(#[from] reqwest::Error),

    #[error("invalid bind address: {0}")]
    BindAddress(#[from] std::net::AddrParseError),

    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Compliance server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    let db = Arc::new(ComplianceDatabase::open(&config.database_path())?);
    db.seed_countries(&seed_countries(&config.disabled_countries))?;

    let oracle = Arc::new(ChainClient::new(&config.ethereum_node_url)?);
    let captcha: Option<Arc<dyn CaptchaVerifier>> = if config.recaptcha.enabled {
        Some(Arc::new(RecaptchaVerifier::new(&config.recaptcha)?))
    } else {
        None
    };
    let validator =
        SignupValidator::new(db.clone(), oracle, captcha, config.signup.min_balance_wei);
    let identity = identity_client_from_config(&config.identity)?;
    let signup = SignupService::new(
        db.clone(),
        validator,
        identity,
        config.signup.sdk_referrer.clone(),
    );

    let screening_client = Arc::new(ChainalysisClient::new(&config.screening_provider)?);
    let (runner, queue) = ScreeningRunner::new(
        screening_client,
        LockManager::new(),
        config.screening_tasks.clone(),
        None,
    );

    let shutdown = CancellationToken::new();
    let runner_handle = tokio::spawn(runner.run(shutdown.clone()));
    tokio::spawn(shutdown_signal(shutdown.clone()));

    let app = router(AppState::new(db, signup, queue));
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    info!(%addr, "Compliance server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.clone().cancelled_owned())
        .await?;

    shutdown.cancel();
    let _ = runner_handle.await;
    info!("Compliance server stopped");
    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown"),
        _ = terminate => info!("Received terminate signal, initiating graceful shutdown"),
        _ = shutdown.cancelled() => {}
    }
    shutdown.cancel();
}
