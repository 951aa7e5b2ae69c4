// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! All settings are read once at startup into [`AppConfig`] and handed to each
//! component through its constructor. Nothing below the `main` function reads
//! the process environment.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Directory holding the redb database | `./data` |
//! | `ETHEREUM_NODE_URL` | JSON-RPC endpoint used for balance lookups | `http://localhost:8545` |
//! | `MIN_SIGNUP_WEI_BALANCE` | Minimum balance (wei) required to sign up | `10000000000000000` |
//! | `DISABLED_COUNTRIES` | Comma-separated ISO3 codes seeded as disabled | empty |
//! | `IDENTITY_BASE_URL` | Identity verification provider base URL | `https://api.onfido.com` |
//! | `IDENTITY_API_TOKEN` | Identity verification provider token | Required unless test client |
//! | `IDENTITY_TEST_CLIENT` | Use the deterministic identity client | `false` |
//! | `IDENTITY_SDK_REFERRER` | Referrer pattern bound to SDK tokens | `*://*/*` |
//! | `AML_BASE_URL` | Address screening provider base URL | `https://api.chainalysis.com/api/kyt/v1` |
//! | `AML_API_TOKEN` | Address screening provider token | empty |
//! | `RECAPTCHA_ENABLED` | Require a reCAPTCHA token on signup | `false` |
//! | `RECAPTCHA_SECRET` | reCAPTCHA server secret | Required when enabled |
//! | `RECAPTCHA_VERIFY_URL` | reCAPTCHA verification endpoint | Google siteverify |
//! | `SCREENING_MAX_ATTEMPTS` | Provider attempts per screening job when retrying | `4` |
//! | `SCREENING_RETRY_DELAY_SECS` | Delay before a failed job is re-enqueued | `5` |
//! | `SCREENING_LOCK_TIMEOUT_SECS` | Lease hold timeout for the per-address lock | `120` |
//! | `SCREENING_LOCK_WAIT_MS` | How long a job waits for the lock | `1000` |
//! | `SCREENING_WORKERS` | Concurrent screening jobs | `4` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{path::PathBuf, str::FromStr, time::Duration};

use alloy::primitives::U256;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
/// Environment variable name for the database directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";
pub const ETHEREUM_NODE_URL_ENV: &str = "ETHEREUM_NODE_URL";
pub const MIN_SIGNUP_WEI_BALANCE_ENV: &str = "MIN_SIGNUP_WEI_BALANCE";
pub const DISABLED_COUNTRIES_ENV: &str = "DISABLED_COUNTRIES";
pub const IDENTITY_BASE_URL_ENV: &str = "IDENTITY_BASE_URL";
pub const IDENTITY_API_TOKEN_ENV: &str = "IDENTITY_API_TOKEN";
pub const IDENTITY_TEST_CLIENT_ENV: &str = "IDENTITY_TEST_CLIENT";
pub const IDENTITY_SDK_REFERRER_ENV: &str = "IDENTITY_SDK_REFERRER";
pub const AML_BASE_URL_ENV: &str = "AML_BASE_URL";
pub const AML_API_TOKEN_ENV: &str = "AML_API_TOKEN";
pub const RECAPTCHA_ENABLED_ENV: &str = "RECAPTCHA_ENABLED";
pub const RECAPTCHA_SECRET_ENV: &str = "RECAPTCHA_SECRET";
pub const RECAPTCHA_VERIFY_URL_ENV: &str = "RECAPTCHA_VERIFY_URL";
pub const SCREENING_MAX_ATTEMPTS_ENV: &str = "SCREENING_MAX_ATTEMPTS";
pub const SCREENING_RETRY_DELAY_ENV: &str = "SCREENING_RETRY_DELAY_SECS";
pub const SCREENING_LOCK_TIMEOUT_ENV: &str = "SCREENING_LOCK_TIMEOUT_SECS";
pub const SCREENING_LOCK_WAIT_ENV: &str = "SCREENING_LOCK_WAIT_MS";
pub const SCREENING_WORKERS_ENV: &str = "SCREENING_WORKERS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_ETHEREUM_NODE_URL: &str = "http://localhost:8545";
/// 0.01 ETH.
const DEFAULT_MIN_SIGNUP_WEI_BALANCE: u64 = 10_000_000_000_000_000;
const DEFAULT_IDENTITY_BASE_URL: &str = "https://api.onfido.com";
const DEFAULT_SDK_REFERRER: &str = "*://*/*";
const DEFAULT_AML_BASE_URL: &str = "https://api.chainalysis.com/api/kyt/v1";
const DEFAULT_RECAPTCHA_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";
const DEFAULT_SCREENING_MAX_ATTEMPTS: u32 = 4;
const DEFAULT_SCREENING_RETRY_DELAY_SECS: u64 = 5;
/// Two minutes, in case a worker hangs while holding the lock.
const DEFAULT_SCREENING_LOCK_TIMEOUT_SECS: u64 = 120;
const DEFAULT_SCREENING_LOCK_WAIT_MS: u64 = 1000;
const DEFAULT_SCREENING_WORKERS: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Settings consumed by the signup validator and orchestrator.
#[derive(Debug, Clone)]
pub struct SignupConfig {
    /// Minimum on-chain balance (wei). Balance equal to the threshold passes.
    pub min_balance_wei: U256,
    /// Referrer pattern the identity provider binds SDK tokens to.
    pub sdk_referrer: String,
}

#[derive(Debug, Clone)]
pub struct IdentityProviderConfig {
    pub base_url: String,
    pub api_token: String,
    /// Swap the HTTP client for the deterministic in-process one.
    pub use_test_client: bool,
}

#[derive(Debug, Clone)]
pub struct ScreeningProviderConfig {
    pub base_url: String,
    pub api_token: String,
}

#[derive(Debug, Clone)]
pub struct RecaptchaConfig {
    pub enabled: bool,
    pub secret: String,
    pub verify_url: String,
}

/// Retry and locking policy for the screening task runner.
#[derive(Debug, Clone)]
pub struct ScreeningTaskConfig {
    /// Total number of provider calls per job when retry is requested.
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub lock_timeout: Duration,
    pub lock_wait: Duration,
    pub workers: usize,
}

impl Default for ScreeningTaskConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_SCREENING_MAX_ATTEMPTS,
            retry_delay: Duration::from_secs(DEFAULT_SCREENING_RETRY_DELAY_SECS),
            lock_timeout: Duration::from_secs(DEFAULT_SCREENING_LOCK_TIMEOUT_SECS),
            lock_wait: Duration::from_millis(DEFAULT_SCREENING_LOCK_WAIT_MS),
            workers: DEFAULT_SCREENING_WORKERS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub ethereum_node_url: String,
    pub disabled_countries: Vec<String>,
    pub signup: SignupConfig,
    pub identity: IdentityProviderConfig,
    pub screening_provider: ScreeningProviderConfig,
    pub recaptcha: RecaptchaConfig,
    pub screening_tasks: ScreeningTaskConfig,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };

        let use_test_client = vars.parse_bool(IDENTITY_TEST_CLIENT_ENV, false)?;
        let identity_token = vars.optional(IDENTITY_API_TOKEN_ENV);
        let identity_token = match (identity_token, use_test_client) {
            (Some(token), _) => token,
            (None, true) => String::new(),
            (None, false) => return Err(ConfigError::Missing(IDENTITY_API_TOKEN_ENV)),
        };

        let recaptcha_enabled = vars.parse_bool(RECAPTCHA_ENABLED_ENV, false)?;
        let recaptcha_secret = vars.optional(RECAPTCHA_SECRET_ENV).unwrap_or_default();
        if recaptcha_enabled && recaptcha_secret.is_empty() {
            return Err(ConfigError::Missing(RECAPTCHA_SECRET_ENV));
        }

        let min_balance_wei = match vars.optional(MIN_SIGNUP_WEI_BALANCE_ENV) {
            Some(raw) => U256::from_str(&raw).map_err(|_| ConfigError::Invalid {
                name: MIN_SIGNUP_WEI_BALANCE_ENV,
                value: raw,
            })?,
            None => U256::from(DEFAULT_MIN_SIGNUP_WEI_BALANCE),
        };

        let max_attempts: u32 =
            vars.parse(SCREENING_MAX_ATTEMPTS_ENV, DEFAULT_SCREENING_MAX_ATTEMPTS)?;
        if max_attempts == 0 {
            return Err(ConfigError::Invalid {
                name: SCREENING_MAX_ATTEMPTS_ENV,
                value: "0".to_string(),
            });
        }
        let workers: usize = vars.parse(SCREENING_WORKERS_ENV, DEFAULT_SCREENING_WORKERS)?;

        let log_format = match vars.optional(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            host: vars.or_default(HOST_ENV, DEFAULT_HOST),
            port: vars.parse(PORT_ENV, DEFAULT_PORT)?,
            data_dir: PathBuf::from(vars.or_default(DATA_DIR_ENV, DEFAULT_DATA_DIR)),
            ethereum_node_url: vars.or_default(ETHEREUM_NODE_URL_ENV, DEFAULT_ETHEREUM_NODE_URL),
            disabled_countries: vars
                .optional(DISABLED_COUNTRIES_ENV)
                .map(|raw| parse_code_list(&raw))
                .unwrap_or_default(),
            signup: SignupConfig {
                min_balance_wei,
                sdk_referrer: vars.or_default(IDENTITY_SDK_REFERRER_ENV, DEFAULT_SDK_REFERRER),
            },
            identity: IdentityProviderConfig {
                base_url: vars.or_default(IDENTITY_BASE_URL_ENV, DEFAULT_IDENTITY_BASE_URL),
                api_token: identity_token,
                use_test_client,
            },
            screening_provider: ScreeningProviderConfig {
                base_url: vars.or_default(AML_BASE_URL_ENV, DEFAULT_AML_BASE_URL),
                api_token: vars.optional(AML_API_TOKEN_ENV).unwrap_or_default(),
            },
            recaptcha: RecaptchaConfig {
                enabled: recaptcha_enabled,
                secret: recaptcha_secret,
                verify_url: vars.or_default(RECAPTCHA_VERIFY_URL_ENV, DEFAULT_RECAPTCHA_VERIFY_URL),
            },
            screening_tasks: ScreeningTaskConfig {
                max_attempts,
                retry_delay: Duration::from_secs(
                    vars.parse(SCREENING_RETRY_DELAY_ENV, DEFAULT_SCREENING_RETRY_DELAY_SECS)?,
                ),
                lock_timeout: Duration::from_secs(
                    vars.parse(SCREENING_LOCK_TIMEOUT_ENV, DEFAULT_SCREENING_LOCK_TIMEOUT_SECS)?,
                ),
                lock_wait: Duration::from_millis(
                    vars.parse(SCREENING_LOCK_WAIT_ENV, DEFAULT_SCREENING_LOCK_WAIT_MS)?,
                ),
                workers: workers.max(1),
            },
            log_format,
        })
    }

    /// Path of the redb database file inside the data directory.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("compliance.redb")
    }
}

struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, name: &str) -> Option<String> {
        (self.lookup)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn or_default(&self, name: &str, default: &str) -> String {
        self.optional(name).unwrap_or_else(|| default.to_string())
    }

    fn parse<T: FromStr>(&self, name: &'static str, default: T) -> Result<T, ConfigError> {
        match self.optional(name) {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value: raw }),
            None => Ok(default),
        }
    }

    fn parse_bool(&self, name: &'static str, default: bool) -> Result<bool, ConfigError> {
        match self.optional(name) {
            Some(raw) => match raw.to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(ConfigError::Invalid { name, value: raw }),
            },
            None => Ok(default),
        }
    }
}

fn parse_code_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|code| code.trim().to_ascii_uppercase())
        .filter(|code| !code.is_empty())
        .collect()
}
