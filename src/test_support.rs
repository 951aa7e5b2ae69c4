// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Deterministic fakes shared by unit tests.

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use serde_json::json;

use crate::{
    blockchain::{BalanceOracle, ChainClientError},
    providers::{
        AddressScreeningClient, Applicant, ApplicantRequest, CaptchaVerifier, IdentityError,
        IdentityVerificationClient, PrescreeningRecord, ScreeningError,
    },
    storage::{seed_countries, ComplianceDatabase},
};

/// EIP-55 reference address.
pub const ADDRESS: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";
pub const OTHER_ADDRESS: &str = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

pub fn temp_db() -> (Arc<ComplianceDatabase>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = ComplianceDatabase::open(&dir.path().join("test.redb")).unwrap();
    db.seed_countries(&seed_countries(&["PRK".to_string()]))
        .unwrap();
    (Arc::new(db), dir)
}

// =============================================================================
// Balance oracle
// =============================================================================

pub struct FakeBalanceOracle {
    default: U256,
    balances: Mutex<HashMap<Address, U256>>,
    unreachable: bool,
    calls: AtomicUsize,
}

impl FakeBalanceOracle {
    pub fn with_default(default: U256) -> Self {
        Self {
            default,
            balances: Mutex::new(HashMap::new()),
            unreachable: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::with_default(U256::ZERO)
        }
    }

    pub fn set(&self, address: Address, balance: U256) {
        self.balances.lock().unwrap().insert(address, balance);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BalanceOracle for FakeBalanceOracle {
    async fn get_balance(&self, address: Address) -> Result<U256, ChainClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable {
            return Err(ChainClientError::RpcError("connection refused".to_string()));
        }
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(&address)
            .copied()
            .unwrap_or(self.default))
    }
}

// =============================================================================
// Identity provider
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityBehavior {
    Succeed,
    RejectApplicant,
    RejectSdkToken,
    Unreachable,
}

pub struct FakeIdentityClient {
    behavior: Mutex<IdentityBehavior>,
    applicants: AtomicUsize,
    tokens: AtomicUsize,
}

impl FakeIdentityClient {
    pub fn new(behavior: IdentityBehavior) -> Self {
        Self {
            behavior: Mutex::new(behavior),
            applicants: AtomicUsize::new(0),
            tokens: AtomicUsize::new(0),
        }
    }

    pub fn set_behavior(&self, behavior: IdentityBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    pub fn applicant_calls(&self) -> usize {
        self.applicants.load(Ordering::SeqCst)
    }

    pub fn token_calls(&self) -> usize {
        self.tokens.load(Ordering::SeqCst)
    }

    fn behavior(&self) -> IdentityBehavior {
        *self.behavior.lock().unwrap()
    }
}

fn validation_rejection() -> IdentityError {
    IdentityError::Rejected {
        status: 422,
        detail: json!({"error": {"type": "validation_error", "message": "bad dob"}}),
    }
}

#[async_trait]
impl IdentityVerificationClient for FakeIdentityClient {
    async fn create_applicant(
        &self,
        request: &ApplicantRequest,
    ) -> Result<Applicant, IdentityError> {
        let n = self.applicants.fetch_add(1, Ordering::SeqCst) + 1;
        match self.behavior() {
            IdentityBehavior::RejectApplicant => Err(validation_rejection()),
            IdentityBehavior::Unreachable => Err(IdentityError::Request("timed out".to_string())),
            _ => {
                let id = format!("applicant-{n}");
                Ok(Applicant {
                    data: json!({
                        "id": id,
                        "first_name": request.first_name,
                        "last_name": request.last_name,
                    }),
                    id,
                })
            }
        }
    }

    async fn get_sdk_token(
        &self,
        applicant_id: &str,
        _referrer: &str,
    ) -> Result<String, IdentityError> {
        self.tokens.fetch_add(1, Ordering::SeqCst);
        match self.behavior() {
            IdentityBehavior::RejectSdkToken => Err(validation_rejection()),
            IdentityBehavior::Unreachable => Err(IdentityError::Request("timed out".to_string())),
            _ => Ok(format!("token-{applicant_id}")),
        }
    }
}

// =============================================================================
// Screening provider
// =============================================================================

/// Screening client answering from a script, then with `fallback`.
pub struct FakeScreeningClient {
    script: Mutex<VecDeque<Option<u16>>>,
    /// `None` = succeed, `Some(status)` = fail with that status.
    fallback: Option<u16>,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeScreeningClient {
    pub fn succeeding() -> Self {
        Self::new(None, Duration::ZERO)
    }

    pub fn failing(status: u16) -> Self {
        Self::new(Some(status), Duration::ZERO)
    }

    pub fn new(fallback: Option<u16>, delay: Duration) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            delay,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Queue answers consumed before `fallback` applies.
    pub fn with_script(self, script: impl IntoIterator<Item = Option<u16>>) -> Self {
        self.script.lock().unwrap().extend(script);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AddressScreeningClient for FakeScreeningClient {
    async fn post_prescreening(
        &self,
        address: &str,
        asset: &str,
        _user_id: &str,
    ) -> Result<Vec<PrescreeningRecord>, ScreeningError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let answer = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(self.fallback);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match answer {
            None => Ok(vec![PrescreeningRecord {
                asset: asset.to_string(),
                address: address.to_string(),
                rating: Some("lowRisk".to_string()),
                cluster: None,
                extra: serde_json::Map::new(),
            }]),
            Some(status) => Err(ScreeningError::FailedRequest {
                status: Some(status),
                detail: "scripted failure".to_string(),
            }),
        }
    }
}

// =============================================================================
// Captcha
// =============================================================================

pub struct StaticCaptcha(pub bool);

#[async_trait]
impl CaptchaVerifier for StaticCaptcha {
    async fn validate(&self, _token: &str) -> bool {
        self.0
    }
}
