// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{
    screening::ScreeningQueue, signup::SignupService, storage::ComplianceDatabase,
};

/// Shared handler state. Every component is constructed once in `main`.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<ComplianceDatabase>,
    pub signup: Arc<SignupService>,
    pub screening: ScreeningQueue,
}

impl AppState {
    pub fn new(
        db: Arc<ComplianceDatabase>,
        signup: SignupService,
        screening: ScreeningQueue,
    ) -> Self {
        Self {
            db,
            signup: Arc::new(signup),
            screening,
        }
    }
}
