// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Compliance Storage
//!
//! Persistent state lives in a single redb database under `DATA_DIR`:
//!
//! ```text
//! {DATA_DIR}/
//!   compliance.redb   # countries, users, unique email/address indexes
//! ```
//!
//! The country registry is seeded at startup from [`countries::seed_countries`].
//! Users are only ever inserted, through a signup unit of work.

pub mod compliance_db;
pub mod countries;

pub use compliance_db::{ComplianceDatabase, DbError, DbResult, SignupTransaction};
pub use countries::seed_countries;
