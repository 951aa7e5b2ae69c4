// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Compliance Server - KYC/AML onboarding backend
//!
//! Signs up users tied to an on-chain address and screens their addresses
//! against AML risk lists in the background.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `blockchain` - checksummed addresses and the balance oracle
//! - `providers` - identity verification, address screening, reCAPTCHA
//! - `screening` - lock-guarded, retrying pre-screening worker pool
//! - `signup` - signup validation and orchestration
//! - `storage` - embedded redb database

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod screening;
pub mod signup;
pub mod state;
pub mod storage;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;
