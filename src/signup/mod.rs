// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Signup
//!
//! ```text
//! POST /v1/users/{address}
//!   -> parse checksummed address (422 on failure)
//!   -> SignupValidator   (country, email, address + balance, names, captcha)
//!   -> SignupTransaction (reserve + stage user)
//!   -> identity provider: create applicant, issue SDK token
//!   -> commit
//! ```

pub mod orchestrator;
pub mod validator;

pub use orchestrator::{SignupError, SignupService};
pub use validator::{SignupValidator, ValidatedSignup, ValidationFailure};
