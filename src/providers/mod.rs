// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! External verification providers consumed over HTTP.

pub mod identity;
pub mod recaptcha;
pub mod screening;

pub use identity::{
    identity_client_from_config, Applicant, ApplicantRequest, DummyIdentityClient, IdentityError,
    IdentityVerificationClient, OnfidoClient,
};
pub use recaptcha::{CaptchaVerifier, RecaptchaVerifier};
pub use screening::{AddressScreeningClient, ChainalysisClient, PrescreeningRecord, ScreeningError};
