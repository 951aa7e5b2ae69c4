// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signup field validation.
//!
//! The body is read as a raw JSON object so that a wrongly typed value is one
//! more field error rather than a rejected request. Every independent check
//! runs and reports into one [`FieldErrors`] map. Only infrastructure
//! failures (balance oracle, storage) abort early.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use chrono::NaiveDate;
use serde_json::{Map, Value};
use validator::ValidateEmail;

use crate::{
    blockchain::{checksummed, format_ether, BalanceOracle, ChainClientError},
    error::{FieldErrors, NON_FIELD_ERRORS},
    models::Country,
    providers::CaptchaVerifier,
    storage::{ComplianceDatabase, DbError},
};

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";
const NULL: &str = "This field may not be null.";
const NOT_A_STRING: &str = "Not a valid string.";
const INVALID_EMAIL: &str = "Enter a valid email address.";
const DATE_FORMAT: &str = "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";

/// A signup whose every field passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedSignup {
    pub address: Address,
    pub email: String,
    pub name: String,
    pub lastname: String,
    /// Resolved registry entry, persisted as-is.
    pub country: Country,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, thiserror::Error)]
pub enum ValidationFailure {
    #[error("signup validation failed")]
    Fields(FieldErrors),

    #[error("balance oracle unavailable: {0}")]
    Oracle(#[from] ChainClientError),

    #[error("storage error during validation: {0}")]
    Storage(#[from] DbError),
}

pub struct SignupValidator {
    db: Arc<ComplianceDatabase>,
    oracle: Arc<dyn BalanceOracle>,
    captcha: Option<Arc<dyn CaptchaVerifier>>,
    min_balance_wei: U256,
}

impl SignupValidator {
    pub fn new(
        db: Arc<ComplianceDatabase>,
        oracle: Arc<dyn BalanceOracle>,
        captcha: Option<Arc<dyn CaptchaVerifier>>,
        min_balance_wei: U256,
    ) -> Self {
        Self {
            db,
            oracle,
            captcha,
            min_balance_wei,
        }
    }

    pub async fn validate(
        &self,
        address: Address,
        body: &Value,
    ) -> Result<ValidatedSignup, ValidationFailure> {
        let Some(body) = body.as_object() else {
            return Err(ValidationFailure::Fields(FieldErrors::single(
                NON_FIELD_ERRORS,
                format!(
                    "Invalid data. Expected a dictionary, but got {}.",
                    json_kind(body)
                ),
            )));
        };
        let mut errors = FieldErrors::new();

        let country = self.validate_country(body, &mut errors)?;
        let email = self.validate_email(body, &mut errors)?;
        self.validate_address(address, &mut errors).await?;
        let name = required_text(body, "name", &mut errors);
        let lastname = required_text(body, "lastname", &mut errors);
        let date_of_birth = date_field(body, "date_of_birth", &mut errors);
        self.validate_captcha(body, &mut errors).await;

        match (country, email, name, lastname) {
            (Some(country), Some(email), Some(name), Some(lastname)) if errors.is_empty() => {
                Ok(ValidatedSignup {
                    address,
                    email,
                    name,
                    lastname,
                    country,
                    date_of_birth,
                })
            }
            _ => Err(ValidationFailure::Fields(errors)),
        }
    }

    fn validate_country(
        &self,
        body: &Map<String, Value>,
        errors: &mut FieldErrors,
    ) -> Result<Option<Country>, DbError> {
        let Some(raw) = required_text(body, "country", errors) else {
            return Ok(None);
        };
        if raw.chars().count() != 3 {
            errors.add("country", "Ensure this field has exactly 3 characters.");
            return Ok(None);
        }

        let code = raw.to_ascii_uppercase();
        match self.db.get_country_by_iso3(&code)? {
            None => {
                errors.add("country", format!("Invalid Country ISO3 code {code}"));
                Ok(None)
            }
            Some(country) if !country.is_enabled => {
                errors.add("country", format!("Country ISO3 {code} not enabled"));
                Ok(None)
            }
            Some(country) => Ok(Some(country)),
        }
    }

    fn validate_email(
        &self,
        body: &Map<String, Value>,
        errors: &mut FieldErrors,
    ) -> Result<Option<String>, DbError> {
        let Some(email) = required_text(body, "email", errors) else {
            return Ok(None);
        };

        let mut valid = true;
        if !email.as_str().validate_email() || !has_dotted_domain(&email) {
            errors.add("email", INVALID_EMAIL);
            valid = false;
        }
        if self.db.user_exists_by_email(&email)? {
            errors.add("email", "A user with this email already exists.");
            valid = false;
        }
        Ok(valid.then_some(email))
    }

    async fn validate_address(
        &self,
        address: Address,
        errors: &mut FieldErrors,
    ) -> Result<(), ValidationFailure> {
        if self.db.user_exists_by_address(&checksummed(&address))? {
            errors.add("address", "A user with this address already exists.");
            return Ok(());
        }

        let balance = self.oracle.get_balance(address).await?;
        if balance < self.min_balance_wei {
            errors.add(
                "address",
                format!(
                    "Minimum balance is {} ETH, current account balance {} ETH",
                    format_ether(self.min_balance_wei),
                    format_ether(balance)
                ),
            );
        }
        Ok(())
    }

    async fn validate_captcha(&self, body: &Map<String, Value>, errors: &mut FieldErrors) {
        let Some(captcha) = &self.captcha else {
            return;
        };
        if let Some(token) = required_text(body, "recaptcha", errors) {
            if !captcha.validate(&token).await {
                errors.add("recaptcha", "Invalid reCAPTCHA token.");
            }
        }
    }
}

/// Raw text content of a body field before trimming.
enum RawText {
    Absent,
    Null,
    Text(String),
    WrongType,
}

fn raw_text(body: &Map<String, Value>, field: &str) -> RawText {
    match body.get(field) {
        None => RawText::Absent,
        Some(Value::Null) => RawText::Null,
        Some(Value::String(s)) => RawText::Text(s.clone()),
        // Numbers are accepted in their literal form, as text inputs do
        Some(Value::Number(n)) => RawText::Text(n.to_string()),
        Some(_) => RawText::WrongType,
    }
}

/// Trimmed, non-blank text of a required field.
fn required_text(
    body: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<String> {
    let message = match raw_text(body, field) {
        RawText::Text(text) => match text.trim() {
            "" => BLANK,
            trimmed => return Some(trimmed.to_string()),
        },
        RawText::Absent => REQUIRED,
        RawText::Null => NULL,
        RawText::WrongType => NOT_A_STRING,
    };
    errors.add(field, message);
    None
}

/// Optional `YYYY-MM-DD` date. Absent, null and blank all mean "not given".
fn date_field(
    body: &Map<String, Value>,
    field: &str,
    errors: &mut FieldErrors,
) -> Option<NaiveDate> {
    let text = match raw_text(body, field) {
        RawText::Absent | RawText::Null => return None,
        RawText::Text(text) => text,
        RawText::WrongType => {
            errors.add(field, DATE_FORMAT);
            return None;
        }
    };
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(field, DATE_FORMAT);
            None
        }
    }
}

/// The domain must have at least two non-empty labels (`example.com`, not `example`).
fn has_dotted_domain(email: &str) -> bool {
    email
        .rsplit_once('@')
        .map(|(_, domain)| domain.trim_start_matches('[').trim_end_matches(']'))
        .is_some_and(|domain| {
            domain.contains('.') && domain.split('.').all(|label| !label.is_empty())
        })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        blockchain::parse_checksummed,
        models::{SignupRequest, User},
        test_support::{temp_db, FakeBalanceOracle, StaticCaptcha, ADDRESS},
    };
    use serde_json::json;

    const THRESHOLD: u64 = 1_000;

    fn request() -> SignupRequest {
        SignupRequest {
            country: Some("deu".to_string()),
            email: Some("ada@example.com".to_string()),
            name: Some("Ada".to_string()),
            lastname: Some("Lovelace".to_string()),
            date_of_birth: None,
            recaptcha: None,
        }
    }

    fn body(request: SignupRequest) -> Value {
        serde_json::to_value(request).unwrap()
    }

    fn validator_with(
        db: Arc<ComplianceDatabase>,
        oracle: Arc<FakeBalanceOracle>,
        captcha: Option<Arc<dyn CaptchaVerifier>>,
    ) -> SignupValidator {
        SignupValidator::new(db, oracle, captcha, U256::from(THRESHOLD))
    }

    fn fields(failure: ValidationFailure) -> FieldErrors {
        match failure {
            ValidationFailure::Fields(errors) => errors,
            other => panic!("expected field errors, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn valid_request_resolves_country() {
        let (db, _dir) = temp_db();
        let oracle = Arc::new(FakeBalanceOracle::with_default(U256::from(THRESHOLD)));
        let validator = validator_with(db, oracle.clone(), None);

        let address = parse_checksummed(ADDRESS).unwrap();
        let validated = validator.validate(address, &body(request())).await.unwrap();
        assert_eq!(validated.country.iso3, "DEU");
        assert_eq!(validated.country.iso2, "DE");
        assert_eq!(validated.email, "ada@example.com");
        assert_eq!(oracle.calls(), 1);
    }

    #[tokio::test]
    async fn reports_all_field_errors_together() {
        let (db, _dir) = temp_db();
        let oracle = Arc::new(FakeBalanceOracle::with_default(U256::ZERO));
        let validator = validator_with(db, oracle, None);

        let bad = SignupRequest {
            country: Some("XXX".to_string()),
            email: Some("not-an-email".to_string()),
            name: None,
            lastname: Some("  ".to_string()),
            ..Default::default()
        };
        let errors = fields(
            validator
                .validate(parse_checksummed(ADDRESS).unwrap(), &body(bad))
                .await
                .unwrap_err(),
        );

        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["address", "country", "email", "lastname", "name"]
        );
        assert_eq!(errors.get("country").unwrap()[0], "Invalid Country ISO3 code XXX");
        assert!(errors.get("address").unwrap()[0].starts_with("Minimum balance is 0.000000000000001 ETH"));
    }

    #[tokio::test]
    async fn disabled_country_is_distinct_from_unknown() {
        let (db, _dir) = temp_db();
        let oracle = Arc::new(FakeBalanceOracle::with_default(U256::from(THRESHOLD)));
        let validator = validator_with(db.clone(), oracle, None);
        let address = parse_checksummed(ADDRESS).unwrap();

        let disabled = SignupRequest {
            country: Some("prk".to_string()),
            ..request()
        };
        let errors = fields(validator.validate(address, &body(disabled.clone())).await.unwrap_err());
        assert_eq!(errors.get("country").unwrap(), ["Country ISO3 PRK not enabled"]);

        let wrong_length = SignupRequest {
            country: Some("DE".to_string()),
            ..request()
        };
        let errors = fields(validator.validate(address, &body(wrong_length)).await.unwrap_err());
        assert_eq!(
            errors.get("country").unwrap(),
            ["Ensure this field has exactly 3 characters."]
        );

        db.set_country_enabled("PRK", true).unwrap();
        assert!(validator.validate(address, &body(disabled.clone())).await.is_ok());
    }

    #[tokio::test]
    async fn balance_boundary() {
        let (db, _dir) = temp_db();
        let oracle = Arc::new(FakeBalanceOracle::with_default(U256::ZERO));
        let validator = validator_with(db, oracle.clone(), None);
        let address = parse_checksummed(ADDRESS).unwrap();

        oracle.set(address, U256::from(THRESHOLD - 1));
        let errors = fields(validator.validate(address, &body(request())).await.unwrap_err());
        assert_eq!(
            errors.get("address").unwrap(),
            ["Minimum balance is 0.000000000000001 ETH, current account balance 0.000000000000000999 ETH"]
        );

        oracle.set(address, U256::from(THRESHOLD));
        assert!(validator.validate(address, &body(request())).await.is_ok());
    }

    #[tokio::test]
    async fn existing_user_fails_uniqueness_without_balance_lookup() {
        let (db, _dir) = temp_db();
        let oracle = Arc::new(FakeBalanceOracle::with_default(U256::from(THRESHOLD)));
        let validator = validator_with(db.clone(), oracle.clone(), None);
        let address = parse_checksummed(ADDRESS).unwrap();

        let country = db.get_country_by_iso3("DEU").unwrap().unwrap();
        let mut txn = db.begin_signup();
        txn.insert_user(User::new_pending(
            ADDRESS.to_string(),
            "Ada@Example.com".to_string(),
            "Ada".to_string(),
            "Lovelace".to_string(),
            &country,
        ))
        .unwrap();
        txn.commit().unwrap();

        let errors = fields(validator.validate(address, &body(request())).await.unwrap_err());
        assert_eq!(
            errors.get("email").unwrap(),
            ["A user with this email already exists."]
        );
        assert_eq!(
            errors.get("address").unwrap(),
            ["A user with this address already exists."]
        );
        assert_eq!(oracle.calls(), 0);
    }

    #[tokio::test]
    async fn oracle_failure_is_fatal() {
        let (db, _dir) = temp_db();
        let validator = validator_with(db, Arc::new(FakeBalanceOracle::unreachable()), None);
        let err = validator
            .validate(parse_checksummed(ADDRESS).unwrap(), &body(request()))
            .await
            .unwrap_err();
        assert!(matches!(err, ValidationFailure::Oracle(_)));
    }

    #[tokio::test]
    async fn captcha_checked_only_when_enabled() {
        let (db, _dir) = temp_db();
        let oracle = Arc::new(FakeBalanceOracle::with_default(U256::from(THRESHOLD)));
        let address = parse_checksummed(ADDRESS).unwrap();

        let rejecting = validator_with(
            db.clone(),
            oracle.clone(),
            Some(Arc::new(StaticCaptcha(false)) as Arc<dyn CaptchaVerifier>),
        );
        let errors = fields(rejecting.validate(address, &body(request())).await.unwrap_err());
        assert_eq!(errors.get("recaptcha").unwrap(), [REQUIRED]);

        let with_token = SignupRequest {
            recaptcha: Some("token".to_string()),
            ..request()
        };
        let errors = fields(rejecting.validate(address, &body(with_token.clone())).await.unwrap_err());
        assert_eq!(errors.get("recaptcha").unwrap(), ["Invalid reCAPTCHA token."]);

        let accepting = validator_with(
            db,
            oracle,
            Some(Arc::new(StaticCaptcha(true)) as Arc<dyn CaptchaVerifier>),
        );
        assert!(accepting.validate(address, &body(with_token)).await.is_ok());
    }

    #[tokio::test]
    async fn wrongly_typed_values_are_field_errors() {
        let (db, _dir) = temp_db();
        let oracle = Arc::new(FakeBalanceOracle::with_default(U256::from(THRESHOLD)));
        let validator = validator_with(db, oracle, None);

        let raw = json!({
            "country": "ZZZ",
            "email": 5,
            "name": ["Ada"],
            "lastname": null,
            "date_of_birth": "10/12/1815"
        });
        let errors = fields(
            validator
                .validate(parse_checksummed(ADDRESS).unwrap(), &raw)
                .await
                .unwrap_err(),
        );

        assert_eq!(
            errors.get("country").unwrap(),
            ["Invalid Country ISO3 code ZZZ"]
        );
        assert_eq!(errors.get("email").unwrap(), [INVALID_EMAIL]);
        assert_eq!(errors.get("name").unwrap(), [NOT_A_STRING]);
        assert_eq!(errors.get("lastname").unwrap(), [NULL]);
        assert_eq!(errors.get("date_of_birth").unwrap(), [DATE_FORMAT]);
        assert!(!errors.contains("address"));
    }

    #[tokio::test]
    async fn date_of_birth_is_parsed_when_given() {
        let (db, _dir) = temp_db();
        let oracle = Arc::new(FakeBalanceOracle::with_default(U256::from(THRESHOLD)));
        let validator = validator_with(db, oracle, None);
        let address = parse_checksummed(ADDRESS).unwrap();

        let mut raw = body(request());
        raw["date_of_birth"] = json!("1815-12-10");
        let validated = validator.validate(address, &raw).await.unwrap();
        assert_eq!(validated.date_of_birth, NaiveDate::from_ymd_opt(1815, 12, 10));

        raw["date_of_birth"] = Value::Null;
        let validated = validator.validate(address, &raw).await.unwrap();
        assert_eq!(validated.date_of_birth, None);

        raw["date_of_birth"] = json!(18151210);
        let errors = fields(validator.validate(address, &raw).await.unwrap_err());
        assert_eq!(errors.get("date_of_birth").unwrap(), [DATE_FORMAT]);
    }

    #[tokio::test]
    async fn non_object_body_is_a_non_field_error() {
        let (db, _dir) = temp_db();
        let oracle = Arc::new(FakeBalanceOracle::with_default(U256::from(THRESHOLD)));
        let validator = validator_with(db, oracle.clone(), None);

        let errors = fields(
            validator
                .validate(parse_checksummed(ADDRESS).unwrap(), &json!(["DEU"]))
                .await
                .unwrap_err(),
        );
        assert_eq!(
            errors.get(NON_FIELD_ERRORS).unwrap(),
            ["Invalid data. Expected a dictionary, but got list."]
        );
        assert_eq!(oracle.calls(), 0);
    }

    #[tokio::test]
    async fn country_code_is_trimmed_before_length_check() {
        let (db, _dir) = temp_db();
        let oracle = Arc::new(FakeBalanceOracle::with_default(U256::from(THRESHOLD)));
        let validator = validator_with(db, oracle, None);

        let padded = SignupRequest {
            country: Some(" deu ".to_string()),
            ..request()
        };
        let validated = validator
            .validate(parse_checksummed(ADDRESS).unwrap(), &body(padded))
            .await
            .unwrap();
        assert_eq!(validated.country.iso3, "DEU");
    }

    #[tokio::test]
    async fn email_domain_needs_a_dot() {
        let (db, _dir) = temp_db();
        let oracle = Arc::new(FakeBalanceOracle::with_default(U256::from(THRESHOLD)));
        let validator = validator_with(db, oracle, None);
        let address = parse_checksummed(ADDRESS).unwrap();

        for email in ["ada@example", "ada@example.", "ada@.com"] {
            let bad = SignupRequest {
                email: Some(email.to_string()),
                ..request()
            };
            let errors = fields(validator.validate(address, &body(bad)).await.unwrap_err());
            assert_eq!(errors.get("email").unwrap(), [INVALID_EMAIL], "{email}");
        }
    }
}
