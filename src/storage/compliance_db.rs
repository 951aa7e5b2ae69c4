// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded compliance database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `countries`: iso2 → serialized Country
//! - `country_iso3`: iso3 → iso2
//! - `users`: checksummed address → serialized User
//! - `user_emails`: lowercase email → checksummed address
//!
//! ## Signup unit of work
//!
//! [`SignupTransaction`] stages one user, reserves its email and address so
//! that concurrent signups for the same values conflict, and writes the row
//! only on [`SignupTransaction::commit`]. Dropping it uncommitted discards the
//! row; nothing was ever visible to readers.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::models::{Country, User};

// =============================================================================
// Table Definitions
// =============================================================================

const COUNTRIES: TableDefinition<&str, &[u8]> = TableDefinition::new("countries");

const COUNTRY_ISO3: TableDefinition<&str, &str> = TableDefinition::new("country_iso3");

const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

const USER_EMAILS: TableDefinition<&str, &str> = TableDefinition::new("user_emails");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated by a committed or in-flight row.
    #[error("unique constraint violated on {field}")]
    Conflict { field: &'static str },

    #[error("signup transaction has no staged user")]
    NothingStaged,

    #[error("reservation table lock poisoned")]
    LockPoisoned,
}

pub type DbResult<T> = Result<T, DbError>;

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

// =============================================================================
// ComplianceDatabase
// =============================================================================

pub struct ComplianceDatabase {
    db: Database,
    /// Unique keys held by uncommitted signup transactions.
    reservations: Mutex<HashSet<String>>,
}

impl ComplianceDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> DbResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(COUNTRIES)?;
            let _ = write_txn.open_table(COUNTRY_ISO3)?;
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USER_EMAILS)?;
        }
        write_txn.commit()?;

        Ok(Self {
            db,
            reservations: Mutex::new(HashSet::new()),
        })
    }

    /// Cheap read used by readiness checks.
    pub fn ping(&self) -> DbResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(COUNTRIES)?;
        Ok(())
    }

    // =========================================================================
    // Country registry
    // =========================================================================

    /// Insert seed countries that are not present yet.
    ///
    /// Existing rows are left untouched so that enable/disable decisions
    /// survive restarts. Returns the number of inserted rows.
    pub fn seed_countries(&self, countries: &[Country]) -> DbResult<usize> {
        let mut inserted = 0;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(COUNTRIES)?;
            let mut iso3_index = write_txn.open_table(COUNTRY_ISO3)?;
            for country in countries {
                let exists = table.get(country.iso2.as_str())?.is_some();
                if exists {
                    continue;
                }
                let json = serde_json::to_vec(country)?;
                table.insert(country.iso2.as_str(), json.as_slice())?;
                iso3_index.insert(country.iso3.as_str(), country.iso2.as_str())?;
                inserted += 1;
            }
        }
        write_txn.commit()?;

        if inserted > 0 {
            tracing::info!(inserted, "Seeded country registry");
        }
        Ok(inserted)
    }

    /// Look up a country by ISO3 code (case-insensitive).
    pub fn get_country_by_iso3(&self, iso3: &str) -> DbResult<Option<Country>> {
        let code = iso3.trim().to_ascii_uppercase();
        let read_txn = self.db.begin_read()?;
        let iso3_index = read_txn.open_table(COUNTRY_ISO3)?;
        let iso2 = match iso3_index.get(code.as_str())? {
            Some(v) => v.value().to_string(),
            None => return Ok(None),
        };

        let table = read_txn.open_table(COUNTRIES)?;
        match table.get(iso2.as_str())? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Enable or disable signups from a country. Existing users are unaffected.
    pub fn set_country_enabled(&self, iso3: &str, enabled: bool) -> DbResult<Country> {
        let code = iso3.trim().to_ascii_uppercase();
        let write_txn = self.db.begin_write()?;
        let country = {
            let iso3_index = write_txn.open_table(COUNTRY_ISO3)?;
            let iso2 = iso3_index
                .get(code.as_str())?
                .map(|v| v.value().to_string())
                .ok_or_else(|| DbError::NotFound(format!("Country {code}")))?;

            let mut table = write_txn.open_table(COUNTRIES)?;
            let existing_bytes = {
                let existing = table
                    .get(iso2.as_str())?
                    .ok_or_else(|| DbError::NotFound(format!("Country {iso2}")))?;
                existing.value().to_vec()
            };

            let mut country: Country = serde_json::from_slice(&existing_bytes)?;
            country.is_enabled = enabled;
            let json = serde_json::to_vec(&country)?;
            table.insert(iso2.as_str(), json.as_slice())?;
            country
        };
        write_txn.commit()?;

        tracing::info!(iso3 = %code, enabled, "Country signup eligibility changed");
        Ok(country)
    }

    pub fn list_countries(&self) -> DbResult<Vec<Country>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COUNTRIES)?;
        let mut countries = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            countries.push(serde_json::from_slice(value.value())?);
        }
        Ok(countries)
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub fn user_exists_by_address(&self, address: &str) -> DbResult<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        Ok(table.get(address)?.is_some())
    }

    pub fn user_exists_by_email(&self, email: &str) -> DbResult<bool> {
        let key = email_key(email);
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USER_EMAILS)?;
        Ok(table.get(key.as_str())?.is_some())
    }

    pub fn get_user(&self, address: &str) -> DbResult<Option<User>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        match table.get(address)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn count_users(&self) -> DbResult<usize> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS)?;
        let mut count = 0;
        for entry in table.iter()? {
            entry?;
            count += 1;
        }
        Ok(count)
    }

    /// Start a signup unit of work.
    pub fn begin_signup(&self) -> SignupTransaction<'_> {
        SignupTransaction {
            db: self,
            staged: None,
            reserved: Vec::new(),
        }
    }

    /// Insert-only write enforcing both unique indexes.
    fn insert_user(&self, user: &User) -> DbResult<()> {
        let email = email_key(&user.email);
        let json = serde_json::to_vec(user)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut users = write_txn.open_table(USERS)?;
            let mut emails = write_txn.open_table(USER_EMAILS)?;

            let address_taken = users.get(user.address.as_str())?.is_some();
            if address_taken {
                return Err(DbError::Conflict { field: "address" });
            }
            let email_taken = emails.get(email.as_str())?.is_some();
            if email_taken {
                return Err(DbError::Conflict { field: "email" });
            }

            users.insert(user.address.as_str(), json.as_slice())?;
            emails.insert(email.as_str(), user.address.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn release(&self, keys: &[String]) {
        if keys.is_empty() {
            return;
        }
        if let Ok(mut reservations) = self.reservations.lock() {
            for key in keys {
                reservations.remove(key);
            }
        }
    }
}

// =============================================================================
// SignupTransaction
// =============================================================================

/// Local-state transaction around one signup.
///
/// Provider calls made while it is open are not covered: they stay done even
/// if the transaction is later dropped.
pub struct SignupTransaction<'a> {
    db: &'a ComplianceDatabase,
    staged: Option<User>,
    reserved: Vec<String>,
}

impl SignupTransaction<'_> {
    /// Stage a user, failing with [`DbError::Conflict`] if its address or
    /// email is already committed or held by another open transaction.
    pub fn insert_user(&mut self, user: User) -> DbResult<()> {
        let address_key = format!("address:{}", user.address);
        let email_key = format!("email:{}", email_key(&user.email));

        let mut reservations = self
            .db
            .reservations
            .lock()
            .map_err(|_| DbError::LockPoisoned)?;

        // Committed rows are checked under the reservation lock so that a
        // concurrent commit is seen either here or as a reservation.
        if reservations.contains(&address_key) || self.db.user_exists_by_address(&user.address)? {
            return Err(DbError::Conflict { field: "address" });
        }
        if reservations.contains(&email_key) || self.db.user_exists_by_email(&user.email)? {
            return Err(DbError::Conflict { field: "email" });
        }

        reservations.insert(address_key.clone());
        reservations.insert(email_key.clone());
        drop(reservations);

        let previous = std::mem::take(&mut self.reserved);
        self.db.release(&previous);
        self.reserved = vec![address_key, email_key];
        self.staged = Some(user);
        Ok(())
    }

    /// Persist the staged user and release its reservations.
    pub fn commit(mut self) -> DbResult<User> {
        let user = self.staged.take().ok_or(DbError::NothingStaged)?;
        self.db.insert_user(&user)?;
        tracing::debug!(address = %user.address, "Signup transaction committed");
        Ok(user)
    }
}

impl Drop for SignupTransaction<'_> {
    fn drop(&mut self) {
        if let Some(user) = self.staged.take() {
            tracing::debug!(address = %user.address, "Signup transaction rolled back");
        }
        self.db.release(&self.reserved);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::countries::seed_countries;

    fn temp_db() -> (ComplianceDatabase, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = ComplianceDatabase::open(&dir.path().join("test.redb")).unwrap();
        db.seed_countries(&seed_countries(&["PRK".to_string()]))
            .unwrap();
        (db, dir)
    }

    fn sample_user(address: &str, email: &str) -> User {
        let country = Country {
            name: "Germany".to_string(),
            iso2: "DE".to_string(),
            iso3: "DEU".to_string(),
            numeric: 276,
            is_enabled: true,
        };
        User::new_pending(
            address.to_string(),
            email.to_string(),
            "Ada".to_string(),
            "Lovelace".to_string(),
            &country,
        )
    }

    #[test]
    fn country_lookup_is_case_insensitive() {
        let (db, _dir) = temp_db();
        let country = db.get_country_by_iso3("deu").unwrap().unwrap();
        assert_eq!(country.iso2, "DE");
        assert!(country.is_enabled);

        assert!(db.get_country_by_iso3("XXX").unwrap().is_none());
        assert!(!db.get_country_by_iso3("PRK").unwrap().unwrap().is_enabled);
    }

    #[test]
    fn seeding_is_idempotent_and_keeps_toggles() {
        let (db, _dir) = temp_db();
        db.set_country_enabled("PRK", true).unwrap();

        let inserted = db
            .seed_countries(&seed_countries(&["PRK".to_string()]))
            .unwrap();
        assert_eq!(inserted, 0);
        assert!(db.get_country_by_iso3("PRK").unwrap().unwrap().is_enabled);
        assert_eq!(db.list_countries().unwrap().len(), seed_countries(&[]).len());
    }

    #[test]
    fn set_country_enabled_unknown_code() {
        let (db, _dir) = temp_db();
        let err = db.set_country_enabled("ZZZ", false).unwrap_err();
        assert!(matches!(err, DbError::NotFound(_)));
    }

    #[test]
    fn committed_signup_is_visible() {
        let (db, _dir) = temp_db();
        let mut txn = db.begin_signup();
        txn.insert_user(sample_user("0xA", "ada@example.com")).unwrap();
        assert!(!db.user_exists_by_address("0xA").unwrap());

        txn.commit().unwrap();
        assert!(db.user_exists_by_address("0xA").unwrap());
        assert!(db.user_exists_by_email("ADA@example.com").unwrap());
        assert_eq!(db.count_users().unwrap(), 1);
        assert_eq!(db.get_user("0xA").unwrap().unwrap().email, "ada@example.com");
    }

    #[test]
    fn dropped_signup_leaves_no_row() {
        let (db, _dir) = temp_db();
        {
            let mut txn = db.begin_signup();
            txn.insert_user(sample_user("0xA", "ada@example.com")).unwrap();
        }
        assert_eq!(db.count_users().unwrap(), 0);

        // Reservations were released with the rollback
        let mut txn = db.begin_signup();
        txn.insert_user(sample_user("0xA", "ada@example.com")).unwrap();
        txn.commit().unwrap();
        assert_eq!(db.count_users().unwrap(), 1);
    }

    #[test]
    fn in_flight_duplicates_conflict() {
        let (db, _dir) = temp_db();
        let mut first = db.begin_signup();
        first.insert_user(sample_user("0xA", "ada@example.com")).unwrap();

        let mut second = db.begin_signup();
        let err = second
            .insert_user(sample_user("0xB", "Ada@Example.com"))
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict { field: "email" }));

        let err = second
            .insert_user(sample_user("0xA", "grace@example.com"))
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict { field: "address" }));
    }

    #[test]
    fn committed_duplicates_conflict() {
        let (db, _dir) = temp_db();
        let mut txn = db.begin_signup();
        txn.insert_user(sample_user("0xA", "ada@example.com")).unwrap();
        txn.commit().unwrap();

        let mut txn = db.begin_signup();
        let err = txn
            .insert_user(sample_user("0xA", "other@example.com"))
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict { field: "address" }));
    }

    #[test]
    fn commit_without_insert_fails() {
        let (db, _dir) = temp_db();
        let err = db.begin_signup().commit().unwrap_err();
        assert!(matches!(err, DbError::NothingStaged));
    }
}
