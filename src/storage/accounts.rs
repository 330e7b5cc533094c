// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Keystone Auth

//! Embedded account database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `accounts`: account_id → serialized Account (JSON bytes)
//! - `email_index`: email → account_id
//! - `refresh_index`: plaintext refresh secret → account_id
//!
//! Both indexes are maintained in the same write transaction as the primary
//! record, so a lookup never observes a half-rotated account.

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use crate::auth::store::{SessionStore, StoreError};
use crate::models::Account;

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: account_id → serialized Account (JSON bytes).
const ACCOUNTS: TableDefinition<&str, &[u8]> = TableDefinition::new("accounts");

/// Index: email → account_id. Enforces the unique-email invariant on lookup.
const EMAIL_INDEX: TableDefinition<&str, &str> = TableDefinition::new("email_index");

/// Index: plaintext refresh secret → account_id.
const REFRESH_INDEX: TableDefinition<&str, &str> = TableDefinition::new("refresh_index");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AccountDbError {
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
}

impl From<AccountDbError> for StoreError {
    fn from(err: AccountDbError) -> Self {
        match err {
            AccountDbError::Serde(e) => StoreError::Corrupt(e.to_string()),
            other => StoreError::Backend(other.to_string()),
        }
    }
}

pub type AccountDbResult<T> = Result<T, AccountDbError>;

// =============================================================================
// AccountDatabase
// =============================================================================

/// Embedded ACID account store.
pub struct AccountDatabase {
    db: Database,
}

impl AccountDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> AccountDbResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ACCOUNTS)?;
            let _ = write_txn.open_table(EMAIL_INDEX)?;
            let _ = write_txn.open_table(REFRESH_INDEX)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Insert or update an account, keeping both indexes in step within one
    /// transaction.
    fn write_account(&self, account: &Account) -> AccountDbResult<()> {
        let id = account.id.to_string();
        let json = serde_json::to_vec(account)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut accounts = write_txn.open_table(ACCOUNTS)?;

            // A superseded refresh secret must stop resolving, so fetch the
            // previous record before overwriting it.
            let previous_secret: Option<String> = match accounts.get(id.as_str())? {
                Some(value) => {
                    let previous: Account = serde_json::from_slice(value.value())?;
                    previous.refresh_token
                }
                None => None,
            };

            accounts.insert(id.as_str(), json.as_slice())?;

            let mut emails = write_txn.open_table(EMAIL_INDEX)?;
            emails.insert(account.email.as_str(), id.as_str())?;

            let mut refresh = write_txn.open_table(REFRESH_INDEX)?;
            if previous_secret != account.refresh_token {
                if let Some(old) = previous_secret {
                    refresh.remove(old.as_str())?;
                }
            }
            if let Some(secret) = &account.refresh_token {
                refresh.insert(secret.as_str(), id.as_str())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Look up an account by primary id within a read transaction.
    fn read_account(&self, id: &str) -> AccountDbResult<Option<Account>> {
        let read_txn = self.db.begin_read()?;
        let accounts = read_txn.open_table(ACCOUNTS)?;
        match accounts.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Resolve an index entry to the account it points at.
    fn read_via_index(
        &self,
        index: TableDefinition<&str, &str>,
        key: &str,
    ) -> AccountDbResult<Option<Account>> {
        let id = {
            let read_txn = self.db.begin_read()?;
            let table = read_txn.open_table(index)?;
            table.get(key)?.map(|value| value.value().to_string())
        };
        match id {
            Some(id) => self.read_account(&id),
            None => Ok(None),
        }
    }
}

impl SessionStore for AccountDatabase {
    fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.read_via_index(EMAIL_INDEX, email)?)
    }

    fn find_by_refresh_token(&self, secret: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.read_via_index(REFRESH_INDEX, secret)?)
    }

    fn upsert(&self, account: &Account) -> Result<(), StoreError> {
        Ok(self.write_account(account)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;
    use uuid::Uuid;

    fn test_db() -> (AccountDatabase, TempDir) {
        let dir = TempDir::new().expect("create temp dir");
        let db = AccountDatabase::open(&dir.path().join("accounts.redb")).expect("open db");
        (db, dir)
    }

    fn test_account(email: &str) -> Account {
        Account {
            id: Uuid::new_v4(),
            username: "alice".into(),
            email: email.into(),
            phone_number: "555".into(),
            password_hash: "phc-hash".into(),
            created_at: Utc::now(),
            refresh_token: None,
            refresh_token_expires_at: None,
        }
    }

    #[test]
    fn upsert_then_find_by_email() {
        let (db, _dir) = test_db();
        let account = test_account("a@x.com");
        db.upsert(&account).unwrap();

        let loaded = db.find_by_email("a@x.com").unwrap().unwrap();
        assert_eq!(loaded, account);

        assert!(db.find_by_email("other@x.com").unwrap().is_none());
    }

    #[test]
    fn refresh_index_follows_rotation() {
        let (db, _dir) = test_db();
        let mut account = test_account("a@x.com");
        account.set_refresh_token("secret-1".into(), Utc::now() + Duration::days(7));
        db.upsert(&account).unwrap();

        assert!(db.find_by_refresh_token("secret-1").unwrap().is_some());

        // Rotate: the old secret must stop resolving.
        account.set_refresh_token("secret-2".into(), Utc::now() + Duration::days(7));
        db.upsert(&account).unwrap();

        assert!(db.find_by_refresh_token("secret-1").unwrap().is_none());
        let loaded = db.find_by_refresh_token("secret-2").unwrap().unwrap();
        assert_eq!(loaded.id, account.id);
    }

    #[test]
    fn clearing_refresh_token_removes_index_entry() {
        let (db, _dir) = test_db();
        let mut account = test_account("a@x.com");
        account.set_refresh_token("secret-1".into(), Utc::now() + Duration::days(7));
        db.upsert(&account).unwrap();

        account.clear_refresh_token();
        db.upsert(&account).unwrap();

        assert!(db.find_by_refresh_token("secret-1").unwrap().is_none());
        // The account itself is still there.
        assert!(db.find_by_email("a@x.com").unwrap().is_some());
    }

    #[test]
    fn accounts_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("accounts.redb");
        let account = test_account("a@x.com");

        {
            let db = AccountDatabase::open(&path).unwrap();
            db.upsert(&account).unwrap();
        }

        let db = AccountDatabase::open(&path).unwrap();
        let loaded = db.find_by_email("a@x.com").unwrap().unwrap();
        assert_eq!(loaded, account);
    }
}
