//! Account repository.
//!
//! The suspension columns are only ever written together, from a
//! [`SuspensionRecord`], and are checked against the record invariants on
//! the way back out.

use chrono::{DateTime, Utc};
use qorovul_core::{Account, Language, OffenseLevel, SuspensionRecord};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::parse_datetime;
use crate::error::{Result, StorageError};
use crate::models::NewAccount;

const ACCOUNT_COLUMNS: &str = "id, name, language, is_blocked, is_permanently_blocked, \
     block_reason, blocked_until, offense_level, created_at";

/// Raw account row before decoding.
struct AccountRow {
    id: i64,
    name: String,
    language: String,
    is_blocked: bool,
    is_permanently_blocked: bool,
    block_reason: String,
    blocked_until: Option<String>,
    offense_level: Option<String>,
    created_at: String,
}

impl AccountRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            language: row.get(2)?,
            is_blocked: row.get::<_, i32>(3)? != 0,
            is_permanently_blocked: row.get::<_, i32>(4)? != 0,
            block_reason: row.get(5)?,
            blocked_until: row.get(6)?,
            offense_level: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    fn into_account(self) -> Result<Account> {
        let language = Language::parse(&self.language).ok_or_else(|| {
            StorageError::Corrupt(format!(
                "account {} has unknown language '{}'",
                self.id, self.language
            ))
        })?;

        let level = self
            .offense_level
            .as_deref()
            .map(|s| {
                OffenseLevel::parse(s).ok_or_else(|| {
                    StorageError::Corrupt(format!(
                        "account {} has unknown offense level '{s}'",
                        self.id
                    ))
                })
            })
            .transpose()?;

        let blocked_until = self
            .blocked_until
            .as_deref()
            .map(parse_datetime)
            .transpose()?;

        let suspension = SuspensionRecord::from_parts(
            self.is_blocked,
            self.is_permanently_blocked,
            self.block_reason,
            blocked_until,
            level,
        )?;

        let created_at = parse_datetime(&self.created_at)?;

        Ok(Account::new(self.id, self.name, language, created_at).with_suspension(suspension))
    }
}

/// Repository for account operations.
pub struct AccountsRepo;

impl AccountsRepo {
    /// Insert a new account.
    pub fn insert(conn: &Connection, account: NewAccount, created_at: DateTime<Utc>) -> Result<i64> {
        conn.execute(
            "INSERT INTO accounts (name, language, created_at) VALUES (?1, ?2, ?3)",
            params![
                account.name,
                account.language.as_str(),
                created_at.to_rfc3339()
            ],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Get an account by ID.
    pub fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Account>> {
        let row = conn
            .query_row(
                &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?1"),
                [id],
                AccountRow::from_row,
            )
            .optional()?;

        row.map(AccountRow::into_account).transpose()
    }

    /// Get all accounts.
    pub fn get_all(conn: &Connection) -> Result<Vec<Account>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY id ASC"
        ))?;

        let rows = stmt
            .query_map([], AccountRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(AccountRow::into_account).collect()
    }

    /// Overwrite the suspension columns of an account.
    pub fn save_suspension(conn: &Connection, id: i64, record: &SuspensionRecord) -> Result<()> {
        let updated = conn.execute(
            "UPDATE accounts SET is_blocked = ?1, is_permanently_blocked = ?2, block_reason = ?3,
             blocked_until = ?4, offense_level = ?5 WHERE id = ?6",
            params![
                record.is_blocked() as i32,
                record.is_permanently_blocked() as i32,
                record.block_reason(),
                record.blocked_until().map(|t| t.to_rfc3339()),
                record.level().map(|l| l.as_str()),
                id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::NotFound(format!("Account with id {}", id)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::run_migrations;
    use chrono::{Duration, TimeZone};

    fn setup_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        conn
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 18, 0, 0).unwrap()
    }

    fn insert(conn: &Connection, name: &str) -> i64 {
        AccountsRepo::insert(
            conn,
            NewAccount {
                name: name.to_string(),
                language: Language::Ru,
            },
            now(),
        )
        .unwrap()
    }

    #[test]
    fn test_insert_and_get_account() {
        let conn = setup_db();
        let id = insert(&conn, "Timur");

        let account = AccountsRepo::get_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(account.name, "Timur");
        assert_eq!(account.language, Language::Ru);
        assert_eq!(account.created_at, now());
        assert!(!account.suspension().is_blocked());
    }

    #[test]
    fn test_get_missing_account() {
        let conn = setup_db();
        assert!(AccountsRepo::get_by_id(&conn, 99).unwrap().is_none());
    }

    #[test]
    fn test_temporary_suspension_round_trip() {
        let conn = setup_db();
        let id = insert(&conn, "Timur");

        let mut record = SuspensionRecord::clear();
        record
            .suspend(OffenseLevel::Severe24h, "fraud attempt detected", now())
            .unwrap();
        AccountsRepo::save_suspension(&conn, id, &record).unwrap();

        let account = AccountsRepo::get_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(account.suspension(), &record);
        assert_eq!(
            account.suspension().blocked_until(),
            Some(now() + Duration::hours(24))
        );
    }

    #[test]
    fn test_permanent_suspension_round_trip() {
        let conn = setup_db();
        let id = insert(&conn, "Timur");

        let mut record = SuspensionRecord::clear();
        record
            .suspend(OffenseLevel::CriticalPerm, "threat", now())
            .unwrap();
        AccountsRepo::save_suspension(&conn, id, &record).unwrap();

        let account = AccountsRepo::get_by_id(&conn, id).unwrap().unwrap();
        assert!(account.suspension().is_permanently_blocked());
        assert_eq!(account.suspension().blocked_until(), None);
    }

    #[test]
    fn test_clearing_suspension() {
        let conn = setup_db();
        let id = insert(&conn, "Timur");

        let mut record = SuspensionRecord::clear();
        record
            .suspend(OffenseLevel::Warning12h, "language", now())
            .unwrap();
        AccountsRepo::save_suspension(&conn, id, &record).unwrap();
        AccountsRepo::save_suspension(&conn, id, &SuspensionRecord::clear()).unwrap();

        let account = AccountsRepo::get_by_id(&conn, id).unwrap().unwrap();
        assert_eq!(account.suspension(), &SuspensionRecord::clear());
    }

    #[test]
    fn test_save_suspension_missing_account() {
        let conn = setup_db();
        let result = AccountsRepo::save_suspension(&conn, 42, &SuspensionRecord::clear());
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_inconsistent_row_is_rejected() {
        let conn = setup_db();
        let id = insert(&conn, "Timur");

        // Permanent flag with an expiry, written behind the repository's back
        conn.execute(
            "UPDATE accounts SET is_blocked = 1, is_permanently_blocked = 1, block_reason = 'x',
             blocked_until = '2024-09-02T00:00:00+00:00', offense_level = 'critical_perm'
             WHERE id = ?1",
            [id],
        )
        .unwrap();

        assert!(matches!(
            AccountsRepo::get_by_id(&conn, id),
            Err(StorageError::Suspension(_))
        ));
    }

    #[test]
    fn test_unknown_language_is_corrupt() {
        let conn = setup_db();
        let id = insert(&conn, "Timur");
        conn.execute("UPDATE accounts SET language = 'xx' WHERE id = ?1", [id])
            .unwrap();

        assert!(matches!(
            AccountsRepo::get_by_id(&conn, id),
            Err(StorageError::Corrupt(_))
        ));
    }

    #[test]
    fn test_get_all() {
        let conn = setup_db();
        assert!(AccountsRepo::get_all(&conn).unwrap().is_empty());

        insert(&conn, "A");
        insert(&conn, "B");

        let all = AccountsRepo::get_all(&conn).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "A");
    }
}
