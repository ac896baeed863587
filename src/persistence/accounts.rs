use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::{
    DatabaseError,
    account::{Account, AccountId},
    persistence::{DatabaseResult, get_connection},
};

pub trait AccountRepository {
    fn create_account(&self, account: &Account) -> DatabaseResult<AccountId>;
    fn get_account_by_username(&self, username: &str) -> DatabaseResult<Option<Account>>;
}

pub struct AccountRepositoryImpl {
    pool: Pool<SqliteConnectionManager>,
}

impl AccountRepositoryImpl {
    pub fn new(pool: Pool<SqliteConnectionManager>) -> Self {
        Self { pool }
    }

    fn account_from_row(row: &rusqlite::Row) -> rusqlite::Result<Account> {
        Ok(Account {
            id: row.get("id")?,
            username: row.get("username")?,
            email: row.get("email")?,
            password_hash: row.get("password")?,
        })
    }
}

impl AccountRepository for AccountRepositoryImpl {
    fn create_account(&self, account: &Account) -> DatabaseResult<AccountId> {
        let conn = get_connection(&self.pool)?;
        conn.execute(
            "INSERT INTO accounts (username, email, password) VALUES (?1, ?2, ?3)",
            rusqlite::params![account.username, account.email, account.password_hash],
        )
        .map_err(DatabaseError::QueryError)?;
        Ok(conn.last_insert_rowid())
    }

    fn get_account_by_username(&self, username: &str) -> DatabaseResult<Option<Account>> {
        let conn = get_connection(&self.pool)?;
        let account = conn.query_one(
            "SELECT * FROM accounts WHERE username = ?1",
            [username],
            Self::account_from_row,
        );
        match account {
            Ok(account) => Ok(Some(account)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::QueryError(e)),
        }
    }
}

/// In-memory stand-in used by the service tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryAccountRepository {
    accounts: std::sync::Mutex<Vec<Account>>,
}

#[cfg(test)]
impl AccountRepository for MemoryAccountRepository {
    fn create_account(&self, account: &Account) -> DatabaseResult<AccountId> {
        let mut accounts = self.accounts.lock().unwrap();
        let id = accounts.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        accounts.push(Account {
            id,
            ..account.clone()
        });
        Ok(id)
    }

    fn get_account_by_username(&self, username: &str) -> DatabaseResult<Option<Account>> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| a.username == username).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::testutil::memory_pool;

    #[test]
    fn test_create_and_fetch_account() {
        let repo = AccountRepositoryImpl::new(memory_pool());
        let id = repo
            .create_account(&Account {
                id: 0,
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password_hash: "hash".to_string(),
            })
            .unwrap();
        let stored = repo.get_account_by_username("alice").unwrap().unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.email, "alice@example.com");
        assert!(repo.get_account_by_username("bob").unwrap().is_none());
    }

    #[test]
    fn test_username_unique_in_schema() {
        let repo = AccountRepositoryImpl::new(memory_pool());
        let account = Account {
            id: 0,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
        };
        repo.create_account(&account).unwrap();
        assert!(matches!(
            repo.create_account(&account),
            Err(DatabaseError::QueryError(_))
        ));
    }
}
