use log::info;

use crate::{
    ArcAccountRepository, ServiceError, ServiceResult, jwt::generate_jwt, util::validate_email,
};

pub type AccountId = i64;

#[derive(Clone, Debug)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

pub trait AccountService {
    fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        password_confirm: &str,
    ) -> ServiceResult<Account>;
    fn login(&self, username: &str, password: &str) -> ServiceResult<String>;
}

pub struct AccountServiceImpl {
    account_repository: ArcAccountRepository,
}

impl AccountServiceImpl {
    pub fn new(account_repository: ArcAccountRepository) -> Self {
        Self { account_repository }
    }
}

impl AccountService for AccountServiceImpl {
    fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        password_confirm: &str,
    ) -> ServiceResult<Account> {
        let username = username.trim();
        if username.is_empty() {
            return ServiceError::validation("Username must not be empty");
        }
        if password != password_confirm {
            return ServiceError::validation("Passwords do not match");
        }
        if password.is_empty() {
            return ServiceError::validation("Password must not be empty");
        }
        let email = validate_email(email)?;
        if self
            .account_repository
            .get_account_by_username(username)?
            .is_some()
        {
            return ServiceError::validation("Username already taken");
        }
        let password_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
            .map_err(|e| ServiceError::Internal(format!("Failed to hash password: {}", e)))?;
        let account = Account {
            id: 0,
            username: username.to_string(),
            email,
            password_hash,
        };
        let id = self.account_repository.create_account(&account)?;
        info!("Registered account '{}'", account.username);
        Ok(Account { id, ..account })
    }

    fn login(&self, username: &str, password: &str) -> ServiceResult<String> {
        let Some(account) = self.account_repository.get_account_by_username(username)? else {
            return ServiceError::unauthorized("Invalid username or password");
        };
        let valid = bcrypt::verify(password, &account.password_hash)
            .map_err(|e| ServiceError::Internal(format!("Failed to verify password: {}", e)))?;
        if !valid {
            return ServiceError::unauthorized("Invalid username or password");
        }
        info!("Account '{}' logged in", account.username);
        Ok(generate_jwt(&account.username))
    }
}
