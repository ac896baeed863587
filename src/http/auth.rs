use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::{AppState, ServiceError, account::Account};

#[derive(Deserialize)]
pub struct RegisterPayload {
    pub username: String,
    pub email: String,
    pub password1: String,
    pub password2: String,
}

#[derive(Deserialize)]
pub struct AuthPayload {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthBody {
    pub token: String,
}

#[derive(Serialize)]
pub struct JsonAccountResponse {
    id: i64,
    username: String,
    email: String,
}

impl From<Account> for JsonAccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
        }
    }
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterPayload>,
) -> Result<Json<JsonAccountResponse>, ServiceError> {
    let account = state.account_service.register(
        &payload.username,
        &payload.email,
        &payload.password1,
        &payload.password2,
    )?;
    Ok(Json(account.into()))
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<AuthPayload>,
) -> Result<Json<AuthBody>, ServiceError> {
    let token = state
        .account_service
        .login(&payload.username, &payload.password)?;
    Ok(Json(AuthBody { token }))
}
