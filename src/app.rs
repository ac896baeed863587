use std::sync::Arc;

use axum::response::IntoResponse;
use thiserror::Error;

use crate::{
    account::{AccountService, AccountServiceImpl},
    persistence::{
        accounts::{AccountRepository, AccountRepositoryImpl},
        create_pool,
        matches::{MatchRepository, MatchRepositoryImpl},
        players::{PlayerRepository, PlayerRepositoryImpl},
        teams::{TeamRepository, TeamRepositoryImpl},
    },
    player::{PlayerService, PlayerServiceImpl},
    r#match::{MatchService, MatchServiceImpl},
    team::{TeamService, TeamServiceImpl},
};

pub type ArcTeamService = Arc<Box<dyn TeamService + Send + Sync + 'static>>;
pub type ArcPlayerService = Arc<Box<dyn PlayerService + Send + Sync + 'static>>;
pub type ArcMatchService = Arc<Box<dyn MatchService + Send + Sync + 'static>>;
pub type ArcAccountService = Arc<Box<dyn AccountService + Send + Sync + 'static>>;

pub type ArcTeamRepository = Arc<Box<dyn TeamRepository + Send + Sync + 'static>>;
pub type ArcPlayerRepository = Arc<Box<dyn PlayerRepository + Send + Sync + 'static>>;
pub type ArcMatchRepository = Arc<Box<dyn MatchRepository + Send + Sync + 'static>>;
pub type ArcAccountRepository = Arc<Box<dyn AccountRepository + Send + Sync + 'static>>;

#[derive(Clone)]
pub struct AppState {
    pub team_service: ArcTeamService,
    pub player_service: ArcPlayerService,
    pub match_service: ArcMatchService,
    pub account_service: ArcAccountService,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("roster full: {0}")]
    RosterFull(String),

    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("connection error: {0}")]
    ConnectionError(r2d2::Error),
    #[error("query error: {0}")]
    QueryError(rusqlite::Error),
}

impl ServiceError {
    pub fn validation<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Validation(msg.into()))
    }

    pub fn roster_full<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::RosterFull(msg.into()))
    }

    pub fn not_found<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::NotFound(msg.into()))
    }

    pub fn unauthorized<T, R>(msg: T) -> ServiceResult<R>
    where
        T: Into<String>,
    {
        Err(ServiceError::Unauthorized(msg.into()))
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::http::Response<axum::body::Body> {
        let (status, msg) = match self {
            ServiceError::NotFound(msg) => (axum::http::StatusCode::NOT_FOUND, msg),
            ServiceError::Unauthorized(msg) => (axum::http::StatusCode::UNAUTHORIZED, msg),
            ServiceError::Validation(msg) => (axum::http::StatusCode::BAD_REQUEST, msg),
            ServiceError::RosterFull(msg) => (axum::http::StatusCode::CONFLICT, msg),
            ServiceError::Database(_) => (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Database error".to_string(),
            ),
            ServiceError::Internal(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        let body = serde_json::json!({ "error": msg });
        (status, axum::Json(body)).into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub fn construct_app() -> AppState {
    let pool = create_pool();

    let team_repository: ArcTeamRepository =
        Arc::new(Box::new(TeamRepositoryImpl::new(pool.clone())));
    let player_repository: ArcPlayerRepository =
        Arc::new(Box::new(PlayerRepositoryImpl::new(pool.clone())));
    let match_repository: ArcMatchRepository =
        Arc::new(Box::new(MatchRepositoryImpl::new(pool.clone())));
    let account_repository: ArcAccountRepository =
        Arc::new(Box::new(AccountRepositoryImpl::new(pool)));

    let team_service: ArcTeamService =
        Arc::new(Box::new(TeamServiceImpl::new(team_repository.clone())));
    let player_service: ArcPlayerService = Arc::new(Box::new(PlayerServiceImpl::new(
        team_repository.clone(),
        player_repository,
    )));
    let match_service: ArcMatchService = Arc::new(Box::new(MatchServiceImpl::new(
        team_repository,
        match_repository,
    )));
    let account_service: ArcAccountService =
        Arc::new(Box::new(AccountServiceImpl::new(account_repository)));

    AppState {
        team_service,
        player_service,
        match_service,
        account_service,
    }
}
