use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::{
    AppState, ServiceError,
    jwt::Claims,
    r#match::{Match, MatchId, MatchScore},
    team::TeamId,
};

#[derive(Deserialize)]
pub struct MatchPayload {
    pub team1_id: TeamId,
    pub team2_id: TeamId,
}

#[derive(serde::Serialize)]
pub struct JsonMatchResponse {
    id: MatchId,
    team1_id: TeamId,
    team2_id: TeamId,
    date: String,
    team1_runs: u32,
    team1_overs: f64,
    team1_wickets: u32,
    team2_runs: u32,
    team2_overs: f64,
    team2_wickets: u32,
    winner_id: Option<TeamId>,
}

impl From<Match> for JsonMatchResponse {
    fn from(m: Match) -> Self {
        Self {
            id: m.id,
            team1_id: m.team1_id,
            team2_id: m.team2_id,
            date: m.date.to_rfc3339(),
            team1_runs: m.score.team1_runs,
            team1_overs: m.score.team1_overs,
            team1_wickets: m.score.team1_wickets,
            team2_runs: m.score.team2_runs,
            team2_overs: m.score.team2_overs,
            team2_wickets: m.score.team2_wickets,
            winner_id: m.winner_id,
        }
    }
}

pub async fn get_all(
    _claims: Claims,
    State(state): State<AppState>,
) -> Result<Json<Vec<JsonMatchResponse>>, ServiceError> {
    let matches = state.match_service.get_matches()?;
    Ok(Json(matches.into_iter().map(Into::into).collect()))
}

pub async fn get_by_id(
    _claims: Claims,
    Path(id): Path<MatchId>,
    State(state): State<AppState>,
) -> Result<Json<JsonMatchResponse>, ServiceError> {
    let m = state.match_service.get_match(id)?;
    Ok(Json(m.into()))
}

pub async fn create(
    _claims: Claims,
    State(state): State<AppState>,
    Json(payload): Json<MatchPayload>,
) -> Result<Json<JsonMatchResponse>, ServiceError> {
    let m = state
        .match_service
        .schedule_match(payload.team1_id, payload.team2_id)?;
    Ok(Json(m.into()))
}

/// Records the score and immediately decides the winner from it.
pub async fn update_score(
    _claims: Claims,
    Path(id): Path<MatchId>,
    State(state): State<AppState>,
    Json(score): Json<MatchScore>,
) -> Result<Json<JsonMatchResponse>, ServiceError> {
    state.match_service.update_score(id, score)?;
    let m = state.match_service.decide_winner(id)?;
    Ok(Json(m.into()))
}

pub async fn remove(
    _claims: Claims,
    Path(id): Path<MatchId>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    state.match_service.delete_match(id)?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}
