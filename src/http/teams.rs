use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState, ServiceError,
    jwt::Claims,
    team::{Team, TeamDraft, TeamId},
};

#[derive(serde::Serialize)]
pub struct JsonTeamResponse {
    id: TeamId,
    name: String,
    total_players: i64,
    overs: i64,
    wickets: i64,
    disqualified: bool,
}

impl From<Team> for JsonTeamResponse {
    fn from(team: Team) -> Self {
        Self {
            id: team.id,
            name: team.name,
            total_players: team.total_players,
            overs: team.overs,
            wickets: team.wickets,
            disqualified: team.disqualified,
        }
    }
}

pub async fn get_all(
    _claims: Claims,
    State(state): State<AppState>,
) -> Result<Json<Vec<JsonTeamResponse>>, ServiceError> {
    let teams = state.team_service.get_teams()?;
    Ok(Json(teams.into_iter().map(Into::into).collect()))
}

pub async fn get_by_id(
    _claims: Claims,
    Path(id): Path<TeamId>,
    State(state): State<AppState>,
) -> Result<Json<JsonTeamResponse>, ServiceError> {
    let team = state.team_service.get_team(id)?;
    Ok(Json(team.into()))
}

pub async fn create(
    _claims: Claims,
    State(state): State<AppState>,
    Json(draft): Json<TeamDraft>,
) -> Result<Json<JsonTeamResponse>, ServiceError> {
    let team = state.team_service.create_team(draft)?;
    Ok(Json(team.into()))
}

pub async fn update(
    _claims: Claims,
    Path(id): Path<TeamId>,
    State(state): State<AppState>,
    Json(draft): Json<TeamDraft>,
) -> Result<Json<JsonTeamResponse>, ServiceError> {
    let team = state.team_service.update_team(id, draft)?;
    Ok(Json(team.into()))
}

pub async fn remove(
    _claims: Claims,
    Path(id): Path<TeamId>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    state.team_service.delete_team(id)?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}
