use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    AppState, ServiceError,
    jwt::Claims,
    player::{Player, PlayerDraft, PlayerId, PlayerType},
    team::TeamId,
};

#[derive(serde::Serialize)]
pub struct JsonPlayerResponse {
    id: PlayerId,
    team_id: TeamId,
    number: i64,
    name: String,
    player_type: PlayerType,
}

impl From<Player> for JsonPlayerResponse {
    fn from(player: Player) -> Self {
        Self {
            id: player.id,
            team_id: player.team_id,
            number: player.number,
            name: player.name,
            player_type: player.player_type,
        }
    }
}

pub async fn get_all(
    _claims: Claims,
    State(state): State<AppState>,
) -> Result<Json<Vec<JsonPlayerResponse>>, ServiceError> {
    let players = state.player_service.get_players()?;
    Ok(Json(players.into_iter().map(Into::into).collect()))
}

pub async fn get_by_team(
    _claims: Claims,
    Path(team_id): Path<TeamId>,
    State(state): State<AppState>,
) -> Result<Json<Vec<JsonPlayerResponse>>, ServiceError> {
    let players = state.player_service.get_team_players(team_id)?;
    Ok(Json(players.into_iter().map(Into::into).collect()))
}

pub async fn create(
    _claims: Claims,
    Path(team_id): Path<TeamId>,
    State(state): State<AppState>,
    Json(draft): Json<PlayerDraft>,
) -> Result<Json<JsonPlayerResponse>, ServiceError> {
    let player = state.player_service.add_player(team_id, draft)?;
    Ok(Json(player.into()))
}

pub async fn update(
    _claims: Claims,
    Path(id): Path<PlayerId>,
    State(state): State<AppState>,
    Json(draft): Json<PlayerDraft>,
) -> Result<Json<JsonPlayerResponse>, ServiceError> {
    let player = state.player_service.update_player(id, draft)?;
    Ok(Json(player.into()))
}

pub async fn remove(
    _claims: Claims,
    Path(id): Path<PlayerId>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    state.player_service.delete_player(id)?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}
