use log::info;
use serde::Deserialize;

use crate::{ArcTeamRepository, ServiceError, ServiceResult, persistence::teams::TeamUpdate};

pub type TeamId = i64;

#[derive(Clone, Debug)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub total_players: i64,
    pub overs: i64,
    pub wickets: i64,
    pub disqualified: bool,
}

/// Fields accepted when creating or updating a team.
/// Wickets are derived and never accepted from the outside.
#[derive(Clone, Debug, Deserialize)]
pub struct TeamDraft {
    pub name: String,
    pub total_players: i64,
    pub overs: i64,
}

/// Wickets a team can lose in an innings, derived from the roster size.
pub fn wickets_for(total_players: i64) -> i64 {
    total_players - 1
}

pub fn validate_team(
    total_players: i64,
    overs: i64,
    name: &str,
    existing_names: &[String],
) -> ServiceResult<()> {
    if total_players < 2 {
        return ServiceError::validation("A team must have at least 2 players");
    }
    if overs < 1 {
        return ServiceError::validation("Overs must be at least 1");
    }
    let name = name.trim();
    if name.is_empty() {
        return ServiceError::validation("Team name must not be empty");
    }
    if existing_names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
        return ServiceError::validation("A team with this name already exists");
    }
    Ok(())
}

pub trait TeamService {
    fn create_team(&self, draft: TeamDraft) -> ServiceResult<Team>;
    fn get_teams(&self) -> ServiceResult<Vec<Team>>;
    fn get_team(&self, id: TeamId) -> ServiceResult<Team>;
    fn update_team(&self, id: TeamId, draft: TeamDraft) -> ServiceResult<Team>;
    fn delete_team(&self, id: TeamId) -> ServiceResult<()>;
}

pub struct TeamServiceImpl {
    team_repository: ArcTeamRepository,
}

impl TeamServiceImpl {
    pub fn new(team_repository: ArcTeamRepository) -> Self {
        Self { team_repository }
    }

    fn fetch_team(&self, id: TeamId) -> ServiceResult<Team> {
        match self.team_repository.get_team(id)? {
            Some(team) => Ok(team),
            None => ServiceError::not_found(format!("Team with id {} not found", id)),
        }
    }
}

impl TeamService for TeamServiceImpl {
    fn create_team(&self, draft: TeamDraft) -> ServiceResult<Team> {
        let existing_names = self.team_repository.get_team_names()?;
        validate_team(
            draft.total_players,
            draft.overs,
            &draft.name,
            &existing_names,
        )?;
        let team = Team {
            id: 0,
            name: draft.name.trim().to_string(),
            total_players: draft.total_players,
            overs: draft.overs,
            wickets: wickets_for(draft.total_players),
            disqualified: false,
        };
        let id = self.team_repository.create_team(&team)?;
        info!("Created team '{}'", team.name);
        Ok(Team { id, ..team })
    }

    fn get_teams(&self) -> ServiceResult<Vec<Team>> {
        Ok(self.team_repository.get_teams()?)
    }

    fn get_team(&self, id: TeamId) -> ServiceResult<Team> {
        self.fetch_team(id)
    }

    fn update_team(&self, id: TeamId, draft: TeamDraft) -> ServiceResult<Team> {
        let current = self.fetch_team(id)?;
        // Keeping the current name must not trip the uniqueness check.
        let existing_names = self
            .team_repository
            .get_team_names()?
            .into_iter()
            .filter(|n| !n.eq_ignore_ascii_case(&current.name))
            .collect::<Vec<_>>();
        validate_team(
            draft.total_players,
            draft.overs,
            &draft.name,
            &existing_names,
        )?;
        let update = TeamUpdate {
            name: Some(draft.name.trim().to_string()),
            total_players: Some(draft.total_players),
            overs: Some(draft.overs),
            wickets: Some(wickets_for(draft.total_players)),
            disqualified: None,
        };
        self.team_repository.update_team(id, &update)?;
        self.fetch_team(id)
    }

    fn delete_team(&self, id: TeamId) -> ServiceResult<()> {
        // Players and match references go with the team; the store's
        // referential rules handle both.
        let deleted = self.team_repository.delete_team(id)?;
        if deleted == 0 {
            return ServiceError::not_found(format!("Team with id {} not found", id));
        }
        info!("Deleted team {}", id);
        Ok(())
    }
}
