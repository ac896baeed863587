use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    ArcPlayerRepository, ArcTeamRepository, ServiceError, ServiceResult,
    persistence::players::PlayerUpdate, team::TeamId,
};

pub type PlayerId = i64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerType {
    Batsman,
    Bowler,
    Allrounder,
}

impl PlayerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerType::Batsman => "batsman",
            PlayerType::Bowler => "bowler",
            PlayerType::Allrounder => "allrounder",
        }
    }

    pub fn parse(value: &str) -> Option<PlayerType> {
        match value {
            "batsman" => Some(PlayerType::Batsman),
            "bowler" => Some(PlayerType::Bowler),
            "allrounder" => Some(PlayerType::Allrounder),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub id: PlayerId,
    pub team_id: TeamId,
    pub number: i64,
    pub name: String,
    pub player_type: PlayerType,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PlayerDraft {
    pub number: i64,
    pub name: String,
    pub player_type: PlayerType,
}

/// A team's roster may never exceed its configured size.
pub fn validate_player_capacity(
    current_player_count: i64,
    team_total_players: i64,
) -> ServiceResult<()> {
    if current_player_count >= team_total_players {
        return ServiceError::roster_full("Team already has the maximum number of players");
    }
    Ok(())
}

pub trait PlayerService {
    fn add_player(&self, team_id: TeamId, draft: PlayerDraft) -> ServiceResult<Player>;
    fn get_players(&self) -> ServiceResult<Vec<Player>>;
    fn get_team_players(&self, team_id: TeamId) -> ServiceResult<Vec<Player>>;
    fn update_player(&self, id: PlayerId, draft: PlayerDraft) -> ServiceResult<Player>;
    fn delete_player(&self, id: PlayerId) -> ServiceResult<()>;
}

pub struct PlayerServiceImpl {
    team_repository: ArcTeamRepository,
    player_repository: ArcPlayerRepository,
}

impl PlayerServiceImpl {
    pub fn new(team_repository: ArcTeamRepository, player_repository: ArcPlayerRepository) -> Self {
        Self {
            team_repository,
            player_repository,
        }
    }

    fn fetch_player(&self, id: PlayerId) -> ServiceResult<Player> {
        match self.player_repository.get_player(id)? {
            Some(player) => Ok(player),
            None => ServiceError::not_found(format!("Player with id {} not found", id)),
        }
    }
}

impl PlayerService for PlayerServiceImpl {
    fn add_player(&self, team_id: TeamId, draft: PlayerDraft) -> ServiceResult<Player> {
        let Some(team) = self.team_repository.get_team(team_id)? else {
            return ServiceError::not_found(format!("Team with id {} not found", team_id));
        };
        // Checked before the insert so a full roster performs no write.
        let current_count = self.player_repository.count_players(team_id)?;
        validate_player_capacity(current_count, team.total_players)?;
        let player = Player {
            id: 0,
            team_id,
            number: draft.number,
            name: draft.name,
            player_type: draft.player_type,
        };
        let id = self.player_repository.create_player(&player)?;
        info!("Added player '{}' to team '{}'", player.name, team.name);
        Ok(Player { id, ..player })
    }

    fn get_players(&self) -> ServiceResult<Vec<Player>> {
        Ok(self.player_repository.get_players()?)
    }

    fn get_team_players(&self, team_id: TeamId) -> ServiceResult<Vec<Player>> {
        if self.team_repository.get_team(team_id)?.is_none() {
            return ServiceError::not_found(format!("Team with id {} not found", team_id));
        }
        Ok(self.player_repository.get_players_by_team(team_id)?)
    }

    fn update_player(&self, id: PlayerId, draft: PlayerDraft) -> ServiceResult<Player> {
        self.fetch_player(id)?;
        let update = PlayerUpdate {
            number: Some(draft.number),
            name: Some(draft.name),
            player_type: Some(draft.player_type.as_str().to_string()),
        };
        self.player_repository.update_player(id, &update)?;
        self.fetch_player(id)
    }

    fn delete_player(&self, id: PlayerId) -> ServiceResult<()> {
        let deleted = self.player_repository.delete_player(id)?;
        if deleted == 0 {
            return ServiceError::not_found(format!("Player with id {} not found", id));
        }
        info!("Deleted player {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        ArcPlayerRepository, ArcTeamRepository,
        persistence::{
            players::{MemoryPlayerRepository, PlayerRepository},
            teams::MemoryTeamRepository,
        },
        team::{TeamDraft, TeamService, TeamServiceImpl},
    };

    struct Fixture {
        team_service: TeamServiceImpl,
        player_service: PlayerServiceImpl,
        player_repository: ArcPlayerRepository,
    }

    fn fixture() -> Fixture {
        let team_repository: ArcTeamRepository = Arc::new(Box::new(MemoryTeamRepository::default()));
        let player_repository: ArcPlayerRepository =
            Arc::new(Box::new(MemoryPlayerRepository::default()));
        Fixture {
            team_service: TeamServiceImpl::new(team_repository.clone()),
            player_service: PlayerServiceImpl::new(team_repository, player_repository.clone()),
            player_repository,
        }
    }

    fn draft(name: &str) -> PlayerDraft {
        PlayerDraft {
            number: 7,
            name: name.to_string(),
            player_type: PlayerType::Batsman,
        }
    }

    #[test]
    fn test_capacity_check() {
        assert!(validate_player_capacity(0, 2).is_ok());
        assert!(validate_player_capacity(1, 2).is_ok());
        assert!(matches!(
            validate_player_capacity(2, 2),
            Err(ServiceError::RosterFull(_))
        ));
        assert!(matches!(
            validate_player_capacity(3, 2),
            Err(ServiceError::RosterFull(_))
        ));
    }

    #[test]
    fn test_full_roster_performs_no_write() {
        let f = fixture();
        let team = f
            .team_service
            .create_team(TeamDraft {
                name: "Lions".to_string(),
                total_players: 2,
                overs: 20,
            })
            .unwrap();
        f.player_service.add_player(team.id, draft("One")).unwrap();
        f.player_service.add_player(team.id, draft("Two")).unwrap();
        let result = f.player_service.add_player(team.id, draft("Three"));
        assert!(matches!(result, Err(ServiceError::RosterFull(_))));
        assert_eq!(f.player_repository.count_players(team.id).unwrap(), 2);
    }

    #[test]
    fn test_add_player_to_missing_team() {
        let f = fixture();
        let result = f.player_service.add_player(42, draft("Nobody"));
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn test_update_player() {
        let f = fixture();
        let team = f
            .team_service
            .create_team(TeamDraft {
                name: "Lions".to_string(),
                total_players: 11,
                overs: 20,
            })
            .unwrap();
        let player = f.player_service.add_player(team.id, draft("One")).unwrap();
        let updated = f
            .player_service
            .update_player(
                player.id,
                PlayerDraft {
                    number: 99,
                    name: "One".to_string(),
                    player_type: PlayerType::Bowler,
                },
            )
            .unwrap();
        assert_eq!(updated.number, 99);
        assert_eq!(updated.player_type, PlayerType::Bowler);
    }

    #[test]
    fn test_player_type_round_trip() {
        for player_type in [
            PlayerType::Batsman,
            PlayerType::Bowler,
            PlayerType::Allrounder,
        ] {
            assert_eq!(PlayerType::parse(player_type.as_str()), Some(player_type));
        }
        assert_eq!(PlayerType::parse("wicketkeeper"), None);
    }
}
