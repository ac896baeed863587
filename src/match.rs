use chrono::{DateTime, Utc};
use log::info;
use serde::Deserialize;

use crate::{
    ArcMatchRepository, ArcTeamRepository, ServiceError, ServiceResult,
    scoring::{self, MatchOutcome},
    team::{Team, TeamId},
};

pub type MatchId = i64;

/// Recorded innings figures for both sides. Runs and wickets are counts;
/// overs carry a single fractional digit (e.g. 10.2 means 10 overs, 2 balls).
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct MatchScore {
    pub team1_runs: u32,
    pub team1_overs: f64,
    pub team1_wickets: u32,
    pub team2_runs: u32,
    pub team2_overs: f64,
    pub team2_wickets: u32,
}

#[derive(Clone, Debug)]
pub struct Match {
    pub id: MatchId,
    pub team1_id: TeamId,
    pub team2_id: TeamId,
    pub date: DateTime<Utc>,
    pub score: MatchScore,
    pub winner_id: Option<TeamId>,
}

pub fn validate_match(team1_id: TeamId, team2_id: TeamId) -> ServiceResult<()> {
    if team1_id == team2_id {
        return ServiceError::validation("A team cannot play against itself");
    }
    Ok(())
}

fn has_single_fractional_digit(overs: f64) -> bool {
    let tenths = overs * 10.0;
    (tenths - tenths.round()).abs() < 1e-6
}

pub fn validate_score(score: &MatchScore) -> ServiceResult<()> {
    for overs in [score.team1_overs, score.team2_overs] {
        if !overs.is_finite() || overs < 0.0 || overs > 999.9 {
            return ServiceError::validation("Overs must be between 0 and 999.9");
        }
        if !has_single_fractional_digit(overs) {
            return ServiceError::validation("Overs are recorded to one decimal place");
        }
    }
    Ok(())
}

pub trait MatchService {
    fn schedule_match(&self, team1_id: TeamId, team2_id: TeamId) -> ServiceResult<Match>;
    fn get_matches(&self) -> ServiceResult<Vec<Match>>;
    fn get_match(&self, id: MatchId) -> ServiceResult<Match>;
    fn update_score(&self, id: MatchId, score: MatchScore) -> ServiceResult<Match>;
    fn decide_winner(&self, id: MatchId) -> ServiceResult<Match>;
    fn delete_match(&self, id: MatchId) -> ServiceResult<()>;
}

pub struct MatchServiceImpl {
    team_repository: ArcTeamRepository,
    match_repository: ArcMatchRepository,
}

impl MatchServiceImpl {
    pub fn new(team_repository: ArcTeamRepository, match_repository: ArcMatchRepository) -> Self {
        Self {
            team_repository,
            match_repository,
        }
    }

    fn fetch_match(&self, id: MatchId) -> ServiceResult<Match> {
        match self.match_repository.get_match(id)? {
            Some(m) => Ok(m),
            None => ServiceError::not_found(format!("Match with id {} not found", id)),
        }
    }

    fn fetch_team(&self, id: TeamId) -> ServiceResult<Team> {
        match self.team_repository.get_team(id)? {
            Some(team) => Ok(team),
            None => ServiceError::not_found(format!("Team with id {} not found", id)),
        }
    }
}

impl MatchService for MatchServiceImpl {
    fn schedule_match(&self, team1_id: TeamId, team2_id: TeamId) -> ServiceResult<Match> {
        validate_match(team1_id, team2_id)?;
        let team1 = self.fetch_team(team1_id)?;
        let team2 = self.fetch_team(team2_id)?;
        let m = Match {
            id: 0,
            team1_id,
            team2_id,
            date: Utc::now(),
            score: MatchScore::default(),
            winner_id: None,
        };
        let id = self.match_repository.create_match(&m)?;
        info!("Scheduled match '{}' vs '{}'", team1.name, team2.name);
        Ok(Match { id, ..m })
    }

    fn get_matches(&self) -> ServiceResult<Vec<Match>> {
        Ok(self.match_repository.get_matches()?)
    }

    fn get_match(&self, id: MatchId) -> ServiceResult<Match> {
        self.fetch_match(id)
    }

    fn update_score(&self, id: MatchId, score: MatchScore) -> ServiceResult<Match> {
        validate_score(&score)?;
        let updated = self.match_repository.update_score(id, &score)?;
        if updated == 0 {
            return ServiceError::not_found(format!("Match with id {} not found", id));
        }
        self.fetch_match(id)
    }

    fn decide_winner(&self, id: MatchId) -> ServiceResult<Match> {
        let m = self.fetch_match(id)?;
        let winner_id = match scoring::decide_winner(m.score.team1_runs, m.score.team2_runs) {
            MatchOutcome::Team1 => Some(m.team1_id),
            MatchOutcome::Team2 => Some(m.team2_id),
            MatchOutcome::Draw => None,
        };
        self.match_repository.set_winner(id, winner_id)?;
        match winner_id {
            Some(team_id) => info!("Match {} decided, winner is team {}", id, team_id),
            None => info!("Match {} decided, draw", id),
        }
        Ok(Match { winner_id, ..m })
    }

    fn delete_match(&self, id: MatchId) -> ServiceResult<()> {
        let deleted = self.match_repository.delete_match(id)?;
        if deleted == 0 {
            return ServiceError::not_found(format!("Match with id {} not found", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        ArcTeamRepository,
        persistence::{matches::MemoryMatchRepository, teams::MemoryTeamRepository},
        team::{TeamDraft, TeamService, TeamServiceImpl},
    };

    struct Fixture {
        match_service: MatchServiceImpl,
        team1: Team,
        team2: Team,
    }

    fn fixture() -> Fixture {
        let team_repository: ArcTeamRepository = Arc::new(Box::new(MemoryTeamRepository::default()));
        let team_service = TeamServiceImpl::new(team_repository.clone());
        let team1 = team_service
            .create_team(TeamDraft {
                name: "Lions".to_string(),
                total_players: 11,
                overs: 20,
            })
            .unwrap();
        let team2 = team_service
            .create_team(TeamDraft {
                name: "Tigers".to_string(),
                total_players: 11,
                overs: 20,
            })
            .unwrap();
        let match_service = MatchServiceImpl::new(
            team_repository,
            Arc::new(Box::new(MemoryMatchRepository::default())),
        );
        Fixture {
            match_service,
            team1,
            team2,
        }
    }

    fn score(team1_runs: u32, team2_runs: u32) -> MatchScore {
        MatchScore {
            team1_runs,
            team1_overs: 20.0,
            team1_wickets: 4,
            team2_runs,
            team2_overs: 19.3,
            team2_wickets: 10,
        }
    }

    #[test]
    fn test_rejects_match_against_itself() {
        let f = fixture();
        let result = f.match_service.schedule_match(f.team1.id, f.team1.id);
        assert!(matches!(result, Err(ServiceError::Validation(_))));
    }

    #[test]
    fn test_rejects_unknown_teams() {
        let f = fixture();
        let result = f.match_service.schedule_match(f.team1.id, 42);
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn test_scheduled_match_has_zero_scores_and_no_winner() {
        let f = fixture();
        let m = f
            .match_service
            .schedule_match(f.team1.id, f.team2.id)
            .unwrap();
        assert_eq!(m.score, MatchScore::default());
        assert_eq!(m.winner_id, None);
    }

    #[test]
    fn test_update_score_then_decide_picks_higher_runs() {
        let f = fixture();
        let m = f
            .match_service
            .schedule_match(f.team1.id, f.team2.id)
            .unwrap();

        f.match_service.update_score(m.id, score(150, 120)).unwrap();
        let decided = f.match_service.decide_winner(m.id).unwrap();
        assert_eq!(decided.winner_id, Some(f.team1.id));

        f.match_service.update_score(m.id, score(120, 150)).unwrap();
        let decided = f.match_service.decide_winner(m.id).unwrap();
        assert_eq!(decided.winner_id, Some(f.team2.id));
    }

    #[test]
    fn test_draw_clears_previous_winner() {
        let f = fixture();
        let m = f
            .match_service
            .schedule_match(f.team1.id, f.team2.id)
            .unwrap();
        f.match_service.update_score(m.id, score(150, 120)).unwrap();
        f.match_service.decide_winner(m.id).unwrap();

        f.match_service.update_score(m.id, score(140, 140)).unwrap();
        let decided = f.match_service.decide_winner(m.id).unwrap();
        assert_eq!(decided.winner_id, None);
        assert_eq!(f.match_service.get_match(m.id).unwrap().winner_id, None);
    }

    #[test]
    fn test_update_does_not_decide_on_its_own() {
        let f = fixture();
        let m = f
            .match_service
            .schedule_match(f.team1.id, f.team2.id)
            .unwrap();
        let updated = f.match_service.update_score(m.id, score(150, 120)).unwrap();
        assert_eq!(updated.winner_id, None);
    }

    #[test]
    fn test_rejects_invalid_overs() {
        let f = fixture();
        let m = f
            .match_service
            .schedule_match(f.team1.id, f.team2.id)
            .unwrap();
        for overs in [-1.0, 1000.0, 10.25] {
            let result = f.match_service.update_score(
                m.id,
                MatchScore {
                    team1_overs: overs,
                    ..score(100, 100)
                },
            );
            assert!(matches!(result, Err(ServiceError::Validation(_))));
        }
    }
}
