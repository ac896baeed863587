use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::{
    DatabaseError,
    persistence::{DatabaseResult, get_connection},
    r#match::{Match, MatchId, MatchScore},
    team::TeamId,
};

pub trait MatchRepository {
    fn create_match(&self, m: &Match) -> DatabaseResult<MatchId>;
    fn get_match(&self, id: MatchId) -> DatabaseResult<Option<Match>>;
    fn get_matches(&self) -> DatabaseResult<Vec<Match>>;
    fn update_score(&self, id: MatchId, score: &MatchScore) -> DatabaseResult<usize>;
    fn set_winner(&self, id: MatchId, winner_id: Option<TeamId>) -> DatabaseResult<usize>;
    fn delete_match(&self, id: MatchId) -> DatabaseResult<usize>;
}

pub struct MatchRepositoryImpl {
    pool: Pool<SqliteConnectionManager>,
}

impl MatchRepositoryImpl {
    pub fn new(pool: Pool<SqliteConnectionManager>) -> Self {
        Self { pool }
    }

    fn match_from_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
        let timestamp: i64 = row.get("date")?;
        let date = chrono::DateTime::from_timestamp(timestamp, 0).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Integer,
                format!("invalid timestamp: {}", timestamp).into(),
            )
        })?;
        Ok(Match {
            id: row.get("id")?,
            team1_id: row.get("team1_id")?,
            team2_id: row.get("team2_id")?,
            date,
            score: MatchScore {
                team1_runs: row.get("team1_runs")?,
                team1_overs: row.get("team1_overs")?,
                team1_wickets: row.get("team1_wickets")?,
                team2_runs: row.get("team2_runs")?,
                team2_overs: row.get("team2_overs")?,
                team2_wickets: row.get("team2_wickets")?,
            },
            winner_id: row.get("winner_id")?,
        })
    }
}

impl MatchRepository for MatchRepositoryImpl {
    fn create_match(&self, m: &Match) -> DatabaseResult<MatchId> {
        let conn = get_connection(&self.pool)?;
        conn.execute(
            "INSERT INTO matches (team1_id, team2_id, date, team1_runs, team1_overs, team1_wickets, team2_runs, team2_overs, team2_wickets, winner_id) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            rusqlite::params![
                m.team1_id,
                m.team2_id,
                m.date.timestamp(),
                m.score.team1_runs,
                m.score.team1_overs,
                m.score.team1_wickets,
                m.score.team2_runs,
                m.score.team2_overs,
                m.score.team2_wickets,
                m.winner_id,
            ],
        )
        .map_err(DatabaseError::QueryError)?;
        Ok(conn.last_insert_rowid())
    }

    fn get_match(&self, id: MatchId) -> DatabaseResult<Option<Match>> {
        let conn = get_connection(&self.pool)?;
        let m = conn.query_one(
            "SELECT * FROM matches WHERE id = ?1",
            [id],
            Self::match_from_row,
        );
        match m {
            Ok(m) => Ok(Some(m)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::QueryError(e)),
        }
    }

    fn get_matches(&self) -> DatabaseResult<Vec<Match>> {
        let conn = get_connection(&self.pool)?;
        let mut stmt = conn
            .prepare("SELECT * FROM matches ORDER BY date DESC, id DESC")
            .map_err(DatabaseError::QueryError)?;
        let match_iter = stmt
            .query_map([], Self::match_from_row)
            .map_err(DatabaseError::QueryError)?;

        let mut matches = Vec::new();
        for m in match_iter {
            matches.push(m.map_err(DatabaseError::QueryError)?);
        }
        Ok(matches)
    }

    fn update_score(&self, id: MatchId, score: &MatchScore) -> DatabaseResult<usize> {
        let conn = get_connection(&self.pool)?;
        conn.execute(
            "UPDATE matches SET team1_runs = ?1, team1_overs = ?2, team1_wickets = ?3, team2_runs = ?4, team2_overs = ?5, team2_wickets = ?6 WHERE id = ?7",
            rusqlite::params![
                score.team1_runs,
                score.team1_overs,
                score.team1_wickets,
                score.team2_runs,
                score.team2_overs,
                score.team2_wickets,
                id,
            ],
        )
        .map_err(DatabaseError::QueryError)
    }

    fn set_winner(&self, id: MatchId, winner_id: Option<TeamId>) -> DatabaseResult<usize> {
        let conn = get_connection(&self.pool)?;
        conn.execute(
            "UPDATE matches SET winner_id = ?1 WHERE id = ?2",
            rusqlite::params![winner_id, id],
        )
        .map_err(DatabaseError::QueryError)
    }

    fn delete_match(&self, id: MatchId) -> DatabaseResult<usize> {
        let conn = get_connection(&self.pool)?;
        conn.execute("DELETE FROM matches WHERE id = ?1", [id])
            .map_err(DatabaseError::QueryError)
    }
}

/// In-memory stand-in used by the service tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryMatchRepository {
    matches: std::sync::Mutex<Vec<Match>>,
}

#[cfg(test)]
impl MatchRepository for MemoryMatchRepository {
    fn create_match(&self, m: &Match) -> DatabaseResult<MatchId> {
        let mut matches = self.matches.lock().unwrap();
        let id = matches.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        matches.push(Match { id, ..m.clone() });
        Ok(id)
    }

    fn get_match(&self, id: MatchId) -> DatabaseResult<Option<Match>> {
        let matches = self.matches.lock().unwrap();
        Ok(matches.iter().find(|m| m.id == id).cloned())
    }

    fn get_matches(&self) -> DatabaseResult<Vec<Match>> {
        Ok(self.matches.lock().unwrap().clone())
    }

    fn update_score(&self, id: MatchId, score: &MatchScore) -> DatabaseResult<usize> {
        let mut matches = self.matches.lock().unwrap();
        let Some(m) = matches.iter_mut().find(|m| m.id == id) else {
            return Ok(0);
        };
        m.score = score.clone();
        Ok(1)
    }

    fn set_winner(&self, id: MatchId, winner_id: Option<TeamId>) -> DatabaseResult<usize> {
        let mut matches = self.matches.lock().unwrap();
        let Some(m) = matches.iter_mut().find(|m| m.id == id) else {
            return Ok(0);
        };
        m.winner_id = winner_id;
        Ok(1)
    }

    fn delete_match(&self, id: MatchId) -> DatabaseResult<usize> {
        let mut matches = self.matches.lock().unwrap();
        let before = matches.len();
        matches.retain(|m| m.id != id);
        Ok(before - matches.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        persistence::{
            teams::{TeamRepository, TeamRepositoryImpl},
            testutil::memory_pool,
        },
        team::Team,
    };

    fn seed_team(pool: &Pool<SqliteConnectionManager>, name: &str) -> TeamId {
        TeamRepositoryImpl::new(pool.clone())
            .create_team(&Team {
                id: 0,
                name: name.to_string(),
                total_players: 11,
                overs: 20,
                wickets: 10,
                disqualified: false,
            })
            .unwrap()
    }

    fn scheduled_match(team1_id: TeamId, team2_id: TeamId) -> Match {
        Match {
            id: 0,
            team1_id,
            team2_id,
            date: chrono::Utc::now(),
            score: MatchScore::default(),
            winner_id: None,
        }
    }

    #[test]
    fn test_score_round_trip() {
        let pool = memory_pool();
        let team1_id = seed_team(&pool, "Lions");
        let team2_id = seed_team(&pool, "Tigers");
        let repo = MatchRepositoryImpl::new(pool);
        let id = repo
            .create_match(&scheduled_match(team1_id, team2_id))
            .unwrap();

        let score = MatchScore {
            team1_runs: 150,
            team1_overs: 20.0,
            team1_wickets: 4,
            team2_runs: 120,
            team2_overs: 19.3,
            team2_wickets: 10,
        };
        assert_eq!(repo.update_score(id, &score).unwrap(), 1);
        assert_eq!(repo.set_winner(id, Some(team1_id)).unwrap(), 1);

        let stored = repo.get_match(id).unwrap().unwrap();
        assert_eq!(stored.score, score);
        assert_eq!(stored.winner_id, Some(team1_id));
    }

    #[test]
    fn test_matches_ordered_newest_first() {
        let pool = memory_pool();
        let team1_id = seed_team(&pool, "Lions");
        let team2_id = seed_team(&pool, "Tigers");
        let repo = MatchRepositoryImpl::new(pool);
        let first = repo
            .create_match(&scheduled_match(team1_id, team2_id))
            .unwrap();
        let second = repo
            .create_match(&scheduled_match(team2_id, team1_id))
            .unwrap();

        let matches = repo.get_matches().unwrap();
        assert_eq!(
            matches.iter().map(|m| m.id).collect::<Vec<_>>(),
            vec![second, first]
        );
    }

    #[test]
    fn test_deleting_team_removes_its_matches() {
        let pool = memory_pool();
        let team1_id = seed_team(&pool, "Lions");
        let team2_id = seed_team(&pool, "Tigers");
        let repo = MatchRepositoryImpl::new(pool.clone());
        let id = repo
            .create_match(&scheduled_match(team1_id, team2_id))
            .unwrap();

        TeamRepositoryImpl::new(pool).delete_team(team2_id).unwrap();
        assert!(repo.get_match(id).unwrap().is_none());
    }

    #[test]
    fn test_deleting_winner_team_nullifies_reference() {
        let pool = memory_pool();
        let team1_id = seed_team(&pool, "Lions");
        let team2_id = seed_team(&pool, "Tigers");
        let third_id = seed_team(&pool, "Bears");
        let repo = MatchRepositoryImpl::new(pool.clone());
        let id = repo
            .create_match(&scheduled_match(team1_id, team2_id))
            .unwrap();
        repo.set_winner(id, Some(third_id)).unwrap();

        TeamRepositoryImpl::new(pool).delete_team(third_id).unwrap();

        let stored = repo.get_match(id).unwrap().unwrap();
        assert_eq!(stored.winner_id, None);
    }
}
