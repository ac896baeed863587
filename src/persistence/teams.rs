use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::ToSql;

use crate::{
    DatabaseError,
    persistence::{DatabaseResult, get_connection, to_sql_option, update_entry},
    team::{Team, TeamId},
};

#[derive(Clone, Default)]
pub struct TeamUpdate {
    pub name: Option<String>,
    pub total_players: Option<i64>,
    pub overs: Option<i64>,
    pub wickets: Option<i64>,
    pub disqualified: Option<bool>,
}

pub trait TeamRepository {
    fn create_team(&self, team: &Team) -> DatabaseResult<TeamId>;
    fn get_team(&self, id: TeamId) -> DatabaseResult<Option<Team>>;
    fn get_teams(&self) -> DatabaseResult<Vec<Team>>;
    fn get_team_names(&self) -> DatabaseResult<Vec<String>>;
    fn update_team(&self, id: TeamId, update: &TeamUpdate) -> DatabaseResult<usize>;
    fn delete_team(&self, id: TeamId) -> DatabaseResult<usize>;
}

pub struct TeamRepositoryImpl {
    pool: Pool<SqliteConnectionManager>,
}

impl TeamRepositoryImpl {
    pub fn new(pool: Pool<SqliteConnectionManager>) -> Self {
        Self { pool }
    }

    fn team_from_row(row: &rusqlite::Row) -> rusqlite::Result<Team> {
        Ok(Team {
            id: row.get("id")?,
            name: row.get("name")?,
            total_players: row.get("total_players")?,
            overs: row.get("overs")?,
            wickets: row.get("wickets")?,
            disqualified: row.get("disqualified")?,
        })
    }
}

impl TeamRepository for TeamRepositoryImpl {
    fn create_team(&self, team: &Team) -> DatabaseResult<TeamId> {
        let conn = get_connection(&self.pool)?;
        conn.execute(
            "INSERT INTO teams (name, total_players, overs, wickets, disqualified) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                team.name,
                team.total_players,
                team.overs,
                team.wickets,
                team.disqualified,
            ],
        )
        .map_err(DatabaseError::QueryError)?;
        Ok(conn.last_insert_rowid())
    }

    fn get_team(&self, id: TeamId) -> DatabaseResult<Option<Team>> {
        let conn = get_connection(&self.pool)?;
        let team = conn.query_one(
            "SELECT * FROM teams WHERE id = ?1",
            [id],
            Self::team_from_row,
        );
        match team {
            Ok(team) => Ok(Some(team)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::QueryError(e)),
        }
    }

    fn get_teams(&self) -> DatabaseResult<Vec<Team>> {
        let conn = get_connection(&self.pool)?;
        let mut stmt = conn
            .prepare("SELECT * FROM teams ORDER BY name ASC")
            .map_err(DatabaseError::QueryError)?;
        let team_iter = stmt
            .query_map([], Self::team_from_row)
            .map_err(DatabaseError::QueryError)?;

        let mut teams = Vec::new();
        for team in team_iter {
            teams.push(team.map_err(DatabaseError::QueryError)?);
        }
        Ok(teams)
    }

    fn get_team_names(&self) -> DatabaseResult<Vec<String>> {
        let conn = get_connection(&self.pool)?;
        let mut stmt = conn
            .prepare("SELECT name FROM teams")
            .map_err(DatabaseError::QueryError)?;
        let name_iter = stmt
            .query_map([], |row| row.get(0))
            .map_err(DatabaseError::QueryError)?;

        let mut names = Vec::new();
        for name in name_iter {
            names.push(name.map_err(DatabaseError::QueryError)?);
        }
        Ok(names)
    }

    fn update_team(&self, id: TeamId, update: &TeamUpdate) -> DatabaseResult<usize> {
        let value_pairs: Vec<(&'static str, Option<&dyn ToSql>)> = vec![
            ("name", to_sql_option(&update.name)),
            ("total_players", to_sql_option(&update.total_players)),
            ("overs", to_sql_option(&update.overs)),
            ("wickets", to_sql_option(&update.wickets)),
            ("disqualified", to_sql_option(&update.disqualified)),
        ];
        update_entry(&self.pool, "teams", ("id", &id), value_pairs)
    }

    fn delete_team(&self, id: TeamId) -> DatabaseResult<usize> {
        let conn = get_connection(&self.pool)?;
        conn.execute("DELETE FROM teams WHERE id = ?1", [id])
            .map_err(DatabaseError::QueryError)
    }
}

/// In-memory stand-in used by the service tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryTeamRepository {
    teams: std::sync::Mutex<Vec<Team>>,
}

#[cfg(test)]
impl TeamRepository for MemoryTeamRepository {
    fn create_team(&self, team: &Team) -> DatabaseResult<TeamId> {
        let mut teams = self.teams.lock().unwrap();
        let id = teams.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        teams.push(Team {
            id,
            ..team.clone()
        });
        Ok(id)
    }

    fn get_team(&self, id: TeamId) -> DatabaseResult<Option<Team>> {
        let teams = self.teams.lock().unwrap();
        Ok(teams.iter().find(|t| t.id == id).cloned())
    }

    fn get_teams(&self) -> DatabaseResult<Vec<Team>> {
        Ok(self.teams.lock().unwrap().clone())
    }

    fn get_team_names(&self) -> DatabaseResult<Vec<String>> {
        let teams = self.teams.lock().unwrap();
        Ok(teams.iter().map(|t| t.name.clone()).collect())
    }

    fn update_team(&self, id: TeamId, update: &TeamUpdate) -> DatabaseResult<usize> {
        let mut teams = self.teams.lock().unwrap();
        let Some(team) = teams.iter_mut().find(|t| t.id == id) else {
            return Ok(0);
        };
        if let Some(name) = &update.name {
            team.name = name.clone();
        }
        if let Some(total_players) = update.total_players {
            team.total_players = total_players;
        }
        if let Some(overs) = update.overs {
            team.overs = overs;
        }
        if let Some(wickets) = update.wickets {
            team.wickets = wickets;
        }
        if let Some(disqualified) = update.disqualified {
            team.disqualified = disqualified;
        }
        Ok(1)
    }

    fn delete_team(&self, id: TeamId) -> DatabaseResult<usize> {
        let mut teams = self.teams.lock().unwrap();
        let before = teams.len();
        teams.retain(|t| t.id != id);
        Ok(before - teams.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::testutil::memory_pool;

    fn team(name: &str) -> Team {
        Team {
            id: 0,
            name: name.to_string(),
            total_players: 11,
            overs: 20,
            wickets: 10,
            disqualified: false,
        }
    }

    #[test]
    fn test_create_and_get_team() {
        let repo = TeamRepositoryImpl::new(memory_pool());
        let id = repo.create_team(&team("Lions")).unwrap();
        let stored = repo.get_team(id).unwrap().unwrap();
        assert_eq!(stored.name, "Lions");
        assert_eq!(stored.wickets, 10);
        assert!(repo.get_team(id + 1).unwrap().is_none());
    }

    #[test]
    fn test_name_unique_case_insensitive_in_schema() {
        let repo = TeamRepositoryImpl::new(memory_pool());
        repo.create_team(&team("Lions")).unwrap();
        let result = repo.create_team(&team("LIONS"));
        assert!(matches!(result, Err(DatabaseError::QueryError(_))));
    }

    #[test]
    fn test_partial_update() {
        let repo = TeamRepositoryImpl::new(memory_pool());
        let id = repo.create_team(&team("Lions")).unwrap();
        let affected = repo
            .update_team(
                id,
                &TeamUpdate {
                    overs: Some(50),
                    ..TeamUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(affected, 1);
        let stored = repo.get_team(id).unwrap().unwrap();
        assert_eq!(stored.overs, 50);
        assert_eq!(stored.name, "Lions");
    }

    #[test]
    fn test_delete_missing_team_affects_nothing() {
        let repo = TeamRepositoryImpl::new(memory_pool());
        assert_eq!(repo.delete_team(42).unwrap(), 0);
    }
}
