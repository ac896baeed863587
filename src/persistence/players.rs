use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::ToSql;

use crate::{
    DatabaseError,
    persistence::{DatabaseResult, get_connection, to_sql_option, update_entry},
    player::{Player, PlayerId, PlayerType},
    team::TeamId,
};

#[derive(Clone, Default)]
pub struct PlayerUpdate {
    pub number: Option<i64>,
    pub name: Option<String>,
    pub player_type: Option<String>,
}

pub trait PlayerRepository {
    fn create_player(&self, player: &Player) -> DatabaseResult<PlayerId>;
    fn get_player(&self, id: PlayerId) -> DatabaseResult<Option<Player>>;
    fn get_players(&self) -> DatabaseResult<Vec<Player>>;
    fn get_players_by_team(&self, team_id: TeamId) -> DatabaseResult<Vec<Player>>;
    fn count_players(&self, team_id: TeamId) -> DatabaseResult<i64>;
    fn update_player(&self, id: PlayerId, update: &PlayerUpdate) -> DatabaseResult<usize>;
    fn delete_player(&self, id: PlayerId) -> DatabaseResult<usize>;
}

pub struct PlayerRepositoryImpl {
    pool: Pool<SqliteConnectionManager>,
}

impl PlayerRepositoryImpl {
    pub fn new(pool: Pool<SqliteConnectionManager>) -> Self {
        Self { pool }
    }

    fn player_from_row(row: &rusqlite::Row) -> rusqlite::Result<Player> {
        let player_type: String = row.get("player_type")?;
        let player_type = PlayerType::parse(&player_type).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                format!("unknown player type: {}", player_type).into(),
            )
        })?;
        Ok(Player {
            id: row.get("id")?,
            team_id: row.get("team_id")?,
            number: row.get("number")?,
            name: row.get("name")?,
            player_type,
        })
    }
}

impl PlayerRepository for PlayerRepositoryImpl {
    fn create_player(&self, player: &Player) -> DatabaseResult<PlayerId> {
        let conn = get_connection(&self.pool)?;
        conn.execute(
            "INSERT INTO players (team_id, number, name, player_type) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                player.team_id,
                player.number,
                player.name,
                player.player_type.as_str(),
            ],
        )
        .map_err(DatabaseError::QueryError)?;
        Ok(conn.last_insert_rowid())
    }

    fn get_player(&self, id: PlayerId) -> DatabaseResult<Option<Player>> {
        let conn = get_connection(&self.pool)?;
        let player = conn.query_one(
            "SELECT * FROM players WHERE id = ?1",
            [id],
            Self::player_from_row,
        );
        match player {
            Ok(player) => Ok(Some(player)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(DatabaseError::QueryError(e)),
        }
    }

    fn get_players(&self) -> DatabaseResult<Vec<Player>> {
        let conn = get_connection(&self.pool)?;
        let mut stmt = conn
            .prepare("SELECT * FROM players ORDER BY team_id ASC, number ASC")
            .map_err(DatabaseError::QueryError)?;
        let player_iter = stmt
            .query_map([], Self::player_from_row)
            .map_err(DatabaseError::QueryError)?;

        let mut players = Vec::new();
        for player in player_iter {
            players.push(player.map_err(DatabaseError::QueryError)?);
        }
        Ok(players)
    }

    fn get_players_by_team(&self, team_id: TeamId) -> DatabaseResult<Vec<Player>> {
        let conn = get_connection(&self.pool)?;
        let mut stmt = conn
            .prepare("SELECT * FROM players WHERE team_id = ?1 ORDER BY number ASC")
            .map_err(DatabaseError::QueryError)?;
        let player_iter = stmt
            .query_map([team_id], Self::player_from_row)
            .map_err(DatabaseError::QueryError)?;

        let mut players = Vec::new();
        for player in player_iter {
            players.push(player.map_err(DatabaseError::QueryError)?);
        }
        Ok(players)
    }

    fn count_players(&self, team_id: TeamId) -> DatabaseResult<i64> {
        let conn = get_connection(&self.pool)?;
        conn.query_row(
            "SELECT COUNT(*) FROM players WHERE team_id = ?1",
            [team_id],
            |row| row.get(0),
        )
        .map_err(DatabaseError::QueryError)
    }

    fn update_player(&self, id: PlayerId, update: &PlayerUpdate) -> DatabaseResult<usize> {
        let value_pairs: Vec<(&'static str, Option<&dyn ToSql>)> = vec![
            ("number", to_sql_option(&update.number)),
            ("name", to_sql_option(&update.name)),
            ("player_type", to_sql_option(&update.player_type)),
        ];
        update_entry(&self.pool, "players", ("id", &id), value_pairs)
    }

    fn delete_player(&self, id: PlayerId) -> DatabaseResult<usize> {
        let conn = get_connection(&self.pool)?;
        conn.execute("DELETE FROM players WHERE id = ?1", [id])
            .map_err(DatabaseError::QueryError)
    }
}

/// In-memory stand-in used by the service tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryPlayerRepository {
    players: std::sync::Mutex<Vec<Player>>,
}

#[cfg(test)]
impl PlayerRepository for MemoryPlayerRepository {
    fn create_player(&self, player: &Player) -> DatabaseResult<PlayerId> {
        let mut players = self.players.lock().unwrap();
        let id = players.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        players.push(Player {
            id,
            ..player.clone()
        });
        Ok(id)
    }

    fn get_player(&self, id: PlayerId) -> DatabaseResult<Option<Player>> {
        let players = self.players.lock().unwrap();
        Ok(players.iter().find(|p| p.id == id).cloned())
    }

    fn get_players(&self) -> DatabaseResult<Vec<Player>> {
        Ok(self.players.lock().unwrap().clone())
    }

    fn get_players_by_team(&self, team_id: TeamId) -> DatabaseResult<Vec<Player>> {
        let players = self.players.lock().unwrap();
        Ok(players
            .iter()
            .filter(|p| p.team_id == team_id)
            .cloned()
            .collect())
    }

    fn count_players(&self, team_id: TeamId) -> DatabaseResult<i64> {
        let players = self.players.lock().unwrap();
        Ok(players.iter().filter(|p| p.team_id == team_id).count() as i64)
    }

    fn update_player(&self, id: PlayerId, update: &PlayerUpdate) -> DatabaseResult<usize> {
        let mut players = self.players.lock().unwrap();
        let Some(player) = players.iter_mut().find(|p| p.id == id) else {
            return Ok(0);
        };
        if let Some(number) = update.number {
            player.number = number;
        }
        if let Some(name) = &update.name {
            player.name = name.clone();
        }
        if let Some(player_type) = &update.player_type {
            player.player_type =
                PlayerType::parse(player_type).expect("invalid player type in update");
        }
        Ok(1)
    }

    fn delete_player(&self, id: PlayerId) -> DatabaseResult<usize> {
        let mut players = self.players.lock().unwrap();
        let before = players.len();
        players.retain(|p| p.id != id);
        Ok(before - players.len())
    }
}
