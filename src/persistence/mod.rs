use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::ToSql;

use crate::DatabaseError;

pub mod accounts;
pub mod matches;
pub mod players;
pub mod teams;

pub type DatabaseResult<T> = Result<T, DatabaseError>;

pub fn create_pool() -> Pool<SqliteConnectionManager> {
    let db_path = std::env::var("CRICKET_DB").expect("CRICKET_DB env var not set");
    // SQLite keeps referential rules off unless enabled per connection.
    let manager = SqliteConnectionManager::file(db_path)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    Pool::builder()
        .max_size(5)
        .build(manager)
        .expect("Failed to create DB pool")
}

pub fn get_connection(
    pool: &Pool<SqliteConnectionManager>,
) -> DatabaseResult<PooledConnection<SqliteConnectionManager>> {
    pool.get().map_err(DatabaseError::ConnectionError)
}

pub fn to_sql_option<T>(value: &Option<T>) -> Option<&dyn ToSql>
where
    T: ToSql,
{
    value.as_ref().map(|v| v as &dyn ToSql)
}

/// Build and run an UPDATE for the fields that are actually set.
/// Returns the number of affected rows; zero means no such row
/// (or nothing to update).
fn update_entry(
    pool: &Pool<SqliteConnectionManager>,
    table: &str,
    id: (&str, &dyn ToSql),
    value_pairs: Vec<(&str, Option<&dyn ToSql>)>,
) -> DatabaseResult<usize> {
    let mut query = format!("UPDATE {} SET ", table);
    let mut assignments = Vec::new();
    let mut params: Vec<&dyn ToSql> = Vec::new();

    for (field, value) in value_pairs {
        if let Some(v) = value {
            assignments.push(format!("{} = ?", field));
            params.push(v);
        }
    }
    if params.is_empty() {
        return Ok(0);
    }
    query.push_str(&assignments.join(", "));
    query.push_str(&format!(" WHERE {} = ?", id.0));
    params.push(id.1);
    let conn = get_connection(pool)?;
    let affected = conn
        .execute(&query, rusqlite::params_from_iter(params.iter()))
        .map_err(DatabaseError::QueryError)?;
    Ok(affected)
}

#[cfg(test)]
pub(crate) mod testutil {
    use r2d2::Pool;
    use r2d2_sqlite::SqliteConnectionManager;

    const TEST_SCHEMA: &str = "
        CREATE TABLE accounts (
            id INTEGER PRIMARY KEY,
            username VARCHAR(50) NOT NULL UNIQUE,
            email VARCHAR(100) NOT NULL DEFAULT '',
            password VARCHAR(100) NOT NULL
        );
        CREATE TABLE teams (
            id INTEGER PRIMARY KEY,
            name VARCHAR(100) NOT NULL COLLATE NOCASE UNIQUE,
            total_players INT NOT NULL,
            overs INT NOT NULL,
            wickets INT NOT NULL,
            disqualified INT NOT NULL DEFAULT 0
        );
        CREATE TABLE players (
            id INTEGER PRIMARY KEY,
            team_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
            number INT NOT NULL,
            name VARCHAR(100) NOT NULL,
            player_type VARCHAR(20) NOT NULL
        );
        CREATE TABLE matches (
            id INTEGER PRIMARY KEY,
            team1_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
            team2_id INTEGER NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
            date INT NOT NULL,
            team1_runs INT NOT NULL DEFAULT 0,
            team1_overs REAL NOT NULL DEFAULT 0,
            team1_wickets INT NOT NULL DEFAULT 0,
            team2_runs INT NOT NULL DEFAULT 0,
            team2_overs REAL NOT NULL DEFAULT 0,
            team2_wickets INT NOT NULL DEFAULT 0,
            winner_id INTEGER REFERENCES teams(id) ON DELETE SET NULL
        );
    ";

    /// A single-connection pool over an in-memory database; the schema
    /// lives in that one connection, so the pool must not grow.
    pub fn memory_pool() -> Pool<SqliteConnectionManager> {
        let manager = SqliteConnectionManager::memory()
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .expect("Failed to create test DB pool");
        pool.get()
            .unwrap()
            .execute_batch(TEST_SCHEMA)
            .expect("Failed to create test schema");
        pool
    }
}
