use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

const SCHEMA_SQL: &str = "
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

fn main() {
    dotenvy::dotenv().ok();

    let db_path = std::env::var("CRICKET_DB").expect("CRICKET_DB env var not set");
    let parent = std::path::Path::new(&db_path)
        .parent()
        .expect("Failed to get parent directory of DB path");
    if !parent.exists() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory for DB");
        println!("Created parent directory for DB at {}", parent.display());
    }

    if std::path::Path::new(&db_path).exists() {
        std::fs::remove_file(&db_path).expect("Failed to remove existing DB");
        println!("Removed existing DB at {}", db_path);
    }

    let manager = SqliteConnectionManager::file(&db_path);
    let pool = Pool::builder()
        .max_size(5)
        .build(manager)
        .expect("Failed to create DB pool");
    let conn = pool.get().expect("Failed to get DB connection");
    conn.execute_batch(SCHEMA_SQL)
        .expect("Failed to create tables");

    println!("Created new DB at {}", db_path);

    create_account(&conn, "testuser", "pw");
    create_account(&conn, "testuser2", "pw");
}

fn create_account(conn: &rusqlite::Connection, username: &str, password: &str) {
    let sql = "INSERT INTO accounts (username, email, password) VALUES (?1, '', ?2);";
    let pw_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST).expect("Failed to hash password");
    conn.execute(sql, rusqlite::params![username, pw_hash])
        .expect("Failed to create account");
    println!("Created account {}", username);
}
