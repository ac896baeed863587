fn main() {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: add_account <username> <password>");
        std::process::exit(1);
    }

    let db_path = std::env::var("CRICKET_DB").expect("CRICKET_DB env var not set");
    let username = &args[1];
    let password = &args[2];
    let conn = rusqlite::Connection::open(db_path).expect("Failed to open database");

    let pw_hash = bcrypt::hash(password, bcrypt::DEFAULT_COST).expect("Failed to hash password");
    conn.execute(
        "INSERT INTO accounts (username, email, password) VALUES (?1, '', ?2);",
        rusqlite::params![username, pw_hash],
    )
    .expect("Failed to create account");
    println!("Created account [{}]", username);
}
