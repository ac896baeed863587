use axum::{
    Router,
    routing::{get, post, put},
};
use log::info;

use crate::AppState;

mod auth;
mod matches;
mod players;
mod teams;

pub async fn run(state: AppState, shutdown_signal: impl Future<Output = ()> + Send + 'static) {
    let router: Router<AppState> = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/teams", get(teams::get_all).post(teams::create))
        .route(
            "/teams/{id}",
            get(teams::get_by_id)
                .put(teams::update)
                .delete(teams::remove),
        )
        .route(
            "/teams/{id}/players",
            get(players::get_by_team).post(players::create),
        )
        .route("/players", get(players::get_all))
        .route(
            "/players/{id}",
            put(players::update).delete(players::remove),
        )
        .route("/matches", get(matches::get_all).post(matches::create))
        .route(
            "/matches/{id}",
            get(matches::get_by_id).delete(matches::remove),
        )
        .route("/matches/{id}/score", put(matches::update_score));

    let port = std::env::var("CRICKET_HTTP_PORT")
        .expect("CRICKET_HTTP_PORT must be set")
        .parse::<u16>()
        .expect("CRICKET_HTTP_PORT must be a valid u16");

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .unwrap();

    info!("API server listening on port {}", port);
    axum::serve(listener, router.with_state(state))
        .with_graceful_shutdown(shutdown_signal)
        .await
        .unwrap();

    info!("HTTP API shut down gracefully");
}
