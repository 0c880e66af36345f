//! Single binary web server exposing the tournament engine over a JSON API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! POINTS_TABLES may point at a JSON file with category points tables.
//! State is in memory only; durable storage is left to whatever fronts this service.

use actix_web::{
    get, post,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use doubles_tournament::{
    create_tournament, standings_view, submit_result, MatchId, NewTournament, PlayerId,
    PointsConfig, ScoreSubmission, ServerConfig, StatsLedger, Tournament, TournamentError,
    TournamentId,
};
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Everything the engine works on: tournaments by id, cumulative player stats, points tables.
struct Engine {
    tournaments: HashMap<TournamentId, Tournament>,
    ledger: StatsLedger,
    points: PointsConfig,
}

impl Engine {
    /// The tournament owning a match (matches are addressed by id alone).
    fn tournament_of_match(&mut self, match_id: MatchId) -> Result<&mut Tournament, TournamentError> {
        self.tournaments
            .values_mut()
            .find(|t| t.has_match(match_id))
            .ok_or(TournamentError::MatchNotFound(match_id))
    }
}

type AppState = Data<RwLock<Engine>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Path segment: resource id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct IdPath {
    id: uuid::Uuid,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::MatchNotFound(_) | TournamentError::TournamentNotFound(_) => {
            HttpResponse::NotFound().json(body)
        }
        TournamentError::ReverseNonexistentStats(_)
        | TournamentError::StatsOutOfRange(_)
        | TournamentError::MalformedBracket(_) => {
            log::error!("Engine invariant violated: {}", e);
            HttpResponse::InternalServerError().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "doubles-tournament",
    })
}

/// Create a tournament from an ordered player list and generate its schedule.
#[post("/api/tournaments")]
async fn api_create_tournament(state: AppState, body: Json<NewTournament>) -> HttpResponse {
    let tournament = match create_tournament(body.into_inner()) {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };
    let mut g = state.write().await;
    let id = tournament.id;
    let response = HttpResponse::Ok().json(&tournament);
    g.tournaments.insert(id, tournament);
    response
}

#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let g = state.read().await;
    match g.tournaments.get(&path.id) {
        Some(t) => HttpResponse::Ok().json(t),
        None => error_response(&TournamentError::TournamentNotFound(path.id)),
    }
}

/// Group tables while running, final results once finished.
#[get("/api/tournaments/{id}/standings")]
async fn api_standings(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let g = state.read().await;
    match g.tournaments.get(&path.id) {
        Some(t) => HttpResponse::Ok().json(standings_view(t, &g.ledger)),
        None => error_response(&TournamentError::TournamentNotFound(path.id)),
    }
}

/// Submit or correct a match score; the tournament advances as needed.
#[post("/api/matches/{id}/result")]
async fn api_submit_result(
    state: AppState,
    path: Path<IdPath>,
    body: Json<ScoreSubmission>,
) -> HttpResponse {
    let mut g = state.write().await;
    let Engine {
        tournaments,
        ledger,
        points,
    } = &mut *g;
    let tournament = match tournaments.values_mut().find(|t| t.has_match(path.id)) {
        Some(t) => t,
        None => return error_response(&TournamentError::MatchNotFound(path.id)),
    };
    match submit_result(tournament, ledger, points, path.id, body.into_inner()) {
        Ok(events) => HttpResponse::Ok().json(serde_json::json!({
            "events": events,
            "tournament": tournament,
        })),
        Err(e) => error_response(&e),
    }
}

/// Cancel a match that has not been played.
#[post("/api/matches/{id}/cancel")]
async fn api_cancel_match(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let mut g = state.write().await;
    let result = g
        .tournament_of_match(path.id)
        .and_then(|t| t.cancel_match(path.id).map(|()| t.clone()));
    match result {
        Ok(t) => HttpResponse::Ok().json(t),
        Err(e) => error_response(&e),
    }
}

#[get("/api/players/{id}/stats")]
async fn api_player_stats(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let g = state.read().await;
    let player: PlayerId = path.id;
    match g.ledger.stats(player) {
        Some(stats) => HttpResponse::Ok().json(stats),
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No stats for player" })),
    }
}

/// Rebuild a player's stats from their match and tournament records.
#[post("/api/players/{id}/stats/recalculate")]
async fn api_recalculate_stats(state: AppState, path: Path<IdPath>) -> HttpResponse {
    let mut g = state.write().await;
    match g.ledger.recalculate(path.id) {
        Ok(Some(stats)) => HttpResponse::Ok().json(stats),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({ "error": "No stats for player" })),
        Err(e) => error_response(&e),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let points = config
        .points_config()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    let state = Data::new(RwLock::new(Engine {
        tournaments: HashMap::new(),
        ledger: StatsLedger::new(),
        points,
    }));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_standings)
            .service(api_submit_result)
            .service(api_cancel_match)
            .service(api_player_stats)
            .service(api_recalculate_stats)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
