//! Single binary web server: scores match results and serves leaderboards via REST.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT. Default scoring with POINTS_WIN, POINTS_DRAW, POINTS_LOSS.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use match_standings::{
    complete_tournament, delete_match, edit_match, record_match, tournament_leaderboard,
    write_leaderboard_csv, GameTally, MatchContext, MatchResult, MatchSubmission, PointsTable,
    Tournament, TournamentConfig, TournamentError, TournamentId,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// In-memory state: tournaments by id. The write lock serializes every stats update.
type AppState = Data<RwLock<HashMap<TournamentId, Tournament>>>;

/// Scoring used when a tournament is created without its own points table.
struct DefaultScoring(PointsTable);

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct PointsBody {
    win: f64,
    draw: f64,
    loss: f64,
}

#[derive(Deserialize)]
struct CreateTournamentBody {
    #[serde(flatten)]
    config: TournamentConfig,
    #[serde(default)]
    points: Option<PointsBody>,
}

#[derive(Deserialize)]
struct AddPlayerBody {
    name: String,
}

/// Scores arrive as plain JSON numbers so fractional values reach the validator.
#[derive(Deserialize)]
struct MatchBody {
    team_1: Vec<Uuid>,
    team_2: Vec<Uuid>,
    team_1_score: f64,
    team_2_score: f64,
    #[serde(default)]
    team_1_games: u32,
    #[serde(default)]
    team_2_games: u32,
    #[serde(default)]
    phase: u32,
}

impl MatchBody {
    fn into_submission(self) -> Result<MatchSubmission, TournamentError> {
        Ok(MatchSubmission {
            team_1: self.team_1,
            team_2: self.team_2,
            result: MatchResult::from_raw(self.team_1_score, self.team_2_score)?,
            games: GameTally::new(self.team_1_games, self.team_2_games),
            context: MatchContext::new(self.phase),
        })
    }
}

#[derive(Deserialize)]
struct CompleteBody {
    winner_ids: Vec<Uuid>,
}

/// Path segment: tournament id (e.g. /api/tournaments/{id})
#[derive(Deserialize)]
struct TournamentPath {
    id: TournamentId,
}

/// Path segments: tournament id and match id (e.g. /api/tournaments/{id}/matches/{match_id})
#[derive(Deserialize)]
struct TournamentMatchPath {
    id: TournamentId,
    match_id: Uuid,
}

fn error_response(e: &TournamentError) -> HttpResponse {
    match e {
        TournamentError::InvalidResult(invalid) => HttpResponse::BadRequest().json(serde_json::json!({
            "error": e.to_string(),
            "reason": invalid.reason.code(),
        })),
        TournamentError::Stats(_) => {
            log::error!("Stats update refused: {}", e);
            HttpResponse::Conflict().json(serde_json::json!({ "error": e.to_string() }))
        }
        TournamentError::PlayerNotFound(_) | TournamentError::MatchNotFound(_) => {
            HttpResponse::NotFound().json(serde_json::json!({ "error": e.to_string() }))
        }
        _ => HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
    }
}

/// Run `f` on the tournament under the write lock (404 if it does not exist).
fn with_tournament<F>(state: &AppState, id: TournamentId, f: F) -> HttpResponse
where
    F: FnOnce(&mut Tournament) -> HttpResponse,
{
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&id) {
        Some(t) => f(t),
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No tournament" })),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "match-standings",
    })
}

/// Create a tournament from its config (returns it with id).
#[post("/api/tournaments")]
async fn api_create_tournament(
    state: AppState,
    scoring: Data<DefaultScoring>,
    body: Json<CreateTournamentBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let points = match body.points {
        Some(p) => match PointsTable::new(p.win, p.draw, p.loss) {
            Ok(table) => table,
            Err(e) => return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() })),
        },
        None => scoring.0,
    };
    let tournament = Tournament::new(body.config, points);
    let response = HttpResponse::Ok().json(&tournament);
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    log::info!("Created tournament {} ({:?})", tournament.id, tournament.config.kind);
    g.insert(tournament.id, tournament);
    response
}

/// Get a tournament by id (404 if not found).
#[get("/api/tournaments/{id}")]
async fn api_get_tournament(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| HttpResponse::Ok().json(&*t))
}

/// Add a player to the tournament.
#[post("/api/tournaments/{id}/players")]
async fn api_add_player(state: AppState, path: Path<TournamentPath>, body: Json<AddPlayerBody>) -> HttpResponse {
    with_tournament(&state, path.id, |t| match t.add_player(body.name.as_str()) {
        Ok(_) => HttpResponse::Ok().json(&*t),
        Err(e) => error_response(&e),
    })
}

/// Submit a match result; stats of all participants are updated.
#[post("/api/tournaments/{id}/matches")]
async fn api_record_match(state: AppState, path: Path<TournamentPath>, body: Json<MatchBody>) -> HttpResponse {
    let submission = match body.into_inner().into_submission() {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };
    with_tournament(&state, path.id, |t| match record_match(t, submission) {
        Ok(match_id) => HttpResponse::Ok().json(serde_json::json!({ "match_id": match_id, "tournament": &*t })),
        Err(e) => error_response(&e),
    })
}

/// Correct a previously recorded match.
#[put("/api/tournaments/{id}/matches/{match_id}")]
async fn api_edit_match(state: AppState, path: Path<TournamentMatchPath>, body: Json<MatchBody>) -> HttpResponse {
    let submission = match body.into_inner().into_submission() {
        Ok(s) => s,
        Err(e) => return error_response(&e),
    };
    with_tournament(&state, path.id, |t| match edit_match(t, path.match_id, submission) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(e) => error_response(&e),
    })
}

/// Delete a recorded match and undo its stats.
#[delete("/api/tournaments/{id}/matches/{match_id}")]
async fn api_delete_match(state: AppState, path: Path<TournamentMatchPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| match delete_match(t, path.match_id) {
        Ok(_) => HttpResponse::Ok().json(&*t),
        Err(e) => error_response(&e),
    })
}

/// Finish the tournament with the given winners.
#[post("/api/tournaments/{id}/complete")]
async fn api_complete_tournament(
    state: AppState,
    path: Path<TournamentPath>,
    body: Json<CompleteBody>,
) -> HttpResponse {
    with_tournament(&state, path.id, |t| match complete_tournament(t, &body.winner_ids) {
        Ok(()) => HttpResponse::Ok().json(&*t),
        Err(e) => error_response(&e),
    })
}

/// Ranked leaderboard as JSON.
#[get("/api/tournaments/{id}/leaderboard")]
async fn api_leaderboard(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| HttpResponse::Ok().json(tournament_leaderboard(t)))
}

/// Ranked leaderboard as CSV download.
#[get("/api/tournaments/{id}/leaderboard.csv")]
async fn api_leaderboard_csv(state: AppState, path: Path<TournamentPath>) -> HttpResponse {
    with_tournament(&state, path.id, |t| {
        let mut out = Vec::new();
        match write_leaderboard_csv(&tournament_leaderboard(t), &mut out) {
            Ok(()) => HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(out),
            Err(e) => {
                log::error!("CSV export failed: {}", e);
                HttpResponse::InternalServerError().body("csv error")
            }
        }
    })
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Points table from POINTS_WIN / POINTS_DRAW / POINTS_LOSS, falling back to 3 / 1 / 0.
fn scoring_from_env() -> PointsTable {
    let default = PointsTable::default();
    let read = |key: &str, fallback: f64| -> f64 {
        std::env::var(key)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(fallback)
    };
    let (win, draw, loss) = (
        read("POINTS_WIN", default.win()),
        read("POINTS_DRAW", default.draw()),
        read("POINTS_LOSS", default.loss()),
    );
    PointsTable::new(win, draw, loss).unwrap_or_else(|e| {
        log::warn!("{}; using default scoring", e);
        default
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    let scoring = scoring_from_env();
    log::info!(
        "Starting server at http://{}:{} (points {} / {} / {})",
        bind.0,
        bind.1,
        scoring.win(),
        scoring.draw(),
        scoring.loss()
    );

    let state = Data::new(RwLock::new(HashMap::<TournamentId, Tournament>::new()));
    let scoring = Data::new(DefaultScoring(scoring));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(scoring.clone())
            .service(api_health)
            .service(api_create_tournament)
            .service(api_get_tournament)
            .service(api_add_player)
            .service(api_record_match)
            .service(api_edit_match)
            .service(api_delete_match)
            .service(api_complete_tournament)
            .service(api_leaderboard_csv)
            .service(api_leaderboard)
    })
    .bind(bind)?
    .run()
    .await
}
