use actix_session::config::PersistentSession;
use actix_session::storage::CookieSessionStore;
use actix_session::{Session, SessionMiddleware};
use actix_web::cookie::{time::Duration, Key};
use actix_web::{middleware, web, App, HttpResponse, HttpServer, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{Config, ScheduleDefaults};
use crate::form::{validate_request, ScheduleRequest};
use crate::parser::parse_teams;
use crate::schedule::{generate_schedule, CapacityReport, GeneratedMatch, MatchStatus, TeamRef};
use crate::store::{InMemoryStore, MatchRepository, StoreError, TeamDirectory};

const ADMIN_KEY: &str = "admin";

pub struct AppState {
    pub store: InMemoryStore,
    pub admin_password: String,
    pub defaults: ScheduleDefaults,
}

impl AppState {
    pub fn new(store: InMemoryStore, config: &Config) -> Self {
        AppState {
            store,
            admin_password: config.server.admin_password.clone(),
            defaults: config.schedule.clone(),
        }
    }
}

#[derive(Deserialize)]
pub struct LoginRequest {
    password: String,
}

#[derive(Serialize)]
pub struct PreviewResponse {
    success: bool,
    capacity: CapacityReport,
    matches: Vec<GeneratedMatch>,
}

#[derive(Deserialize)]
pub struct SaveRequest {
    matches: Vec<GeneratedMatch>,
}

#[derive(Deserialize)]
pub struct MatchFilter {
    status: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    status: MatchStatus,
    home_team_score: Option<u32>,
    away_team_score: Option<u32>,
}

fn is_admin(session: &Session) -> bool {
    matches!(session.get::<bool>(ADMIN_KEY), Ok(Some(true)))
}

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(serde_json::json!({"success": false, "error": "Unauthorized"}))
}

fn bad_request(error: impl ToString) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({"success": false, "error": error.to_string()}))
}

// Admin login endpoint
async fn admin_login(
    session: Session,
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if req.password != state.admin_password {
        warn!("rejected admin login");
        return Ok(HttpResponse::Unauthorized().json(serde_json::json!({"success": false, "error": "Invalid password"})));
    }

    session.renew();
    session.insert(ADMIN_KEY, true)?;
    info!("admin logged in");
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
}

async fn admin_logout(session: Session) -> Result<HttpResponse> {
    session.purge();
    Ok(HttpResponse::Ok().json(serde_json::json!({"success": true})))
}

async fn get_teams(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.store.teams()))
}

async fn add_team(
    session: Session,
    team: web::Json<TeamRef>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !is_admin(&session) {
        return Ok(unauthorized());
    }

    let team = team.into_inner();
    if team.id.trim().is_empty() || team.name.trim().is_empty() {
        return Ok(bad_request("Team id and name are required"));
    }
    state.store.upsert(team.clone());
    Ok(HttpResponse::Ok().json(team))
}

// Admin CSV upload endpoint
async fn upload_teams(
    session: Session,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !is_admin(&session) {
        return Ok(unauthorized());
    }

    match parse_teams(&body) {
        Ok(teams) => {
            let count = teams.len();
            for team in teams {
                state.store.upsert(team);
            }
            info!(count, "teams imported");
            Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "imported": count})))
        }
        Err(e) => Ok(bad_request(format!("Failed to process CSV: {}", e))),
    }
}

// Generates a schedule without persisting it
async fn preview_schedule(
    session: Session,
    req: web::Json<ScheduleRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !is_admin(&session) {
        return Ok(unauthorized());
    }

    let req = req.into_inner().with_defaults(&state.defaults);
    let validated = match validate_request(&req) {
        Ok(v) => v,
        Err(e) => return Ok(bad_request(e)),
    };

    let teams = state.store.lookup(&validated.team_ids);
    if let Some(missing) = validated
        .team_ids
        .iter()
        .find(|id| !teams.iter().any(|t| &t.id == *id))
    {
        return Ok(bad_request(format!("Unknown team `{}`", missing)));
    }

    let config = validated.into_config(
        teams,
        state.store.existing_ids(),
        &state.defaults.location_prefix,
    );
    let capacity = CapacityReport::compute(&config);
    for warning in &capacity.warnings {
        warn!("{}", warning);
    }

    let matches = match state.defaults.seed {
        Some(seed) => generate_schedule(&config, &mut StdRng::seed_from_u64(seed)),
        None => generate_schedule(&config, &mut rand::thread_rng()),
    };

    Ok(HttpResponse::Ok().json(PreviewResponse {
        success: true,
        capacity,
        matches,
    }))
}

async fn save_schedule(
    session: Session,
    req: web::Json<SaveRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !is_admin(&session) {
        return Ok(unauthorized());
    }

    match state.store.save_batch(&req.matches) {
        Ok(saved) => Ok(HttpResponse::Ok().json(serde_json::json!({"success": true, "saved": saved}))),
        Err(e @ StoreError::DuplicateMatch(_)) => Ok(HttpResponse::Conflict()
            .json(serde_json::json!({"success": false, "error": e.to_string()}))),
        Err(e) => Ok(bad_request(e)),
    }
}

async fn get_matches(
    filter: web::Query<MatchFilter>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    let status = match filter.status.as_deref() {
        None | Some("all") => None,
        Some(raw) => match MatchStatus::parse(raw) {
            Some(status) => Some(status),
            None => return Ok(bad_request(format!("Invalid status `{}`", raw))),
        },
    };

    let matches: Vec<GeneratedMatch> = state
        .store
        .matches()
        .into_iter()
        .filter(|m| status.map_or(true, |s| m.status == s))
        .collect();
    Ok(HttpResponse::Ok().json(matches))
}

async fn update_match(
    session: Session,
    id: web::Path<u64>,
    req: web::Json<StatusUpdate>,
    state: web::Data<AppState>,
) -> Result<HttpResponse> {
    if !is_admin(&session) {
        return Ok(unauthorized());
    }

    let scores = req.home_team_score.zip(req.away_team_score);
    match state.store.update_status(id.into_inner(), req.status, scores) {
        Ok(updated) => Ok(HttpResponse::Ok().json(updated)),
        Err(e) => Ok(HttpResponse::NotFound().json(serde_json::json!({"success": false, "error": e.to_string()}))),
    }
}

/// Registers every API route.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/login", web::post().to(admin_login))
        .route("/api/logout", web::post().to(admin_logout))
        .route("/api/teams", web::get().to(get_teams))
        .route("/api/teams", web::post().to(add_team))
        .route("/api/teams/upload", web::post().to(upload_teams))
        .route("/api/schedule/preview", web::post().to(preview_schedule))
        .route("/api/schedule/save", web::post().to(save_schedule))
        .route("/api/matches", web::get().to(get_matches))
        .service(web::resource("/api/matches/{id}").route(web::put().to(update_match)));
}

pub fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(false)
        .session_lifecycle(PersistentSession::default().session_ttl(Duration::hours(8)))
        .build()
}

pub async fn start_server(config: Config, store: InMemoryStore) -> std::io::Result<()> {
    let port = config.server.port;
    let app_state = web::Data::new(AppState::new(store, &config));
    let key = Key::generate();

    info!(port, "starting web server");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(session_middleware(key.clone()))
            .wrap(middleware::Logger::default())
            .configure(routes)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
