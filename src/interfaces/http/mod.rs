use actix_cors::Cors;
use actix_web::{dev::Server, get, web, App, HttpResponse, HttpServer, Responder};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

use crate::application::use_cases::kol_catalog::KolCatalog;
use crate::application::use_cases::kol_query::KolQuery;
use crate::domain::error::AppError;
use crate::infrastructure::config::AppConfig;

const MAX_LOG_ENTRIES: usize = 100;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogEntry {
    pub time: String,
    pub level: String,
    pub source: String,
    pub message: String,
}

pub struct HttpState {
    pub catalog: Arc<KolCatalog>,
    pub app_name: String,
    pub app_version: String,
    pub logs: Arc<Mutex<Vec<LogEntry>>>,
}

impl HttpState {
    pub fn new(
        catalog: Arc<KolCatalog>,
        config: &AppConfig,
        logs: Arc<Mutex<Vec<LogEntry>>>,
    ) -> Self {
        Self {
            catalog,
            app_name: config.app_name.clone(),
            app_version: config.app_version.clone(),
            logs,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn error_response(err: &AppError) -> HttpResponse {
    let body = ErrorBody {
        error: err.to_string(),
    };
    match err {
        AppError::NotFound(_) => HttpResponse::NotFound().json(body),
        AppError::ValidationError(_) => HttpResponse::BadRequest().json(body),
        _ => HttpResponse::InternalServerError().json(body),
    }
}

#[get("/")]
async fn root(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": data.app_name,
        "version": data.app_version,
        "health": "/health",
    }))
}

#[get("/health")]
async fn health(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": data.app_name,
        "version": data.app_version,
        "records": data.catalog.len(),
        "data_source": data.catalog.source(),
    }))
}

#[get("/kols")]
async fn list_kols(data: web::Data<HttpState>, query: web::Query<KolQuery>) -> impl Responder {
    if query.is_empty() {
        return HttpResponse::Ok()
            .insert_header(("X-Total-Count", data.catalog.len().to_string()))
            .json(data.catalog.all());
    }

    match data.catalog.query(&query) {
        Ok(page) => HttpResponse::Ok()
            .insert_header(("X-Total-Count", page.total.to_string()))
            .json(page.items),
        Err(e) => {
            add_log(
                &data.logs,
                "WARN",
                "HttpApi",
                &format!("Rejected KOL query: {}", e),
            );
            error_response(&e)
        }
    }
}

#[get("/kols/stats")]
async fn kol_stats(data: web::Data<HttpState>) -> impl Responder {
    HttpResponse::Ok().json(data.catalog.stats())
}

#[get("/kols/{kol_id}")]
async fn get_kol(data: web::Data<HttpState>, path: web::Path<String>) -> impl Responder {
    let kol_id = path.into_inner();
    match data.catalog.find_by_id(&kol_id) {
        Some(kol) => HttpResponse::Ok().json(kol),
        None => error_response(&AppError::NotFound(format!(
            "KOL with id '{}'",
            kol_id
        ))),
    }
}

#[get("/logs")]
async fn get_logs(data: web::Data<HttpState>) -> impl Responder {
    let logs = match data.logs.lock() {
        Ok(logs) => logs.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    };
    HttpResponse::Ok().json(logs)
}

/// Route table shared by the server and the handler tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(root).service(health).service(
        web::scope("/api")
            .service(list_kols)
            // Must precede `/kols/{kol_id}`.
            .service(kol_stats)
            .service(get_kol)
            .service(get_logs),
    );
}

fn build_cors(origins: &[String]) -> Cors {
    if origins.is_empty() {
        return Cors::permissive();
    }
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

pub fn add_log_entry(
    logs: &Mutex<Vec<LogEntry>>,
    level: &str,
    source: &str,
    message: &str,
) -> LogEntry {
    let entry = LogEntry {
        time: Local::now().format("%H:%M:%S").to_string(),
        level: level.to_string(),
        source: source.to_string(),
        message: message.to_string(),
    };
    let mut logs = match logs.lock() {
        Ok(logs) => logs,
        Err(poisoned) => poisoned.into_inner(),
    };
    logs.push(entry.clone());
    if logs.len() > MAX_LOG_ENTRIES {
        logs.remove(0);
    }
    entry
}

pub fn add_log(logs: &Mutex<Vec<LogEntry>>, level: &str, source: &str, message: &str) {
    add_log_entry(logs, level, source, message);
}

pub fn start_server(state: HttpState, config: &AppConfig) -> std::io::Result<Server> {
    let state = web::Data::new(state);
    let origins = config.cors_origins.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(build_cors(&origins))
            .app_data(state.clone())
            .configure(configure)
    })
    .bind(config.bind_address())?
    .run();

    Ok(server)
}
