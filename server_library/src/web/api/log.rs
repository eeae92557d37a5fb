use crate::utils::logging::*;
use chrono::{DateTime, Local};
use actix_web::{get, web, HttpResponse, Responder, Scope};
use crate::web::utils::response::ErrorBody;

pub fn initialize() -> Scope {
    web::scope("/log")
        .service(system_log)
        .service(system_log_since)
}

#[get("/system_log")]
async fn system_log() -> impl Responder {
    let logs = Logger::get_system_logs().await;
    HttpResponse::Ok().json(format_logs(&logs))
}

#[get("/system_log/since/{since}")]
async fn system_log_since(since: web::Path<String>) -> impl Responder {
    match parse_datetime(&since.into_inner()) {
        Ok(since_time) => {
            let logs = Logger::get_system_logs_since(since_time).await;
            HttpResponse::Ok().json(format_logs(&logs))
        },
        Err(err) => HttpResponse::BadRequest().json(ErrorBody::new(err)),
    }
}

fn format_logs(logs: &[LogEntry]) -> Vec<String> {
    logs.iter().map(LogEntry::to_plain_string).collect()
}

fn parse_datetime(datetime_str: &str) -> Result<DateTime<Local>, String> {
    DateTime::parse_from_rfc3339(datetime_str)
        .map(|datetime| datetime.with_timezone(&Local))
        .map_err(|_| "Invalid datetime format".to_string())
}
