use crate::server::app_state::AppState;
use crate::web::utils::response::{ApiError, logged};
use actix_web::{get, web, HttpResponse, Scope};

pub fn initialize() -> Scope {
    web::scope("/history")
        .service(list_history)
        .service(get_history)
}

#[get("")]
async fn list_history(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let entries = logged(state.history.list().await.map_err(ApiError::from)).await?;
    Ok(HttpResponse::Ok().json(entries))
}

#[get("/{id}")]
async fn get_history(state: web::Data<AppState>, id: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let entry = logged(state.history.get(&id).await.map_err(ApiError::from)).await?;
    Ok(HttpResponse::Ok().json(entry))
}
