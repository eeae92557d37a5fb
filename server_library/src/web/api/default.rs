use crate::server::app_state::AppState;
use crate::web::utils::response::ErrorBody;
use actix_files::NamedFile;
use actix_web::{get, web, HttpRequest, HttpResponse};

#[get("/")]
pub async fn index(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let index_path = state.static_folder.join("index.html");
    match NamedFile::open_async(&index_path).await {
        Ok(named_file) => named_file
            .set_content_type(mime_guess::from_path(&index_path).first_or_octet_stream())
            .into_response(&req),
        Err(_) => not_found().await,
    }
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorBody::new("Resource not found"))
}
