use crate::web::utils::response::ErrorBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::HttpResponse;

pub fn initialize<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().default_handler(json_error_body)
}

/// Rewrites error responses that are not JSON yet into `{"error": reason}`.
fn json_error_body<B>(response: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    let is_json = response.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    if is_json {
        return Ok(ErrorHandlerResponse::Response(response.map_into_left_body()));
    }
    let status = response.status();
    let reason = status.canonical_reason().unwrap_or("Unknown error");
    let (request, _) = response.into_parts();
    let rewritten = HttpResponse::build(status).json(ErrorBody::new(reason));
    Ok(ErrorHandlerResponse::Response(ServiceResponse::new(request, rewritten).map_into_right_body()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App};

    #[actix_web::test]
    async fn plain_text_errors_become_json() {
        let app = test::init_service(
            App::new()
                .wrap(initialize())
                .route("/teapot", web::get().to(|| async { HttpResponse::MethodNotAllowed().body("nope") }))
        ).await;
        let response = test::call_service(&app, test::TestRequest::get().uri("/teapot").to_request()).await;
        assert_eq!(response.status(), 405);
        let body: ErrorBody = test::read_body_json(response).await;
        assert_eq!(body.error, "Method Not Allowed");
    }

    #[actix_web::test]
    async fn json_errors_pass_through() {
        let app = test::init_service(
            App::new()
                .wrap(initialize())
                .route("/missing", web::get().to(|| async { HttpResponse::NotFound().json(ErrorBody::new("Record x not found")) }))
        ).await;
        let response = test::call_service(&app, test::TestRequest::get().uri("/missing").to_request()).await;
        assert_eq!(response.status(), 404);
        let body: ErrorBody = test::read_body_json(response).await;
        assert_eq!(body.error, "Record x not found");
    }

    #[actix_web::test]
    async fn successful_responses_are_untouched() {
        let app = test::init_service(
            App::new()
                .wrap(initialize())
                .route("/ok", web::get().to(|| async { HttpResponse::Ok().body("fine") }))
        ).await;
        let response = test::call_service(&app, test::TestRequest::get().uri("/ok").to_request()).await;
        assert_eq!(response.status(), 200);
        assert_eq!(test::read_body(response).await, "fine");
    }
}
