pub mod default;
pub mod history;
pub mod log;
pub mod process;
pub mod report;

use actix_web::{web, Scope};

pub fn initialize() -> Scope {
    web::scope("/api")
        .app_data(report::json_config())
        .service(process::process_image)
        .service(report::generate_report)
        .service(history::initialize())
        .service(log::initialize())
}
