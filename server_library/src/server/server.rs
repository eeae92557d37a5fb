use crate::detection::annotator::Annotator;
use crate::detection::yolo::YoloModel;
use crate::history::history_store::HistoryStore;
use crate::server::app_state::AppState;
use crate::utils::config::{CONFIG_PATH, Config};
use crate::utils::logging::*;
use crate::web::api::{self, default};
use crate::web::utils::error_handler;
use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::fs;
use tokio::time::sleep;

pub struct Server;

impl Server {
    pub async fn run() {
        logging_information!(SystemEntry::Initializing);
        let config = match Config::load(CONFIG_PATH) {
            Ok(config) => config,
            Err(err) => {
                logging_emergency!(err);
                return;
            }
        };
        let state = match Self::build_state(&config).await {
            Ok(state) => web::Data::new(state),
            Err(err) => {
                logging_emergency!(err);
                return;
            }
        };
        let http_server = loop {
            let state = state.clone();
            let http_server = HttpServer::new(move || Self::application(state.clone()))
                .bind(format!("0.0.0.0:{}", config.http_server_bind_port));
            match http_server {
                Ok(http_server) => break http_server,
                Err(err) => {
                    logging_critical!(SystemEntry::BindPortError(err));
                    sleep(Duration::from_secs(config.bind_retry_duration)).await;
                    continue;
                }
            }
        };
        logging_information!(SystemEntry::WebReady);
        logging_information!(SystemEntry::InitializeComplete);
        logging_information!(SystemEntry::Online);
        if let Err(err) = http_server.run().await {
            logging_emergency!(SystemEntry::WebPanic(err));
        }
    }

    pub async fn terminate() {
        logging_information!(SystemEntry::Terminating);
        logging_information!(SystemEntry::TerminateComplete);
    }

    /// Routes, CORS and the JSON error rewrite shared by the server and its tests.
    pub fn application(state: web::Data<AppState>) -> App<impl ServiceFactory<ServiceRequest, Config = (), Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error, InitError = ()>> {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);
        App::new()
            .app_data(state)
            .wrap(error_handler::initialize())
            .wrap(cors)
            .service(api::initialize())
            .service(default::index)
            .default_service(web::route().to(default::not_found))
    }

    async fn build_state(config: &Config) -> Result<AppState, String> {
        Self::create_folder(&config.upload_folder()).await?;
        Self::create_folder(&config.results_folder()).await?;
        let model = YoloModel::new(&config.model_path, config.confidence_threshold, config.iou_threshold)?;
        logging_information!(SystemEntry::ModelReady(config.model_path.clone()));
        let annotator = Annotator::from_config(config).await;
        let history = HistoryStore::open(&config.history_file).await?;
        Ok(AppState::new(config, Arc::new(model), annotator, history))
    }

    async fn create_folder(path: &Path) -> Result<(), IOEntry> {
        fs::create_dir_all(path).await
            .map_err(|err| IOEntry::CreateDirectoryError(path.display().to_string(), err))
    }
}
