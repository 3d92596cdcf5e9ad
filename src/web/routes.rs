use actix_web::web;

use crate::error::RelayError;
use crate::web::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| RelayError::InvalidRequest(err.to_string()).into()),
    )
    .service(
        web::scope("/api")
            .route("/models", web::get().to(handlers::models))
            .route("/set-api-key", web::post().to(handlers::set_api_key))
            .route("/api-key-status", web::get().to(handlers::api_key_status))
            .route("/query/{slot}", web::post().to(handlers::query))
            .route("/llm1", web::post().to(handlers::query_llm1))
            .route("/llm2", web::post().to(handlers::query_llm2)),
    )
    .route("/", web::get().to(handlers::index))
    .route("/health", web::get().to(handlers::health_check))
    .default_service(web::to(handlers::not_found));
}
