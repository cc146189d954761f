use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::io;

use crate::config::SkillConfig;
use crate::handlers;
use crate::state::AppState;

/// Registers the `/api/v1` routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .route("/skill", web::post().to(handlers::skill::handler))
            .route("/sessions/{user_id}", web::get().to(handlers::sessions::get_handler))
            .route("/sessions/{user_id}", web::delete().to(handlers::sessions::delete_handler))
            .route("/health", web::get().to(handlers::health::handler)),
    );
}

pub async fn run_server_with_config(config: SkillConfig) -> io::Result<()> {
    log::info!(
        "Initializing server with storage: {:?}, audio base URL: {}",
        config.storage,
        config.audio_base_url
    );
    let state = web::Data::new(AppState::from_config(&config));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .configure(configure)
    })
    .bind(format!("0.0.0.0:{}", config.port))?
    .run()
    .await
}
