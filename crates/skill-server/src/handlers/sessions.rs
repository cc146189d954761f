use actix_web::{web, HttpResponse};

use crate::error::SkillServerError;
use crate::state::AppState;

pub async fn get_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, SkillServerError> {
    let user_id = path.into_inner();
    let record = state.sessions.get(&user_id).await?;
    Ok(HttpResponse::Ok().json(record))
}

pub async fn delete_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, SkillServerError> {
    let user_id = path.into_inner();
    if state.sessions.delete(&user_id).await? {
        log::info!("[{}] Session deleted", user_id);
        Ok(HttpResponse::NoContent().finish())
    } else {
        Err(SkillServerError::SessionNotFound(user_id))
    }
}
