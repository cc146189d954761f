use actix_web::{web, HttpResponse};

use crate::assembler;
use crate::envelope::RequestEnvelope;
use crate::error::SkillServerError;
use crate::logging::Timer;
use crate::state::AppState;

/// One skill turn: decode, load, dispatch, save, respond.
pub async fn handler(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, SkillServerError> {
    let envelope = RequestEnvelope::from_slice(&body)?;

    if !envelope.supports_audio_player() {
        log::info!("Rejecting {} from a device without audio playback", envelope.request.request_type);
        return Ok(HttpResponse::Ok().json(assembler::device_not_supported()));
    }

    let application_id = envelope.application_id();
    if !state.accepts_application(application_id) {
        log::warn!("Rejecting request for application {:?}", application_id);
        return Err(SkillServerError::ApplicationMismatch(
            application_id.unwrap_or("<none>").to_string(),
        ));
    }

    let user_id = envelope.user_id().ok_or(SkillServerError::MissingUser)?;
    let event = envelope.to_event();
    let timer = Timer::new(format!("Turn {}", event.name()));

    log::debug!("[{}] Handling {}", user_id, event.name());

    let transition = state
        .sessions
        .apply(user_id, |record| {
            let transition = state.machine.dispatch(record, event);
            (transition.record.clone(), transition)
        })
        .await?;

    if transition.changed {
        log::info!(
            "[{}] {:?} -> {:?} on {}",
            user_id,
            transition.from,
            transition.to,
            transition.event.name()
        );
    }
    timer.debug(user_id);

    Ok(HttpResponse::Ok().json(assembler::assemble(&transition.response)))
}
