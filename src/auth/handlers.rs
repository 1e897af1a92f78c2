use crate::{
    auth::secret::verify_admin_key,
    config::Config,
    error::AppError,
    models::{EnterKeyReq, ErrorResponse, MessageResponse},
    utils::validation::Validator,
};
use actix_web::{HttpResponse, web};
use tracing::{info, instrument};

/// Lets a client check an admin key before using it on the gated routes.
#[utoipa::path(
    post,
    path = "/api/auth/enter",
    request_body = EnterKeyReq,
    responses(
        (status = 200, description = "Key accepted", body = MessageResponse, example = json!({
            "message": "Access granted"
        })),
        (status = 401, description = "Invalid superadmin key", body = ErrorResponse),
        (status = 422, description = "Key shorter than 8 or longer than 255 characters", body = ErrorResponse),
        (status = 500, description = "SUPERADMIN_KEY is not configured", body = ErrorResponse)
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_enter", skip(payload, config))]
pub async fn enter(
    payload: web::Json<EnterKeyReq>,
    config: web::Data<Config>,
) -> Result<HttpResponse, AppError> {
    Validator::new().length("key", &payload.key, 8, 255).finish()?;

    verify_admin_key(config.superadmin_key.as_deref(), Some(&payload.key))?;

    info!("Admin key accepted");
    Ok(HttpResponse::Ok().json(MessageResponse::new("Access granted")))
}
