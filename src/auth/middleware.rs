use crate::auth::secret::{ADMIN_KEY_HEADER, verify_admin_key};
use crate::config::Config;
use crate::error::AppError;
use actix_web::middleware::Next;
use actix_web::{
    Error, ResponseError,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};

fn check_key(req: &ServiceRequest) -> Result<(), AppError> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or_else(|| AppError::internal("App config missing"))?;

    // Non-ASCII header bytes never match; decode them lossily and let the
    // comparison reject them after the configuration check.
    let provided = req
        .headers()
        .get(ADMIN_KEY_HEADER)
        .map(|h| String::from_utf8_lossy(h.as_bytes()));

    verify_admin_key(config.superadmin_key.as_deref(), provided.as_deref())
}

/// Rejects requests whose `X-Superadmin-Key` header does not match the
/// configured key.
pub async fn admin_key_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    if let Err(e) = check_key(&req) {
        let resp = e.error_response();
        return Ok(req.into_response(resp));
    }

    next.call(req).await
}
