use subtle::ConstantTimeEq;

use crate::error::AppError;

pub const ADMIN_KEY_HEADER: &str = "X-Superadmin-Key";

/// Byte comparison whose running time depends only on the input lengths.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    bool::from(a.ct_eq(b))
}

/// Checks a caller-supplied key against the configured one.
/// Both sides are trimmed first; an unset or blank server key is a
/// configuration fault, not a caller fault.
pub fn verify_admin_key(configured: Option<&str>, provided: Option<&str>) -> Result<(), AppError> {
    let expected = configured.map(str::trim).unwrap_or_default();
    if expected.is_empty() {
        return Err(AppError::misconfigured("SUPERADMIN_KEY is not configured"));
    }

    let provided = provided.map(str::trim).unwrap_or_default();
    if provided.is_empty() {
        return Err(AppError::unauthorized("Missing superadmin key"));
    }

    if !constant_time_eq(provided.as_bytes(), expected.as_bytes()) {
        return Err(AppError::unauthorized("Invalid superadmin key"));
    }

    Ok(())
}
