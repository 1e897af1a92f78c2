use crate::{
    error::AppError,
    model::attendance::{AttendanceRecord, AttendanceStatus, AttendanceSummary, NewAttendance},
    models::ErrorResponse,
    service::attendance::AttendanceService,
    utils::validation::Validator,
};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct MarkAttendance {
    #[schema(example = "EMP001", min_length = 2, max_length = 32)]
    pub employee_id: String,
    #[schema(example = "2026-02-25", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AttendanceFilter {
    /// Only the record of this day (YYYY-MM-DD)
    #[param(example = "2026-02-25", value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,
    /// Only records within this month (YYYY-MM)
    #[param(example = "2026-02")]
    pub month: Option<String>,
}

/// Mark attendance for a day: creates the record or corrects its status
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = MarkAttendance,
    responses(
        (status = 201, description = "Attendance recorded", body = AttendanceRecord),
        (status = 200, description = "Existing record for that day updated", body = AttendanceRecord),
        (status = 401, description = "Missing or invalid superadmin key", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 422, description = "Malformed payload", body = ErrorResponse)
    ),
    tag = "Attendance",
    security(
        ("superadmin_key" = [])
    )
)]
pub async fn mark_attendance(
    service: web::Data<AttendanceService>,
    payload: web::Json<MarkAttendance>,
) -> Result<HttpResponse, AppError> {
    let payload = payload.into_inner();
    Validator::new()
        .length("employee_id", &payload.employee_id, 2, 32)
        .finish()?;

    let (record, created) = service
        .mark(NewAttendance {
            employee_id: payload.employee_id,
            date: payload.date,
            status: payload.status,
        })
        .await?;

    if created {
        Ok(HttpResponse::Created().json(record))
    } else {
        Ok(HttpResponse::Ok().json(record))
    }
}

/// Attendance summary of one employee
#[utoipa::path(
    get,
    path = "/api/attendance/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Employee code, e.g. EMP001"),
        AttendanceFilter
    ),
    responses(
        (status = 200, description = "Filtered records, newest day first", body = AttendanceSummary),
        (status = 400, description = "Malformed month", body = ErrorResponse, example = json!({
            "message": "Invalid month format. Use YYYY-MM",
            "details": { "month": "2026/02" }
        })),
        (status = 401, description = "Missing or invalid superadmin key", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse),
        (status = 422, description = "Malformed date", body = ErrorResponse)
    ),
    tag = "Attendance",
    security(
        ("superadmin_key" = [])
    )
)]
pub async fn get_attendance(
    service: web::Data<AttendanceService>,
    path: web::Path<String>,
    query: web::Query<AttendanceFilter>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();
    let AttendanceFilter { date, month } = query.into_inner();

    let summary = service
        .summary(&employee_id, date, month.as_deref())
        .await?;

    Ok(HttpResponse::Ok().json(summary))
}
