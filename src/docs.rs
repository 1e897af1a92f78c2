use crate::api::attendance::MarkAttendance;
use crate::api::employee::CreateEmployee;
use crate::auth::secret::ADMIN_KEY_HEADER;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, AttendanceSummary};
use crate::model::employee::Employee;
use crate::models::{EnterKeyReq, ErrorResponse, MessageResponse};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS Lite API",
        version = "1.0.0",
        description = r#"
## HRMS Lite

A small human-resources record service: employee registration and daily attendance.

### Key Features
- **Employee Management**
  - Register, list and delete employees (deleting removes their attendance too)
- **Attendance Management**
  - Mark a day PRESENT or ABSENT; marking the same day again corrects it
  - Per-employee summary, filterable by day and by month

### Security
Every `/employees` and `/attendance` endpoint requires the shared admin secret
in the `X-Superadmin-Key` header.

### Errors
Every non-2xx response has the shape `{"message": string, "details": object|null}`.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::health::health,
        crate::auth::handlers::enter,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::delete_employee,

        crate::api::attendance::mark_attendance,
        crate::api::attendance::get_attendance
    ),
    components(
        schemas(
            CreateEmployee,
            Employee,
            MarkAttendance,
            AttendanceStatus,
            AttendanceRecord,
            AttendanceSummary,
            EnterKeyReq,
            MessageResponse,
            ErrorResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Auth", description = "Admin key check"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "superadmin_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ADMIN_KEY_HEADER))),
            );
        }
    }
}
