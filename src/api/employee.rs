use crate::{
    error::AppError,
    model::employee::{Employee, NewEmployee},
    models::{ErrorResponse, MessageResponse},
    service::employee::EmployeeService,
    utils::validation::Validator,
};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "EMP001", min_length = 2, max_length = 32)]
    pub employee_id: String,
    #[schema(example = "John Doe", min_length = 2, max_length = 150)]
    pub full_name: String,
    #[schema(example = "john@company.com", format = "email", max_length = 255)]
    pub email: String,
    #[schema(example = "Engineering", min_length = 2, max_length = 100)]
    pub department: String,
}

impl CreateEmployee {
    fn validate(self) -> Result<NewEmployee, AppError> {
        Validator::new()
            .length("employee_id", &self.employee_id, 2, 32)
            .length("full_name", &self.full_name, 2, 150)
            .email("email", &self.email)
            .length("department", &self.department, 2, 100)
            .finish()?;

        Ok(NewEmployee {
            employee_id: self.employee_id,
            full_name: self.full_name,
            email: self.email,
            department: self.department,
        })
    }
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created successfully", body = Employee),
        (status = 401, description = "Missing or invalid superadmin key", body = ErrorResponse),
        (status = 409, description = "employee_id or email already registered", body = ErrorResponse, example = json!({
            "message": "Employee with this email already exists",
            "details": { "email": "john@company.com" }
        })),
        (status = 422, description = "Malformed payload", body = ErrorResponse)
    ),
    tag = "Employee",
    security(
        ("superadmin_key" = [])
    )
)]
pub async fn create_employee(
    service: web::Data<EmployeeService>,
    payload: web::Json<CreateEmployee>,
) -> Result<HttpResponse, AppError> {
    let new = payload.into_inner().validate()?;

    let employee = service.register(new).await?;

    Ok(HttpResponse::Created().json(employee))
}

/// List Employees, newest first
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees, most recently created first", body = [Employee]),
        (status = 401, description = "Missing or invalid superadmin key", body = ErrorResponse)
    ),
    tag = "Employee",
    security(
        ("superadmin_key" = [])
    )
)]
pub async fn list_employees(
    service: web::Data<EmployeeService>,
) -> Result<HttpResponse, AppError> {
    let employees = service.list().await?;

    Ok(HttpResponse::Ok().json(employees))
}

/// Delete Employee and its attendance
#[utoipa::path(
    delete,
    path = "/api/employees/{employee_id}",
    params(
        ("employee_id" = String, Path, description = "Employee code, e.g. EMP001")
    ),
    responses(
        (status = 200, description = "Successfully deleted", body = MessageResponse, example = json!({
            "message": "Employee deleted successfully"
        })),
        (status = 401, description = "Missing or invalid superadmin key", body = ErrorResponse),
        (status = 404, description = "Employee not found", body = ErrorResponse, example = json!({
            "message": "Employee not found",
            "details": { "employee_id": "EMP404" }
        }))
    ),
    tag = "Employee",
    security(
        ("superadmin_key" = [])
    )
)]
pub async fn delete_employee(
    service: web::Data<EmployeeService>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let employee_id = path.into_inner();

    service.remove(&employee_id).await?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Employee deleted successfully")))
}
