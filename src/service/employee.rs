use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::AppError,
    model::employee::{Employee, NewEmployee},
    repository::{EMAIL_KEY, EMPLOYEE_ID_KEY, EmployeeRepository, StoreError},
};

/// Registration, listing and removal of employees.
#[derive(Clone)]
pub struct EmployeeService {
    employees: Arc<dyn EmployeeRepository>,
}

fn employee_id_taken(employee_id: &str) -> AppError {
    AppError::conflict("Employee with this employee_id already exists")
        .with_details(json!({ "employee_id": employee_id }))
}

fn email_taken(email: &str) -> AppError {
    AppError::conflict("Employee with this email already exists")
        .with_details(json!({ "email": email }))
}

pub(crate) fn employee_not_found(employee_id: &str) -> AppError {
    AppError::not_found("Employee not found").with_details(json!({ "employee_id": employee_id }))
}

impl EmployeeService {
    pub fn new(employees: Arc<dyn EmployeeRepository>) -> Self {
        Self { employees }
    }

    /// Fails with `Conflict` when either the employee_id or the email is
    /// already registered; the employee_id is checked first.
    #[instrument(name = "register_employee", skip(self, new), fields(employee_id = %new.employee_id))]
    pub async fn register(&self, new: NewEmployee) -> Result<Employee, AppError> {
        if self
            .employees
            .get_by_employee_id(&new.employee_id)
            .await?
            .is_some()
        {
            return Err(employee_id_taken(&new.employee_id));
        }

        if self.employees.get_by_email(&new.email).await?.is_some() {
            return Err(email_taken(&new.email));
        }

        match self.employees.create(&new).await {
            Ok(employee) => {
                info!(id = employee.id, "Employee registered");
                Ok(employee)
            }
            // Lost a race against a concurrent registration.
            Err(StoreError::Duplicate(key)) if key == EMPLOYEE_ID_KEY => {
                warn!(key = %key, "Unique key rejected employee insert");
                Err(employee_id_taken(&new.employee_id))
            }
            Err(StoreError::Duplicate(key)) if key == EMAIL_KEY => {
                warn!(key = %key, "Unique key rejected employee insert");
                Err(email_taken(&new.email))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list(&self) -> Result<Vec<Employee>, AppError> {
        let employees = self.employees.all().await?;
        debug!(count = employees.len(), "Listed employees");
        Ok(employees)
    }

    /// Deletes the employee and, with it, every attendance record it owns.
    #[instrument(name = "remove_employee", skip(self))]
    pub async fn remove(&self, employee_id: &str) -> Result<(), AppError> {
        if self
            .employees
            .get_by_employee_id(employee_id)
            .await?
            .is_none()
        {
            return Err(employee_not_found(employee_id));
        }

        // Gone between the lookup and the delete: same outcome for the caller.
        if self.employees.delete(employee_id).await? == 0 {
            return Err(employee_not_found(employee_id));
        }

        info!("Employee deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::ErrorKind,
        model::attendance::{AttendanceStatus, NewAttendance},
        repository::{AttendanceRepository, memory::InMemoryStore},
    };
    use async_trait::async_trait;
    use chrono::NaiveDate;

    fn new_employee(employee_id: &str, email: &str) -> NewEmployee {
        NewEmployee {
            employee_id: employee_id.to_string(),
            full_name: "John Doe".to_string(),
            email: email.to_string(),
            department: "Engineering".to_string(),
        }
    }

    fn service() -> (EmployeeService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (EmployeeService::new(store.clone()), store)
    }

    #[actix_web::test]
    async fn register_returns_the_stored_employee() {
        let (service, _) = service();

        let employee = service
            .register(new_employee("EMP001", "john@company.com"))
            .await
            .unwrap();

        assert_eq!(employee.employee_id, "EMP001");
        assert_eq!(employee.email, "john@company.com");
        assert_eq!(service.list().await.unwrap(), vec![employee]);
    }

    #[actix_web::test]
    async fn duplicate_employee_id_conflicts_whatever_the_other_fields() {
        let (service, _) = service();
        service
            .register(new_employee("EMP001", "john@company.com"))
            .await
            .unwrap();

        let err = service
            .register(NewEmployee {
                employee_id: "EMP001".to_string(),
                full_name: "Someone Else".to_string(),
                email: "else@company.com".to_string(),
                department: "Sales".to_string(),
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.details, Some(json!({ "employee_id": "EMP001" })));
    }

    #[actix_web::test]
    async fn duplicate_email_conflicts() {
        let (service, _) = service();
        service
            .register(new_employee("EMP001", "john@company.com"))
            .await
            .unwrap();

        let err = service
            .register(new_employee("EMP002", "john@company.com"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, "Employee with this email already exists");
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn employee_id_collision_wins_over_email_collision() {
        let (service, _) = service();
        service
            .register(new_employee("EMP001", "john@company.com"))
            .await
            .unwrap();

        let err = service
            .register(new_employee("EMP001", "john@company.com"))
            .await
            .unwrap_err();

        assert_eq!(err.message, "Employee with this employee_id already exists");
    }

    /// Lookups never see anyone, so only the insert's unique key can object.
    struct BlindLookups(InMemoryStore);

    #[async_trait]
    impl EmployeeRepository for BlindLookups {
        async fn create(&self, new: &NewEmployee) -> Result<Employee, StoreError> {
            self.0.create(new).await
        }
        async fn all(&self) -> Result<Vec<Employee>, StoreError> {
            self.0.all().await
        }
        async fn get_by_employee_id(&self, _: &str) -> Result<Option<Employee>, StoreError> {
            Ok(None)
        }
        async fn get_by_email(&self, _: &str) -> Result<Option<Employee>, StoreError> {
            Ok(None)
        }
        async fn delete(&self, employee_id: &str) -> Result<u64, StoreError> {
            self.0.delete(employee_id).await
        }
    }

    #[actix_web::test]
    async fn insert_race_maps_to_conflict_on_the_colliding_key() {
        let service = EmployeeService::new(Arc::new(BlindLookups(InMemoryStore::new())));
        service
            .register(new_employee("EMP001", "john@company.com"))
            .await
            .unwrap();

        let err = service
            .register(new_employee("EMP002", "john@company.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.details, Some(json!({ "email": "john@company.com" })));

        let err = service
            .register(new_employee("EMP001", "other@company.com"))
            .await
            .unwrap_err();
        assert_eq!(err.details, Some(json!({ "employee_id": "EMP001" })));
    }

    #[actix_web::test]
    async fn list_is_newest_first() {
        let (service, _) = service();
        for (id, email) in [("EMP001", "a@x.io"), ("EMP002", "b@x.io"), ("EMP003", "c@x.io")] {
            service.register(new_employee(id, email)).await.unwrap();
        }

        let ids: Vec<_> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.employee_id)
            .collect();
        assert_eq!(ids, ["EMP003", "EMP002", "EMP001"]);
    }

    #[actix_web::test]
    async fn remove_unknown_employee_is_not_found() {
        let (service, _) = service();

        let err = service.remove("EMP404").await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.details, Some(json!({ "employee_id": "EMP404" })));
    }

    #[actix_web::test]
    async fn remove_cascades_to_attendance() {
        let (service, store) = service();
        service
            .register(new_employee("EMP001", "john@company.com"))
            .await
            .unwrap();
        service
            .register(new_employee("EMP002", "jane@company.com"))
            .await
            .unwrap();
        for (employee_id, day) in [("EMP001", 24), ("EMP001", 25), ("EMP002", 25)] {
            store
                .insert(&NewAttendance {
                    employee_id: employee_id.to_string(),
                    date: NaiveDate::from_ymd_opt(2026, 2, day).unwrap(),
                    status: AttendanceStatus::Present,
                })
                .await
                .unwrap();
        }

        service.remove("EMP001").await.unwrap();

        let remaining = store.attendance_rows();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].employee_id, "EMP002");
        assert_eq!(service.list().await.unwrap().len(), 1);
    }
}
