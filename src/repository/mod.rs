//! Persistence ports for the two aggregates.
//!
//! The registry and the tracker only ever talk to these traits, so they run
//! unchanged against MySQL in the server and against [`memory::InMemoryStore`]
//! in tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use derive_more::Display;

use crate::model::{
    attendance::{AttendanceRecord, AttendanceStatus, NewAttendance},
    employee::{Employee, NewEmployee},
};

#[cfg(test)]
pub mod memory;
pub mod mysql;

pub const EMPLOYEE_ID_KEY: &str = "uq_employees_employee_id";
pub const EMAIL_KEY: &str = "uq_employees_email";
pub const ATTENDANCE_DAY_KEY: &str = "uq_attendance_employee_date";

#[derive(Debug, Display)]
pub enum StoreError {
    /// A unique constraint rejected the write; carries the key name.
    #[display(fmt = "unique constraint `{}` violated", _0)]
    Duplicate(String),
    /// The referenced employee row no longer exists.
    #[display(fmt = "referenced employee does not exist")]
    MissingParent,
    #[display(fmt = "database error: {}", _0)]
    Database(sqlx::Error),
    #[display(fmt = "corrupt row: {}", _0)]
    Corrupt(String),
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return StoreError::Duplicate(duplicate_key_name(db_err.message()));
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::MissingParent;
            }
        }
        StoreError::Database(e)
    }
}

/// MySQL reports the offending index only inside the message:
/// `Duplicate entry 'x' for key 'employees.uq_employees_email'`.
fn duplicate_key_name(message: &str) -> String {
    message
        .rsplit_once("for key '")
        .map(|(_, key)| key.trim_end_matches('\''))
        .map(|key| key.rsplit('.').next().unwrap_or(key))
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn create(&self, new: &NewEmployee) -> Result<Employee, StoreError>;

    /// Newest first.
    async fn all(&self) -> Result<Vec<Employee>, StoreError>;

    async fn get_by_employee_id(&self, employee_id: &str) -> Result<Option<Employee>, StoreError>;

    async fn get_by_email(&self, email: &str) -> Result<Option<Employee>, StoreError>;

    /// Removes the employee together with all of its attendance records.
    /// Returns the number of employee rows removed.
    async fn delete(&self, employee_id: &str) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn insert(&self, new: &NewAttendance) -> Result<AttendanceRecord, StoreError>;

    async fn update_status(
        &self,
        id: u64,
        status: AttendanceStatus,
    ) -> Result<AttendanceRecord, StoreError>;

    async fn find_by_employee_and_date(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, StoreError>;

    /// Ordered by date, most recent first.
    async fn get_by_employee(&self, employee_id: &str) -> Result<Vec<AttendanceRecord>, StoreError>;

    async fn count_present_days(&self, employee_id: &str) -> Result<i64, StoreError>;
}
