use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use sqlx::{FromRow, MySqlPool};
use tracing::debug;

use super::{AttendanceRepository, EmployeeRepository, StoreError};
use crate::model::{
    attendance::{AttendanceRecord, AttendanceStatus, NewAttendance},
    employee::{Employee, NewEmployee},
};

/// sqlx-backed store shared by both repositories.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

// `TIMESTAMP(6)` keeps microseconds; truncate so the returned value matches
// what a later read produces.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

#[derive(FromRow)]
struct AttendanceRow {
    id: u64,
    employee_id: String,
    date: NaiveDate,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AttendanceRow> for AttendanceRecord {
    type Error = StoreError;

    fn try_from(row: AttendanceRow) -> Result<Self, Self::Error> {
        let status = AttendanceStatus::from_str(&row.status)
            .map_err(|_| StoreError::Corrupt(format!("attendance status `{}`", row.status)))?;

        Ok(AttendanceRecord {
            id: row.id,
            employee_id: row.employee_id,
            date: row.date,
            status,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl EmployeeRepository for MySqlStore {
    async fn create(&self, new: &NewEmployee) -> Result<Employee, StoreError> {
        let created_at = now();

        let result = sqlx::query(
            r#"
            INSERT INTO employees
            (employee_id, full_name, email, department, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.employee_id)
        .bind(&new.full_name)
        .bind(&new.email)
        .bind(&new.department)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(Employee {
            id: result.last_insert_id(),
            employee_id: new.employee_id.clone(),
            full_name: new.full_name.clone(),
            email: new.email.clone(),
            department: new.department.clone(),
            created_at,
        })
    }

    async fn all(&self) -> Result<Vec<Employee>, StoreError> {
        let employees = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, employee_id, full_name, email, department, created_at
            FROM employees
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = employees.len(), "Fetched employees");
        Ok(employees)
    }

    async fn get_by_employee_id(&self, employee_id: &str) -> Result<Option<Employee>, StoreError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, employee_id, full_name, email, department, created_at
            FROM employees
            WHERE employee_id = ?
            "#,
        )
        .bind(employee_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Employee>, StoreError> {
        let employee = sqlx::query_as::<_, Employee>(
            r#"
            SELECT id, employee_id, full_name, email, department, created_at
            FROM employees
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(employee)
    }

    async fn delete(&self, employee_id: &str) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;

        // The foreign key cascades as well; deleting explicitly keeps the
        // behaviour independent of the engine's FK settings.
        let records = sqlx::query("DELETE FROM attendance WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&mut *tx)
            .await?;

        let employees = sqlx::query("DELETE FROM employees WHERE employee_id = ?")
            .bind(employee_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        debug!(
            employee_id,
            attendance_removed = records.rows_affected(),
            "Deleted employee rows"
        );
        Ok(employees.rows_affected())
    }
}

#[async_trait]
impl AttendanceRepository for MySqlStore {
    async fn insert(&self, new: &NewAttendance) -> Result<AttendanceRecord, StoreError> {
        let created_at = now();

        let result = sqlx::query(
            r#"
            INSERT INTO attendance (employee_id, date, status, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&new.employee_id)
        .bind(new.date)
        .bind(new.status.to_string())
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(AttendanceRecord {
            id: result.last_insert_id(),
            employee_id: new.employee_id.clone(),
            date: new.date,
            status: new.status,
            created_at,
        })
    }

    async fn update_status(
        &self,
        id: u64,
        status: AttendanceStatus,
    ) -> Result<AttendanceRecord, StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE attendance SET status = ? WHERE id = ?")
            .bind(status.to_string())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, AttendanceRow>(
            r#"
            SELECT id, employee_id, date, status, created_at
            FROM attendance
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        tx.commit().await?;

        // The record only disappears when its employee was deleted meanwhile.
        row.ok_or(StoreError::MissingParent)?.try_into()
    }

    async fn find_by_employee_and_date(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        let row = sqlx::query_as::<_, AttendanceRow>(
            r#"
            SELECT id, employee_id, date, status, created_at
            FROM attendance
            WHERE employee_id = ?
            AND date = ?
            "#,
        )
        .bind(employee_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        row.map(AttendanceRecord::try_from).transpose()
    }

    async fn get_by_employee(&self, employee_id: &str) -> Result<Vec<AttendanceRecord>, StoreError> {
        let rows = sqlx::query_as::<_, AttendanceRow>(
            r#"
            SELECT id, employee_id, date, status, created_at
            FROM attendance
            WHERE employee_id = ?
            ORDER BY date DESC
            "#,
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(AttendanceRecord::try_from).collect()
    }

    async fn count_present_days(&self, employee_id: &str) -> Result<i64, StoreError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM attendance WHERE employee_id = ? AND status = ?",
        )
        .bind(employee_id)
        .bind(AttendanceStatus::Present.to_string())
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
