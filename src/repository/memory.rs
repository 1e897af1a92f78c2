use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use super::{
    ATTENDANCE_DAY_KEY, AttendanceRepository, EMAIL_KEY, EMPLOYEE_ID_KEY, EmployeeRepository,
    StoreError,
};
use crate::model::{
    attendance::{AttendanceRecord, AttendanceStatus, NewAttendance},
    employee::{Employee, NewEmployee},
};

#[derive(Default)]
struct State {
    employees: Vec<Employee>,
    attendance: Vec<AttendanceRecord>,
    last_id: u64,
}

impl State {
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }
}

/// Store kept in process memory. Enforces the same unique keys and the
/// employee → attendance cascade as the MySQL schema.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("in-memory store poisoned")
    }

    /// Every attendance row, regardless of owner.
    pub fn attendance_rows(&self) -> Vec<AttendanceRecord> {
        self.state().attendance.clone()
    }
}

#[async_trait]
impl EmployeeRepository for InMemoryStore {
    async fn create(&self, new: &NewEmployee) -> Result<Employee, StoreError> {
        let mut state = self.state();

        if state
            .employees
            .iter()
            .any(|e| e.employee_id == new.employee_id)
        {
            return Err(StoreError::Duplicate(EMPLOYEE_ID_KEY.to_string()));
        }
        if state.employees.iter().any(|e| e.email == new.email) {
            return Err(StoreError::Duplicate(EMAIL_KEY.to_string()));
        }

        let employee = Employee {
            id: state.next_id(),
            employee_id: new.employee_id.clone(),
            full_name: new.full_name.clone(),
            email: new.email.clone(),
            department: new.department.clone(),
            created_at: Utc::now(),
        };
        state.employees.push(employee.clone());
        Ok(employee)
    }

    async fn all(&self) -> Result<Vec<Employee>, StoreError> {
        let mut employees = self.state().employees.clone();
        employees.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(employees)
    }

    async fn get_by_employee_id(&self, employee_id: &str) -> Result<Option<Employee>, StoreError> {
        Ok(self
            .state()
            .employees
            .iter()
            .find(|e| e.employee_id == employee_id)
            .cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Employee>, StoreError> {
        Ok(self
            .state()
            .employees
            .iter()
            .find(|e| e.email == email)
            .cloned())
    }

    async fn delete(&self, employee_id: &str) -> Result<u64, StoreError> {
        let mut state = self.state();
        let before = state.employees.len();

        state.employees.retain(|e| e.employee_id != employee_id);
        state.attendance.retain(|r| r.employee_id != employee_id);

        Ok((before - state.employees.len()) as u64)
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryStore {
    async fn insert(&self, new: &NewAttendance) -> Result<AttendanceRecord, StoreError> {
        let mut state = self.state();

        if !state
            .employees
            .iter()
            .any(|e| e.employee_id == new.employee_id)
        {
            return Err(StoreError::MissingParent);
        }
        if state
            .attendance
            .iter()
            .any(|r| r.employee_id == new.employee_id && r.date == new.date)
        {
            return Err(StoreError::Duplicate(ATTENDANCE_DAY_KEY.to_string()));
        }

        let record = AttendanceRecord {
            id: state.next_id(),
            employee_id: new.employee_id.clone(),
            date: new.date,
            status: new.status,
            created_at: Utc::now(),
        };
        state.attendance.push(record.clone());
        Ok(record)
    }

    async fn update_status(
        &self,
        id: u64,
        status: AttendanceStatus,
    ) -> Result<AttendanceRecord, StoreError> {
        let mut state = self.state();
        let record = state
            .attendance
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(StoreError::MissingParent)?;

        record.status = status;
        Ok(record.clone())
    }

    async fn find_by_employee_and_date(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> Result<Option<AttendanceRecord>, StoreError> {
        Ok(self
            .state()
            .attendance
            .iter()
            .find(|r| r.employee_id == employee_id && r.date == date)
            .cloned())
    }

    async fn get_by_employee(&self, employee_id: &str) -> Result<Vec<AttendanceRecord>, StoreError> {
        let mut records: Vec<_> = self
            .state()
            .attendance
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    async fn count_present_days(&self, employee_id: &str) -> Result<i64, StoreError> {
        let count = self
            .state()
            .attendance
            .iter()
            .filter(|r| r.employee_id == employee_id && r.status == AttendanceStatus::Present)
            .count();
        Ok(count as i64)
    }
}
