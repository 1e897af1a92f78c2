use std::sync::Arc;

use chrono::{Months, NaiveDate};
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use super::employee::employee_not_found;
use crate::{
    error::AppError,
    model::attendance::{AttendanceRecord, AttendanceStatus, AttendanceSummary, NewAttendance},
    repository::{ATTENDANCE_DAY_KEY, AttendanceRepository, EmployeeRepository, StoreError},
};

/// `[start, end)` of a calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// Parses exactly `YYYY-MM`: four digit year, hyphen, two digit month.
pub fn parse_month(value: &str) -> Option<MonthRange> {
    let bytes = value.as_bytes();
    if bytes.len() != 7 || bytes[4] != b'-' {
        return None;
    }
    let all_digits = |part: &[u8]| part.iter().all(u8::is_ascii_digit);
    if !all_digits(&bytes[..4]) || !all_digits(&bytes[5..]) {
        return None;
    }

    let year: i32 = value[..4].parse().ok()?;
    let month: u32 = value[5..].parse().ok()?;
    if year == 0 {
        return None;
    }

    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = start.checked_add_months(Months::new(1))?;
    Some(MonthRange { start, end })
}

/// Marking and querying daily attendance.
#[derive(Clone)]
pub struct AttendanceService {
    employees: Arc<dyn EmployeeRepository>,
    attendance: Arc<dyn AttendanceRepository>,
}

impl AttendanceService {
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        attendance: Arc<dyn AttendanceRepository>,
    ) -> Self {
        Self {
            employees,
            attendance,
        }
    }

    async fn ensure_employee(&self, employee_id: &str) -> Result<(), AppError> {
        match self.employees.get_by_employee_id(employee_id).await? {
            Some(_) => Ok(()),
            None => Err(employee_not_found(employee_id)),
        }
    }

    /// Creates the record for the day, or overwrites the status of the one
    /// already there. The flag is `true` only when a new record was created.
    #[instrument(
        name = "mark_attendance",
        skip(self, mark),
        fields(employee_id = %mark.employee_id, date = %mark.date, status = %mark.status)
    )]
    pub async fn mark(&self, mark: NewAttendance) -> Result<(AttendanceRecord, bool), AppError> {
        self.ensure_employee(&mark.employee_id).await?;

        if let Some(existing) = self
            .attendance
            .find_by_employee_and_date(&mark.employee_id, mark.date)
            .await?
        {
            let updated = self.overwrite(existing.id, mark.status, &mark.employee_id).await?;
            info!(id = updated.id, "Attendance updated");
            return Ok((updated, false));
        }

        match self.attendance.insert(&mark).await {
            Ok(record) => {
                info!(id = record.id, "Attendance created");
                Ok((record, true))
            }
            // A concurrent mark created the day first; correct it instead.
            Err(StoreError::Duplicate(key)) if key == ATTENDANCE_DAY_KEY => {
                warn!(key = %key, "Attendance insert lost race, updating instead");
                let existing = self
                    .attendance
                    .find_by_employee_and_date(&mark.employee_id, mark.date)
                    .await?
                    .ok_or_else(|| employee_not_found(&mark.employee_id))?;
                let updated = self.overwrite(existing.id, mark.status, &mark.employee_id).await?;
                Ok((updated, false))
            }
            Err(StoreError::MissingParent) => Err(employee_not_found(&mark.employee_id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn overwrite(
        &self,
        id: u64,
        status: AttendanceStatus,
        employee_id: &str,
    ) -> Result<AttendanceRecord, AppError> {
        match self.attendance.update_status(id, status).await {
            Ok(record) => Ok(record),
            Err(StoreError::MissingParent) => Err(employee_not_found(employee_id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Records of one employee, newest day first, optionally narrowed to a
    /// month (`YYYY-MM`) and/or a single day.
    ///
    /// Without filters `total_present` comes from a separate count over all
    /// of the employee's records; with any filter it counts the filtered set.
    #[instrument(name = "attendance_summary", skip(self))]
    pub async fn summary(
        &self,
        employee_id: &str,
        date: Option<NaiveDate>,
        month: Option<&str>,
    ) -> Result<AttendanceSummary, AppError> {
        self.ensure_employee(employee_id).await?;

        // `?month=` with no value means no month filter.
        let month = month.filter(|m| !m.is_empty());
        let month_range = match month {
            Some(value) => Some(parse_month(value).ok_or_else(|| {
                AppError::bad_request("Invalid month format. Use YYYY-MM")
                    .with_details(json!({ "month": value }))
            })?),
            None => None,
        };

        let mut records = self.attendance.get_by_employee(employee_id).await?;

        if let Some(range) = month_range {
            records.retain(|r| range.contains(r.date));
        }
        if let Some(day) = date {
            records.retain(|r| r.date == day);
        }

        let total_present = if month.is_some() || date.is_some() {
            records
                .iter()
                .filter(|r| r.status == AttendanceStatus::Present)
                .count() as i64
        } else {
            self.attendance.count_present_days(employee_id).await?
        };

        debug!(total_records = records.len(), total_present, "Attendance summary built");

        Ok(AttendanceSummary {
            employee_id: employee_id.to_string(),
            total_records: records.len() as i64,
            total_present,
            records,
        })
    }
}
