use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": 11,
        "employee_id": "EMP001",
        "date": "2026-02-25",
        "status": "PRESENT",
        "created_at": "2026-02-25T09:30:00Z"
    })
)]
pub struct AttendanceRecord {
    #[schema(example = 11)]
    pub id: u64,

    #[schema(example = "EMP001")]
    pub employee_id: String,

    #[schema(example = "2026-02-25", value_type = String, format = "date")]
    pub date: NaiveDate,

    pub status: AttendanceStatus,

    #[schema(
        example = "2026-02-25T09:30:00Z",
        value_type = String,
        format = "date-time"
    )]
    pub created_at: DateTime<Utc>,
}

/// Input of a single mark: one employee, one day, one status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendance {
    pub employee_id: String,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AttendanceSummary {
    #[schema(example = "EMP001")]
    pub employee_id: String,
    #[schema(example = 2)]
    pub total_records: i64,
    #[schema(example = 1)]
    pub total_present: i64,
    pub records: Vec<AttendanceRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_uses_upper_case_names() {
        assert_eq!(AttendanceStatus::Present.to_string(), "PRESENT");
        assert_eq!(
            AttendanceStatus::from_str("ABSENT").unwrap(),
            AttendanceStatus::Absent
        );
        assert!(AttendanceStatus::from_str("present").is_err());

        let json = serde_json::to_value(AttendanceStatus::Absent).unwrap();
        assert_eq!(json, serde_json::json!("ABSENT"));
    }
}
