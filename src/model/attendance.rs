use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Attendance status. A plain data attribute, not a workflow state.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
}

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attendance {
    pub id: i64,
    pub employee_id: i64,
    pub date: NaiveDate,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Attendance row joined with the identity fields of its employee.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceDetail {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "John Doe")]
    pub employee_name: String,
    #[schema(example = "EMP-001")]
    pub employee_code: String,
    #[schema(example = "Engineering")]
    pub employee_department: String,
    #[schema(value_type = String, format = "date", example = "2024-01-15")]
    pub date: NaiveDate,
    #[schema(example = "present")]
    pub status: String,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: NaiveDateTime,
}

/// List projection of [`AttendanceDetail`] without `updated_at`.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceListItem {
    pub id: i64,
    pub employee_name: String,
    pub employee_code: String,
    pub employee_department: String,
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    pub status: String,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
}

/// Per-employee aggregate row, one per employee even with no history.
#[derive(Debug, Serialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceSummaryRow {
    /// Surrogate key of the employee.
    #[schema(example = 1)]
    pub employee_id: i64,
    #[schema(example = "EMP-001")]
    pub employee_code: String,
    #[schema(example = "John Doe")]
    pub employee_name: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = 18)]
    pub total_present: i64,
    #[schema(example = 2)]
    pub total_absent: i64,
    #[schema(example = 20)]
    pub total_records: i64,
}
