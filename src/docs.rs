use crate::api::attendance::{
    AttendanceFilter, AttendanceListResponse, AttendanceSummaryResponse, DateRangeQuery,
    MarkAttendance,
};
use crate::api::employee::{EmployeeListItem, EmployeeListResponse, EmployeePayload};
use crate::model::attendance::{
    AttendanceDetail, AttendanceListItem, AttendanceStatus, AttendanceSummaryRow,
};
use crate::model::employee::Employee;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRMS Lite API",
        version = "1.0.0",
        description = r#"
## HRMS Lite

Lightweight Human Resource Management API.

### 🔹 Key Features
- **Employee Management**
  - Create, update, list, and view employee profiles
- **Attendance Management**
  - Daily present/absent marking, one record per employee per day
  - Filtering by date, employee, and status
  - Per-employee history with date-range bounds and aggregate summaries

### 📦 Response Format
- JSON-based RESTful responses
- Every response carries a `success` flag; failures use a uniform
  `{success, error: {status_code, message, details}}` envelope

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::employee::list_employees,
        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::list_attendance,
        crate::api::attendance::create_attendance,
        crate::api::attendance::get_attendance,
        crate::api::attendance::update_attendance,
        crate::api::attendance::delete_attendance,
        crate::api::attendance::attendance_by_employee,
        crate::api::attendance::attendance_summary,
    ),
    components(
        schemas(
            Employee,
            EmployeePayload,
            EmployeeListItem,
            EmployeeListResponse,
            AttendanceStatus,
            MarkAttendance,
            AttendanceFilter,
            DateRangeQuery,
            AttendanceDetail,
            AttendanceListItem,
            AttendanceSummaryRow,
            AttendanceListResponse,
            AttendanceSummaryResponse,
        )
    ),
    tags(
        (name = "Employee", description = "Employee management APIs"),
        (name = "Attendance", description = "Attendance management APIs"),
    )
)]
pub struct ApiDoc;
