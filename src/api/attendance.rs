use crate::api::employee::fetch_employee;
use crate::error::{ApiError, ValidationErrors};
use crate::model::attendance::{
    Attendance, AttendanceDetail, AttendanceListItem, AttendanceStatus, AttendanceSummaryRow,
};
use crate::model::employee::Employee;
use crate::utils::db_utils::{SqlValue, fetch_all_as, where_clause};
use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::debug;
use utoipa::ToSchema;

const LIST_COLUMNS: &str = r#"
    SELECT a.id,
           e.full_name  AS employee_name,
           e.employee_id AS employee_code,
           e.department AS employee_department,
           a.date, a.status, a.created_at
    FROM attendance a
    JOIN employees e ON e.id = a.employee_id
"#;

/// Write payload for create and partial update. `date` stays a raw string so
/// a bad format is reported as a field violation alongside the others.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct MarkAttendance {
    /// Surrogate key of the employee being marked.
    #[schema(example = 1, value_type = i64)]
    pub employee_id: Option<i64>,
    #[schema(example = "2024-01-15", format = "date", value_type = String)]
    pub date: Option<String>,
    #[schema(example = "present", value_type = String)]
    pub status: Option<String>,
}

/// Conjunctive equality filters on the attendance list.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AttendanceFilter {
    #[schema(value_type = Option<String>, format = "date")]
    pub date: Option<NaiveDate>,
    pub employee_id: Option<i64>,
    pub status: Option<String>,
}

/// Inclusive date range bounds on the per-employee history.
#[derive(Debug, Deserialize, ToSchema)]
pub struct DateRangeQuery {
    #[schema(value_type = Option<String>, format = "date")]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = "date")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = 2)]
    pub count: usize,
    pub data: Vec<AttendanceListItem>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceSummaryResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = 2)]
    pub count: usize,
    pub data: Vec<AttendanceSummaryRow>,
}

// -------------------- validation --------------------

fn parse_date(errors: &mut ValidationErrors, value: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.add(
                "date",
                "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.",
            );
            None
        }
    }
}

fn parse_status(errors: &mut ValidationErrors, value: &str) -> Option<AttendanceStatus> {
    match AttendanceStatus::from_str(value) {
        Ok(status) => Some(status),
        Err(_) => {
            errors.add("status", "Status must be either 'present' or 'absent'.");
            None
        }
    }
}

/// Resolves the referenced employee, accumulating a violation when absent.
async fn resolve_employee(
    pool: &SqlitePool,
    errors: &mut ValidationErrors,
    id: i64,
) -> Result<Option<Employee>, ApiError> {
    let employee = fetch_employee(pool, id).await?;
    if employee.is_none() {
        errors.add("employee_id", format!("Employee with id {id} does not exist."));
    }
    Ok(employee)
}

/// Duplicate (employee, date) check, excluding the row being updated.
async fn duplicate_pair(
    pool: &SqlitePool,
    employee_id: i64,
    date: NaiveDate,
    exclude_id: i64,
) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM attendance WHERE employee_id = ? AND date = ? AND id <> ?",
    )
    .bind(employee_id)
    .bind(date)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

async fn fetch_attendance(pool: &SqlitePool, id: i64) -> Result<Option<Attendance>, sqlx::Error> {
    sqlx::query_as::<_, Attendance>("SELECT * FROM attendance WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

async fn fetch_attendance_detail(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<AttendanceDetail>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceDetail>(
        r#"
        SELECT a.id,
               e.full_name  AS employee_name,
               e.employee_id AS employee_code,
               e.department AS employee_department,
               a.date, a.status, a.created_at, a.updated_at
        FROM attendance a
        JOIN employees e ON e.id = a.employee_id
        WHERE a.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

fn attendance_not_found(id: i64) -> ApiError {
    ApiError::not_found(format!("Attendance record with ID {id} not found"))
}

// -------------------- handlers --------------------

/// List Attendance Records
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(
        ("date" = Option<String>, Query, description = "Filter by exact date (YYYY-MM-DD)"),
        ("employee_id" = Option<i64>, Query, description = "Filter by employee surrogate key"),
        ("status" = Option<String>, Query, description = "Filter by status (present/absent)")
    ),
    responses(
        (status = 200, description = "Attendance records, newest date first", body = AttendanceListResponse)
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    pool: web::Data<SqlitePool>,
    query: web::Query<AttendanceFilter>,
) -> Result<HttpResponse, ApiError> {
    let mut conditions: Vec<&str> = Vec::new();
    let mut values: Vec<SqlValue> = Vec::new();

    if let Some(date) = query.date {
        conditions.push("a.date = ?");
        values.push(date.into());
    }
    if let Some(employee_id) = query.employee_id {
        conditions.push("a.employee_id = ?");
        values.push(employee_id.into());
    }
    if let Some(status) = &query.status {
        conditions.push("a.status = ?");
        values.push(status.clone().into());
    }

    let sql = format!(
        "{LIST_COLUMNS} {} ORDER BY a.date DESC, a.created_at DESC, a.id DESC",
        where_clause(&conditions)
    );
    debug!(sql = %sql, values = ?values, "Fetching attendance records");

    let records: Vec<AttendanceListItem> = fetch_all_as(pool.get_ref(), &sql, &values).await?;

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        success: true,
        count: records.len(),
        data: records,
    }))
}

/// Mark Attendance
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = MarkAttendance,
    responses(
        (status = 201, description = "Attendance marked successfully", body = AttendanceDetail),
        (status = 400, description = "Validation failed or duplicate (employee, date) pair")
    ),
    tag = "Attendance"
)]
pub async fn create_attendance(
    pool: web::Data<SqlitePool>,
    payload: web::Json<MarkAttendance>,
) -> Result<HttpResponse, ApiError> {
    let mut errors = ValidationErrors::new();

    let employee = match payload.employee_id {
        Some(id) => resolve_employee(pool.get_ref(), &mut errors, id).await?,
        None => {
            errors.add("employee_id", "This field is required.");
            None
        }
    };
    let date = match &payload.date {
        Some(v) => parse_date(&mut errors, v),
        None => {
            errors.add("date", "This field is required.");
            None
        }
    };
    let status = match &payload.status {
        Some(v) => parse_status(&mut errors, v),
        None => {
            errors.add("status", "This field is required.");
            None
        }
    };

    if let (Some(employee), Some(date)) = (&employee, date) {
        if duplicate_pair(pool.get_ref(), employee.id, date, 0).await? {
            errors.add(
                "non_field_errors",
                format!(
                    "Attendance for employee '{}' on {} already exists.",
                    employee.employee_id, date
                ),
            );
        }
    }

    errors.into_result()?;
    let (employee, date, status) = (employee.unwrap(), date.unwrap(), status.unwrap());

    let now = Utc::now().naive_utc();
    let result = sqlx::query(
        r#"
        INSERT INTO attendance (employee_id, date, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee.id)
    .bind(date)
    .bind(status.to_string())
    .bind(now)
    .bind(now)
    .execute(pool.get_ref())
    .await?;

    let record = fetch_attendance_detail(pool.get_ref(), result.last_insert_rowid())
        .await?
        .ok_or_else(|| attendance_not_found(result.last_insert_rowid()))?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Attendance marked successfully",
        "data": record
    })))
}

/// Get Attendance Record by ID
#[utoipa::path(
    get,
    path = "/api/attendance/{id}",
    params(("id", Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Attendance record found", body = AttendanceDetail),
        (status = 404, description = "Attendance record not found")
    ),
    tag = "Attendance"
)]
pub async fn get_attendance(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let record = fetch_attendance_detail(pool.get_ref(), id)
        .await?
        .ok_or_else(|| attendance_not_found(id))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": record
    })))
}

/// Update Attendance Record (partial)
#[utoipa::path(
    put,
    path = "/api/attendance/{id}",
    params(("id", Path, description = "Attendance record ID")),
    request_body = MarkAttendance,
    responses(
        (status = 200, description = "Attendance updated successfully", body = AttendanceDetail),
        (status = 400, description = "Validation failed or duplicate (employee, date) pair"),
        (status = 404, description = "Attendance record not found")
    ),
    tag = "Attendance"
)]
pub async fn update_attendance(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<MarkAttendance>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let existing = fetch_attendance(pool.get_ref(), id)
        .await?
        .ok_or_else(|| attendance_not_found(id))?;

    let mut errors = ValidationErrors::new();

    let employee = match payload.employee_id {
        Some(employee_id) => resolve_employee(pool.get_ref(), &mut errors, employee_id).await?,
        None => fetch_employee(pool.get_ref(), existing.employee_id).await?,
    };
    let date = match &payload.date {
        Some(v) => parse_date(&mut errors, v),
        None => Some(existing.date),
    };
    let status = match &payload.status {
        Some(v) => parse_status(&mut errors, v).map(|s| s.to_string()),
        None => Some(existing.status.clone()),
    };

    if let (Some(employee), Some(date)) = (&employee, date) {
        if duplicate_pair(pool.get_ref(), employee.id, date, id).await? {
            errors.add(
                "non_field_errors",
                format!(
                    "Attendance for employee '{}' on {} already exists.",
                    employee.employee_id, date
                ),
            );
        }
    }

    errors.into_result()?;
    let (employee, date, status) = (employee.unwrap(), date.unwrap(), status.unwrap());

    let now = Utc::now().naive_utc();
    sqlx::query(
        r#"
        UPDATE attendance
        SET employee_id = ?, date = ?, status = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(employee.id)
    .bind(date)
    .bind(&status)
    .bind(now)
    .bind(id)
    .execute(pool.get_ref())
    .await?;

    let record = fetch_attendance_detail(pool.get_ref(), id)
        .await?
        .ok_or_else(|| attendance_not_found(id))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Attendance updated successfully",
        "data": record
    })))
}

/// Delete Attendance Record
#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(("id", Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Attendance record deleted successfully"),
        (status = 404, description = "Attendance record not found")
    ),
    tag = "Attendance"
)]
pub async fn delete_attendance(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    fetch_attendance(pool.get_ref(), id)
        .await?
        .ok_or_else(|| attendance_not_found(id))?;

    sqlx::query("DELETE FROM attendance WHERE id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Attendance record deleted successfully"
    })))
}

/// Attendance History for an Employee
#[utoipa::path(
    get,
    path = "/api/attendance/employee/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee surrogate key"),
        ("start_date" = Option<String>, Query, description = "Inclusive lower bound (YYYY-MM-DD)"),
        ("end_date" = Option<String>, Query, description = "Inclusive upper bound (YYYY-MM-DD)")
    ),
    responses(
        (status = 200, description = "Employee history with present/absent summary"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Attendance"
)]
pub async fn attendance_by_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    query: web::Query<DateRangeQuery>,
) -> Result<HttpResponse, ApiError> {
    let employee_pk = path.into_inner();
    let employee = fetch_employee(pool.get_ref(), employee_pk)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Employee with ID {employee_pk} not found")))?;

    let mut conditions: Vec<&str> = vec!["a.employee_id = ?"];
    let mut values: Vec<SqlValue> = vec![employee.id.into()];

    if let Some(start_date) = query.start_date {
        conditions.push("a.date >= ?");
        values.push(start_date.into());
    }
    if let Some(end_date) = query.end_date {
        conditions.push("a.date <= ?");
        values.push(end_date.into());
    }

    let sql = format!(
        "{LIST_COLUMNS} {} ORDER BY a.date DESC, a.id DESC",
        where_clause(&conditions)
    );
    debug!(sql = %sql, values = ?values, "Fetching employee attendance history");

    let records: Vec<AttendanceListItem> = fetch_all_as(pool.get_ref(), &sql, &values).await?;

    // Summary counts respect the same (possibly range-filtered) selection
    let present = AttendanceStatus::Present.to_string();
    let total_present = records.iter().filter(|r| r.status == present).count();
    let total_absent = records.len() - total_present;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "employee": {
            "id": employee.id,
            "employee_id": employee.employee_id,
            "full_name": employee.full_name,
            "department": employee.department,
        },
        "summary": {
            "total_present": total_present,
            "total_absent": total_absent,
            "total_records": records.len(),
        },
        "data": records
    })))
}

/// Attendance Summary for All Employees
#[utoipa::path(
    get,
    path = "/api/attendance/summary",
    responses(
        (status = 200, description = "One aggregate row per employee, zeros when no history", body = AttendanceSummaryResponse)
    ),
    tag = "Attendance"
)]
pub async fn attendance_summary(pool: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let rows = sqlx::query_as::<_, AttendanceSummaryRow>(
        r#"
        SELECT e.id          AS employee_id,
               e.employee_id AS employee_code,
               e.full_name   AS employee_name,
               e.department  AS department,
               COALESCE(SUM(CASE WHEN a.status = 'present' THEN 1 ELSE 0 END), 0) AS total_present,
               COALESCE(SUM(CASE WHEN a.status = 'absent' THEN 1 ELSE 0 END), 0)  AS total_absent,
               COUNT(a.id)   AS total_records
        FROM employees e
        LEFT JOIN attendance a ON a.employee_id = e.id
        GROUP BY e.id
        ORDER BY e.created_at DESC, e.id DESC
        "#,
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(AttendanceSummaryResponse {
        success: true,
        count: rows.len(),
        data: rows,
    }))
}
