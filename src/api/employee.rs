use crate::error::{ApiError, ValidationErrors};
use crate::model::employee::Employee;
use actix_web::{HttpResponse, web};
use chrono::{NaiveDateTime, Utc};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use utoipa::ToSchema;

/// Write payload for both create and partial update. Every field is optional
/// so required-field violations accumulate instead of failing JSON
/// deserialization.
#[derive(Deserialize, Serialize, ToSchema)]
pub struct EmployeePayload {
    #[schema(example = "EMP-001", value_type = String)]
    pub employee_id: Option<String>,
    #[schema(example = "John Doe", value_type = String)]
    pub full_name: Option<String>,
    #[schema(example = "john.doe@company.com", format = "email", value_type = String)]
    pub email: Option<String>,
    #[schema(example = "Engineering", value_type = String)]
    pub department: Option<String>,
}

/// List projection: full record minus `updated_at`.
#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct EmployeeListItem {
    pub id: i64,
    pub employee_id: String,
    pub full_name: String,
    pub email: String,
    pub department: String,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    #[schema(example = true)]
    pub success: bool,
    #[schema(example = 2)]
    pub count: usize,
    pub data: Vec<EmployeeListItem>,
}

// -------------------- validation --------------------

/// Create-mode field check: missing and blank values both accumulate.
fn check_required(
    errors: &mut ValidationErrors,
    field: &str,
    value: &Option<String>,
    empty_message: &str,
) -> Option<String> {
    match value {
        None => {
            errors.add(field, "This field is required.");
            None
        }
        Some(v) => {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                errors.add(field, empty_message);
                None
            } else {
                Some(trimmed.to_string())
            }
        }
    }
}

/// Update-mode field check: absent fields are left untouched, provided ones
/// must still be non-blank.
fn check_provided(
    errors: &mut ValidationErrors,
    field: &str,
    value: &Option<String>,
    empty_message: &str,
) -> Option<String> {
    match value {
        None => None,
        Some(_) => check_required(errors, field, value, empty_message),
    }
}

/// Lower-cases and format-checks an already trimmed email value.
fn normalize_email(errors: &mut ValidationErrors, value: String) -> Option<String> {
    let value = value.to_lowercase();
    if EmailAddress::is_valid(&value) {
        Some(value)
    } else {
        errors.add("email", "Enter a valid email address.");
        None
    }
}

async fn employee_code_taken(
    pool: &SqlitePool,
    code: &str,
    exclude_id: i64,
) -> Result<bool, sqlx::Error> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE employee_id = ? AND id <> ?")
            .bind(code)
            .bind(exclude_id)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

async fn email_taken(
    pool: &SqlitePool,
    email: &str,
    exclude_id: i64,
) -> Result<bool, sqlx::Error> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM employees WHERE email = ? AND id <> ?")
            .bind(email)
            .bind(exclude_id)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

pub async fn fetch_employee(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

fn employee_not_found(id: i64) -> ApiError {
    ApiError::not_found(format!("Employee with ID {id} not found"))
}

// -------------------- handlers --------------------

/// List Employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "All employees in reverse-creation order", body = EmployeeListResponse)
    ),
    tag = "Employee"
)]
pub async fn list_employees(pool: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let employees = sqlx::query_as::<_, EmployeeListItem>(
        r#"
        SELECT id, employee_id, full_name, email, department, created_at
        FROM employees
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        success: true,
        count: employees.len(),
        data: employees,
    }))
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = EmployeePayload,
    responses(
        (status = 201, description = "Employee created successfully", body = Employee),
        (status = 400, description = "Validation failed, details list every violated field")
    ),
    tag = "Employee"
)]
pub async fn create_employee(
    pool: web::Data<SqlitePool>,
    payload: web::Json<EmployeePayload>,
) -> Result<HttpResponse, ApiError> {
    let mut errors = ValidationErrors::new();

    let employee_code = check_required(
        &mut errors,
        "employee_id",
        &payload.employee_id,
        "Employee ID is required and cannot be empty.",
    );
    let full_name = check_required(
        &mut errors,
        "full_name",
        &payload.full_name,
        "Full name is required and cannot be empty.",
    );
    let email = check_required(
        &mut errors,
        "email",
        &payload.email,
        "Email is required and cannot be empty.",
    )
    .and_then(|v| normalize_email(&mut errors, v));
    let department = check_required(
        &mut errors,
        "department",
        &payload.department,
        "Department is required and cannot be empty.",
    );

    // id 0 never matches a stored row, so create checks against everything
    if let Some(code) = &employee_code {
        if employee_code_taken(pool.get_ref(), code, 0).await? {
            errors.add(
                "employee_id",
                format!("An employee with ID '{code}' already exists."),
            );
        }
    }
    if let Some(email) = &email {
        if email_taken(pool.get_ref(), email, 0).await? {
            errors.add(
                "email",
                format!("An employee with email '{email}' already exists."),
            );
        }
    }

    errors.into_result()?;
    let (employee_code, full_name, email, department) = (
        employee_code.unwrap(),
        full_name.unwrap(),
        email.unwrap(),
        department.unwrap(),
    );

    let now = Utc::now().naive_utc();
    let result = sqlx::query(
        r#"
        INSERT INTO employees (employee_id, full_name, email, department, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&employee_code)
    .bind(&full_name)
    .bind(&email)
    .bind(&department)
    .bind(now)
    .bind(now)
    .execute(pool.get_ref())
    .await?;

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(pool.get_ref())
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Employee created successfully",
        "data": employee
    })))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id", Path, description = "Employee surrogate key")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn get_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let employee = fetch_employee(pool.get_ref(), id)
        .await?
        .ok_or_else(|| employee_not_found(id))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": employee
    })))
}

/// Update Employee (partial)
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(("id", Path, description = "Employee surrogate key")),
    request_body = EmployeePayload,
    responses(
        (status = 200, description = "Employee updated successfully", body = Employee),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn update_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<EmployeePayload>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let existing = fetch_employee(pool.get_ref(), id)
        .await?
        .ok_or_else(|| employee_not_found(id))?;

    let mut errors = ValidationErrors::new();

    let employee_code = check_provided(
        &mut errors,
        "employee_id",
        &payload.employee_id,
        "Employee ID is required and cannot be empty.",
    )
    .unwrap_or_else(|| existing.employee_id.clone());
    let full_name = check_provided(
        &mut errors,
        "full_name",
        &payload.full_name,
        "Full name is required and cannot be empty.",
    )
    .unwrap_or_else(|| existing.full_name.clone());
    let email = check_provided(
        &mut errors,
        "email",
        &payload.email,
        "Email is required and cannot be empty.",
    )
    .and_then(|v| normalize_email(&mut errors, v))
    .unwrap_or_else(|| existing.email.clone());
    let department = check_provided(
        &mut errors,
        "department",
        &payload.department,
        "Department is required and cannot be empty.",
    )
    .unwrap_or_else(|| existing.department.clone());

    // Uniqueness checks exclude the record being updated
    if employee_code_taken(pool.get_ref(), &employee_code, id).await? {
        errors.add(
            "employee_id",
            format!("An employee with ID '{employee_code}' already exists."),
        );
    }
    if email_taken(pool.get_ref(), &email, id).await? {
        errors.add(
            "email",
            format!("An employee with email '{email}' already exists."),
        );
    }

    errors.into_result()?;

    let now = Utc::now().naive_utc();
    sqlx::query(
        r#"
        UPDATE employees
        SET employee_id = ?, full_name = ?, email = ?, department = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&employee_code)
    .bind(&full_name)
    .bind(&email)
    .bind(&department)
    .bind(now)
    .bind(id)
    .execute(pool.get_ref())
    .await?;

    let employee = sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(id)
        .fetch_one(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Employee updated successfully",
        "data": employee
    })))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id", Path, description = "Employee surrogate key")),
    responses(
        (status = 200, description = "Employee and its attendance records deleted"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employee"
)]
pub async fn delete_employee(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let employee = fetch_employee(pool.get_ref(), id)
        .await?
        .ok_or_else(|| employee_not_found(id))?;

    // Attendance rows go with it via ON DELETE CASCADE
    sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(id)
        .execute(pool.get_ref())
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": format!("Employee {} deleted successfully", employee.employee_id)
    })))
}
