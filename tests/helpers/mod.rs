#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::NormalizePath;
use actix_web::{App, Error, web};
use chrono::Utc;
use hrms_lite::{db, routes};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// In-memory SQLite pool pinned to a single connection so every request in a
/// test sees the same database. Foreign keys on, matching the runtime pool.
pub async fn setup_test_db() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("invalid sqlite url")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("failed to open in-memory sqlite");
    db::apply_schema(&pool).await.expect("failed to apply schema");
    pool
}

/// App factory mirroring the server composition in `main.rs`.
pub fn test_app(
    pool: SqlitePool,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(NormalizePath::trim())
        .app_data(web::Data::new(pool))
        .configure(|cfg| routes::configure(cfg, "/api"))
}

/// Inserts an employee directly, returning its surrogate key.
pub async fn seed_employee(
    pool: &SqlitePool,
    code: &str,
    full_name: &str,
    email: &str,
    department: &str,
) -> i64 {
    let now = Utc::now().naive_utc();
    let result = sqlx::query(
        r#"
        INSERT INTO employees (employee_id, full_name, email, department, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(code)
    .bind(full_name)
    .bind(email)
    .bind(department)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .expect("failed to seed employee");
    result.last_insert_rowid()
}

/// Inserts an attendance record directly, returning its id.
pub async fn seed_attendance(
    pool: &SqlitePool,
    employee_id: i64,
    date: &str,
    status: &str,
) -> i64 {
    let now = Utc::now().naive_utc();
    let result = sqlx::query(
        r#"
        INSERT INTO attendance (employee_id, date, status, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(date)
    .bind(status)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .expect("failed to seed attendance");
    result.last_insert_rowid()
}
