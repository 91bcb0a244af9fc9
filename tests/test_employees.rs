mod helpers;

use actix_web::http::StatusCode;
use actix_web::test;
use helpers::*;
use serde_json::{Value, json};

#[actix_web::test]
async fn test_create_employee_returns_created_record() {
    let pool = setup_test_db().await;
    let app = test::init_service(test_app(pool.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/employees/")
        .set_json(json!({
            "employee_id": "EMP-001",
            "full_name": "John Doe",
            "email": "John.Doe@Company.com",
            "department": "Engineering"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], "Employee created successfully");

    let data = &body["data"];
    assert!(data["id"].as_i64().unwrap() > 0);
    assert_eq!(data["employee_id"], "EMP-001");
    assert_eq!(data["full_name"], "John Doe");
    // Email is normalized to lower case on the way in
    assert_eq!(data["email"], "john.doe@company.com");
    assert_eq!(data["department"], "Engineering");
    assert!(data["created_at"].is_string());
    assert!(data["updated_at"].is_string());
}

#[actix_web::test]
async fn test_create_employee_missing_fields_accumulate() {
    let pool = setup_test_db().await;
    let app = test::init_service(test_app(pool.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/employees/")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["status_code"], 400);
    assert_eq!(body["error"]["message"], "Validation failed");

    let details = &body["error"]["details"];
    for field in ["employee_id", "full_name", "email", "department"] {
        assert_eq!(
            details[field][0], "This field is required.",
            "missing violation for {field}"
        );
    }
}

#[actix_web::test]
async fn test_create_employee_blank_and_invalid_fields() {
    let pool = setup_test_db().await;
    let app = test::init_service(test_app(pool.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/employees/")
        .set_json(json!({
            "employee_id": "   ",
            "full_name": "Jane Doe",
            "email": "not-an-email",
            "department": ""
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    let details = &body["error"]["details"];
    assert_eq!(details["employee_id"][0], "Employee ID is required and cannot be empty.");
    assert_eq!(details["email"][0], "Enter a valid email address.");
    assert_eq!(details["department"][0], "Department is required and cannot be empty.");
    assert!(details.get("full_name").is_none());
}

#[actix_web::test]
async fn test_create_employee_duplicate_email_case_insensitive() {
    let pool = setup_test_db().await;
    let app = test::init_service(test_app(pool.clone())).await;
    seed_employee(&pool, "EMP-001", "John Doe", "john@company.com", "Engineering").await;

    let req = test::TestRequest::post()
        .uri("/api/employees/")
        .set_json(json!({
            "employee_id": "EMP-002",
            "full_name": "John Clone",
            "email": "JOHN@COMPANY.COM",
            "department": "Engineering"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(
        body["error"]["details"]["email"][0],
        "An employee with email 'john@company.com' already exists."
    );
}

#[actix_web::test]
async fn test_create_employee_duplicate_code() {
    let pool = setup_test_db().await;
    let app = test::init_service(test_app(pool.clone())).await;
    seed_employee(&pool, "EMP-001", "John Doe", "john@company.com", "Engineering").await;

    let req = test::TestRequest::post()
        .uri("/api/employees/")
        .set_json(json!({
            "employee_id": "EMP-001",
            "full_name": "Someone Else",
            "email": "else@company.com",
            "department": "Sales"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"]["details"]["employee_id"][0],
        "An employee with ID 'EMP-001' already exists."
    );
}

#[actix_web::test]
async fn test_list_employees_reverse_creation_order() {
    let pool = setup_test_db().await;
    let app = test::init_service(test_app(pool.clone())).await;
    seed_employee(&pool, "EMP-001", "First", "first@company.com", "A").await;
    seed_employee(&pool, "EMP-002", "Second", "second@company.com", "B").await;
    seed_employee(&pool, "EMP-003", "Third", "third@company.com", "C").await;

    let req = test::TestRequest::get().uri("/api/employees/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["count"], 3);
    let codes: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["employee_id"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["EMP-003", "EMP-002", "EMP-001"]);
}

#[actix_web::test]
async fn test_get_employee_not_found() {
    let pool = setup_test_db().await;
    let app = test::init_service(test_app(pool.clone())).await;

    let req = test::TestRequest::get().uri("/api/employees/99999/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["status_code"], 404);
    assert!(
        body["error"]["message"].as_str().unwrap().contains("99999"),
        "message should name the missing id: {}",
        body["error"]["message"]
    );
}

#[actix_web::test]
async fn test_update_employee_partial_merge() {
    let pool = setup_test_db().await;
    let app = test::init_service(test_app(pool.clone())).await;
    let id = seed_employee(&pool, "EMP-001", "John Doe", "john@company.com", "Engineering").await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/employees/{id}/"))
        .set_json(json!({ "department": "Operations" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Employee updated successfully");
    let data = &body["data"];
    assert_eq!(data["department"], "Operations");
    assert_eq!(data["employee_id"], "EMP-001");
    assert_eq!(data["full_name"], "John Doe");
    assert_eq!(data["email"], "john@company.com");
    assert!(data["updated_at"].as_str().unwrap() >= data["created_at"].as_str().unwrap());
}

#[actix_web::test]
async fn test_update_employee_uniqueness_excludes_self() {
    let pool = setup_test_db().await;
    let app = test::init_service(test_app(pool.clone())).await;
    let id = seed_employee(&pool, "EMP-001", "John Doe", "john@company.com", "Engineering").await;

    // Re-submitting the record's own unique fields is not a conflict
    let req = test::TestRequest::put()
        .uri(&format!("/api/employees/{id}/"))
        .set_json(json!({ "employee_id": "EMP-001", "email": "john@company.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_update_employee_duplicate_email_rejected() {
    let pool = setup_test_db().await;
    let app = test::init_service(test_app(pool.clone())).await;
    seed_employee(&pool, "EMP-001", "John Doe", "john@company.com", "Engineering").await;
    let other = seed_employee(&pool, "EMP-002", "Jane Doe", "jane@company.com", "Sales").await;

    let req = test::TestRequest::put()
        .uri(&format!("/api/employees/{other}/"))
        .set_json(json!({ "email": "john@company.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"]["details"]["email"][0],
        "An employee with email 'john@company.com' already exists."
    );
}

#[actix_web::test]
async fn test_update_employee_not_found() {
    let pool = setup_test_db().await;
    let app = test::init_service(test_app(pool.clone())).await;

    let req = test::TestRequest::put()
        .uri("/api/employees/424242/")
        .set_json(json!({ "department": "Void" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_delete_employee_cascades_attendance() {
    let pool = setup_test_db().await;
    let app = test::init_service(test_app(pool.clone())).await;
    let id = seed_employee(&pool, "EMP-001", "John Doe", "john@company.com", "Engineering").await;
    seed_attendance(&pool, id, "2024-01-10", "present").await;
    seed_attendance(&pool, id, "2024-01-11", "absent").await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/employees/{id}/"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Employee EMP-001 deleted successfully");

    // Attendance went with the employee
    let req = test::TestRequest::get().uri("/api/attendance/").to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["count"], 0);

    // The summary no longer carries a row for the employee
    let req = test::TestRequest::get().uri("/api/attendance/summary/").to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["count"], 0);

    // And the per-employee history is gone too
    let req = test::TestRequest::get()
        .uri(&format!("/api/attendance/employee/{id}/"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_method_not_allowed_envelope() {
    let pool = setup_test_db().await;
    let app = test::init_service(test_app(pool.clone())).await;

    let req = test::TestRequest::patch().uri("/api/employees/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["status_code"], 405);
    assert_eq!(body["error"]["message"], "Method Not Allowed");
}

#[actix_web::test]
async fn test_malformed_json_body_enveloped() {
    let pool = setup_test_db().await;
    let app = test::init_service(test_app(pool.clone())).await;

    let req = test::TestRequest::post()
        .uri("/api/employees/")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"]["status_code"], 400);
    assert_eq!(body["error"]["message"], "Bad Request - Invalid data provided");
    assert!(body["error"]["details"]["error"].is_string());
}

#[actix_web::test]
async fn test_non_numeric_id_is_not_found() {
    let pool = setup_test_db().await;
    let app = test::init_service(test_app(pool.clone())).await;

    let req = test::TestRequest::get().uri("/api/employees/abc/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
}

#[actix_web::test]
async fn test_api_root_and_health() {
    let pool = setup_test_db().await;
    let app = test::init_service(test_app(pool.clone())).await;

    let req = test::TestRequest::get().uri("/api/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], "Welcome to HRMS Lite API");
    assert_eq!(body["endpoints"]["employees"], "/api/employees/");

    let req = test::TestRequest::get().uri("/api/health/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
}
