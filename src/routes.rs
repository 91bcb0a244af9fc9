use crate::api::{attendance, employee};
use crate::error;
use actix_web::{HttpResponse, web};
use serde_json::json;

/// Service descriptor exposed at the API root.
async fn api_root() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Welcome to HRMS Lite API",
        "version": "1.0.0",
        "endpoints": {
            "employees": "/api/employees/",
            "attendance": "/api/attendance/",
            "health": "/api/health/",
        }
    }))
}

/// Liveness endpoint for deployment verification.
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "status": "healthy",
        "message": "HRMS Lite API is running"
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig, api_prefix: &str) {
    error::configure_extractors(cfg);

    cfg.service(
        web::scope(api_prefix)
            .service(web::resource("").route(web::get().to(api_root)))
            .service(web::resource("/health").route(web::get().to(health_check)))
            .service(
                web::scope("/employees")
                    // /employees
                    .service(
                        web::resource("")
                            .route(web::get().to(employee::list_employees))
                            .route(web::post().to(employee::create_employee))
                            .default_service(web::to(error::method_not_allowed_handler)),
                    )
                    // /employees/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(employee::get_employee))
                            .route(web::put().to(employee::update_employee))
                            .route(web::delete().to(employee::delete_employee))
                            .default_service(web::to(error::method_not_allowed_handler)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("")
                            .route(web::get().to(attendance::list_attendance))
                            .route(web::post().to(attendance::create_attendance))
                            .default_service(web::to(error::method_not_allowed_handler)),
                    )
                    // /attendance/summary
                    .service(
                        web::resource("/summary")
                            .route(web::get().to(attendance::attendance_summary))
                            .default_service(web::to(error::method_not_allowed_handler)),
                    )
                    // /attendance/employee/{employee_id}
                    .service(
                        web::resource("/employee/{employee_id}")
                            .route(web::get().to(attendance::attendance_by_employee))
                            .default_service(web::to(error::method_not_allowed_handler)),
                    )
                    // /attendance/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(attendance::get_attendance))
                            .route(web::put().to(attendance::update_attendance))
                            .route(web::delete().to(attendance::delete_attendance))
                            .default_service(web::to(error::method_not_allowed_handler)),
                    ),
            )
            .default_service(web::to(error::not_found_handler)),
    );
}
