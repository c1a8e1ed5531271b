//! JSON endpoints under `/api/v1` plus the health check.

use actix_web::error::InternalError;
use actix_web::{HttpResponse, get, http::StatusCode, web};
use serde_json::json;

use crate::dto::ErrorBody;
use crate::repository::errors::RepositoryError;
use crate::services::ServiceError;

pub mod categories;
pub mod dashboard;
pub mod organizations;
pub mod signups;

/// Registers every route. Shared by the server and the route tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let form_config = web::FormConfig::default().error_handler(|err, _req| {
        log::warn!("Rejected form body: {err}");
        let body = ErrorBody {
            error: format!("ข้อมูลไม่ถูกต้อง: {err}"),
            retry: false,
        };
        InternalError::from_response(err, HttpResponse::UnprocessableEntity().json(body)).into()
    });

    cfg.app_data(form_config).service(health).service(
        web::scope("/api/v1")
            .service(dashboard::show_dashboard)
            .service(signups::export_signups)
            .service(signups::list_signups)
            .service(signups::create_signup)
            .service(signups::show_signup)
            .service(signups::update_signup)
            .service(signups::delete_signup)
            .service(organizations::export_organizations)
            .service(organizations::list_organizations)
            .service(organizations::create_organization)
            .service(organizations::show_organization)
            .service(organizations::update_organization)
            .service(organizations::delete_organization)
            .service(categories::list_categories)
            .service(categories::create_category)
            .service(categories::update_category)
            .service(categories::delete_category),
    );
}

#[get("/health")]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Status code and user-facing message for a failed operation.
pub fn error_status(err: &ServiceError) -> (StatusCode, ErrorBody) {
    let retry = err.is_retryable();
    let (status, message) = match err {
        ServiceError::NotFound => (StatusCode::NOT_FOUND, "ไม่พบข้อมูลที่ต้องการ".to_string()),
        ServiceError::Form(detail) | ServiceError::TypeConstraint(detail) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("ข้อมูลไม่ถูกต้อง: {detail}"),
        ),
        ServiceError::Repository(RepositoryError::ConstraintViolation(_)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "ข้อมูลขัดแย้งกับข้อมูลที่มีอยู่".to_string(),
        ),
        ServiceError::Repository(_) if retry => (
            StatusCode::SERVICE_UNAVAILABLE,
            "ไม่สามารถเชื่อมต่อฐานข้อมูลได้ กรุณาลองใหม่อีกครั้ง".to_string(),
        ),
        ServiceError::Repository(_) | ServiceError::Internal(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "เกิดข้อผิดพลาด กรุณาลองใหม่ภายหลัง".to_string(),
        ),
    };

    (
        status,
        ErrorBody {
            error: message,
            retry,
        },
    )
}

pub fn error_response(err: &ServiceError) -> HttpResponse {
    let (status, body) = error_status(err);
    HttpResponse::build(status).json(body)
}
