use actix_web::{HttpResponse, Responder, delete, get, post, put, web};

use crate::forms::category::CategoryForm;
use crate::repository::DieselRepository;
use crate::routes::error_response;
use crate::services::categories;

#[get("/categories")]
pub async fn list_categories(repo: web::Data<DieselRepository>) -> impl Responder {
    match categories::list_categories(repo.get_ref()) {
        Ok(categories) => HttpResponse::Ok().json(categories),
        Err(err) => error_response(&err),
    }
}

#[post("/categories")]
pub async fn create_category(
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<CategoryForm>,
) -> impl Responder {
    match categories::create_category(repo.get_ref(), form) {
        Ok(category) => HttpResponse::Created().json(category),
        Err(err) => error_response(&err),
    }
}

#[put("/categories/{id}")]
pub async fn update_category(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<CategoryForm>,
) -> impl Responder {
    match categories::rename_category(repo.get_ref(), id.into_inner(), form) {
        Ok(category) => HttpResponse::Ok().json(category),
        Err(err) => error_response(&err),
    }
}

#[delete("/categories/{id}")]
pub async fn delete_category(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match categories::delete_category(repo.get_ref(), id.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(&err),
    }
}
