use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, put, web};

use crate::dto::list::{ListParams, ListResponse};
use crate::forms::signup::SignupForm;
use crate::query::{FilterCriteria, normalize_page_size};
use crate::repository::DieselRepository;
use crate::routes::{error_response, error_status};
use crate::services::{export, signups};

#[get("/signups/export")]
pub async fn export_signups(req: HttpRequest, repo: web::Data<DieselRepository>) -> impl Responder {
    let params = ListParams::from_query(req.query_string());
    let criteria = FilterCriteria::from(&params);

    match export::export_signups(repo.get_ref(), &criteria) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                "attachment; filename=\"signups.csv\"",
            ))
            .body(body),
        Err(err) => error_response(&err),
    }
}

#[get("/signups")]
pub async fn list_signups(req: HttpRequest, repo: web::Data<DieselRepository>) -> impl Responder {
    let params = ListParams::from_query(req.query_string());
    let criteria = FilterCriteria::from(&params);

    match signups::load_signup_list(repo.get_ref(), &criteria) {
        Ok(page) => HttpResponse::Ok().json(ListResponse::new(page, params.ticket())),
        Err(err) => {
            let (status, body) = error_status(&err);
            let per_page = normalize_page_size(criteria.per_page);
            HttpResponse::build(status).json(ListResponse::<()>::failed(
                per_page,
                params.ticket(),
                body,
            ))
        }
    }
}

#[post("/signups")]
pub async fn create_signup(
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SignupForm>,
) -> impl Responder {
    match signups::create_signup(repo.get_ref(), form) {
        Ok(signup) => HttpResponse::Created().json(signup),
        Err(err) => error_response(&err),
    }
}

#[get("/signups/{id}")]
pub async fn show_signup(id: web::Path<i32>, repo: web::Data<DieselRepository>) -> impl Responder {
    match signups::get_signup(repo.get_ref(), id.into_inner()) {
        Ok(signup) => HttpResponse::Ok().json(signup),
        Err(err) => error_response(&err),
    }
}

#[put("/signups/{id}")]
pub async fn update_signup(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<SignupForm>,
) -> impl Responder {
    match signups::update_signup(repo.get_ref(), id.into_inner(), form) {
        Ok(signup) => HttpResponse::Ok().json(signup),
        Err(err) => error_response(&err),
    }
}

#[delete("/signups/{id}")]
pub async fn delete_signup(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match signups::delete_signup(repo.get_ref(), id.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(&err),
    }
}
