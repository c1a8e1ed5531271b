use actix_web::{HttpRequest, HttpResponse, Responder, delete, get, post, put, web};

use crate::dto::list::{ListParams, ListResponse};
use crate::forms::organization::OrganizationForm;
use crate::query::{FilterCriteria, normalize_page_size};
use crate::repository::DieselRepository;
use crate::routes::{error_response, error_status};
use crate::services::{export, organizations};

#[get("/organizations/export")]
pub async fn export_organizations(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let params = ListParams::from_query(req.query_string());
    let criteria = FilterCriteria::from(&params);

    match export::export_organizations(repo.get_ref(), &criteria) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/csv; charset=utf-8")
            .insert_header((
                "Content-Disposition",
                "attachment; filename=\"organizations.csv\"",
            ))
            .body(body),
        Err(err) => error_response(&err),
    }
}

#[get("/organizations")]
pub async fn list_organizations(
    req: HttpRequest,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let params = ListParams::from_query(req.query_string());
    let criteria = FilterCriteria::from(&params);

    match organizations::load_organization_list(repo.get_ref(), &criteria) {
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

#[post("/organizations")]
pub async fn create_organization(
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<OrganizationForm>,
) -> impl Responder {
    match organizations::create_organization(repo.get_ref(), form) {
        Ok(organization) => HttpResponse::Created().json(organization),
        Err(err) => error_response(&err),
    }
}

#[get("/organizations/{id}")]
pub async fn show_organization(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match organizations::get_organization(repo.get_ref(), id.into_inner()) {
        Ok(organization) => HttpResponse::Ok().json(organization),
        Err(err) => error_response(&err),
    }
}

#[put("/organizations/{id}")]
pub async fn update_organization(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<OrganizationForm>,
) -> impl Responder {
    match organizations::update_organization(repo.get_ref(), id.into_inner(), form) {
        Ok(organization) => HttpResponse::Ok().json(organization),
        Err(err) => error_response(&err),
    }
}

#[delete("/organizations/{id}")]
pub async fn delete_organization(
    id: web::Path<i32>,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match organizations::delete_organization(repo.get_ref(), id.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(err) => error_response(&err),
    }
}
