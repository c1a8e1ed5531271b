use actix_web::{HttpResponse, Responder, get, web};
use chrono::Utc;

use crate::repository::DieselRepository;
use crate::services::dashboard::load_dashboard;

/// Always answers 200. A failed data source shows up as a zeroed summary
/// with `error` set.
#[get("/dashboard")]
pub async fn show_dashboard(repo: web::Data<DieselRepository>) -> impl Responder {
    let today = Utc::now().date_naive();
    HttpResponse::Ok().json(load_dashboard(repo.get_ref(), today))
}
