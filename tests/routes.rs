use actix_web::{App, http::StatusCode, test, web};
use lent_campaign::domain::signup::PledgeType;
use lent_campaign::repository::{DieselRepository, SignupWriter};
use lent_campaign::routes::configure;
use lent_campaign::sequence::{Sequencer, Ticket};
use serde_json::Value;

mod common;

use common::{day, signup};

fn seeded_repo(test_db: &common::TestDb, rows: u32) -> DieselRepository {
    let repo = DieselRepository::new(test_db.pool());
    for n in 1..=rows {
        let province = if n % 2 == 0 { Some("ตาก") } else { Some("น่าน") };
        repo.create_signup(&signup(
            &format!("คน{n:02}"),
            province,
            None,
            PledgeType::FullLent,
            30,
            day(7, n),
        ))
        .unwrap();
    }
    repo
}

#[actix_web::test]
async fn test_health() {
    let app = test::init_service(App::new().configure(configure)).await;
    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_list_signups_returns_page_metadata() {
    let test_db = common::TestDb::new("test_list_signups_returns_page_metadata.db");
    let repo = seeded_repo(&test_db, 23);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(repo))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/signups?page=2&per_page=10&seq=5")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total"], 23);
    assert_eq!(body["page"], 2);
    assert_eq!(body["total_pages"], 3);
    assert_eq!(body["items"].as_array().map(Vec::len), Some(10));
    assert_eq!(body["pages"], serde_json::json!([1, 2, 3]));
    assert_eq!(body["seq"], 5);
}

#[actix_web::test]
async fn test_malformed_filters_fall_back_to_defaults() {
    let test_db = common::TestDb::new("test_malformed_filters_fall_back_to_defaults.db");
    let repo = seeded_repo(&test_db, 23);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(repo))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/signups?page=abc&per_page=13&sort=password&from=yesterday")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["per_page"], 20);
    assert_eq!(body["page"], 1);
    assert_eq!(body["total"], 23);
    assert_eq!(body["items"][0]["first_name"], "คน23");
}

#[actix_web::test]
async fn test_repeated_province_filter() {
    let test_db = common::TestDb::new("test_repeated_province_filter.db");
    let repo = seeded_repo(&test_db, 6);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(repo))
            .configure(configure),
    )
    .await;

    let uri = format!(
        "/api/v1/signups?province={}&province={}",
        "%E0%B8%95%E0%B8%B2%E0%B8%81", "nowhere"
    );
    let req = test::TestRequest::get().uri(&uri).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["total"], 3);
}

#[actix_web::test]
async fn test_create_show_and_delete_signup() {
    let test_db = common::TestDb::new("test_create_show_and_delete_signup.db");
    let repo = DieselRepository::new(test_db.pool());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(repo))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/signups")
        .set_form([
            ("first_name", "สมชาย"),
            ("last_name", "ใจดี"),
            ("phone", "0812345678"),
            ("province", ""),
            ("category_id", ""),
            ("pledge_type", "OneMonth"),
            ("age", "41"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    let id = created["id"].as_i64().unwrap();

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/signups/{id}"))
        .to_request();
    let shown: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(shown["phone"], "+66812345678");
    assert!(shown["province"].is_null());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/signups/{id}"))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NO_CONTENT
    );

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/signups/{id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["retry"], false);
}

#[actix_web::test]
async fn test_invalid_form_is_unprocessable() {
    let test_db = common::TestDb::new("test_invalid_form_is_unprocessable.db");
    let repo = DieselRepository::new(test_db.pool());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(repo))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/signups")
        .set_form([
            ("first_name", "สมชาย"),
            ("last_name", "ใจดี"),
            ("phone", "0812345678"),
            ("pledge_type", "OneMonth"),
            ("age", "0"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri("/api/v1/signups")
        .set_form([("first_name", "สมชาย"), ("age", "many")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_export_contains_every_filtered_row() {
    let test_db = common::TestDb::new("test_export_contains_every_filtered_row.db");
    let repo = seeded_repo(&test_db, 23);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(repo))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/api/v1/signups/export?per_page=10&page=2")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    let text = String::from_utf8_lossy(&body);
    // Header plus every row, regardless of the page parameters.
    assert_eq!(text.lines().count(), 24);
}

#[actix_web::test]
async fn test_dashboard_summarizes_signups() {
    let test_db = common::TestDb::new("test_dashboard_summarizes_signups.db");
    let repo = seeded_repo(&test_db, 5);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(repo))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/dashboard").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert!(body["error"].is_null());
    assert_eq!(body["summary"]["total_signups"], 5);
    assert_eq!(body["summary"]["average_age"], 30.0);
    assert_eq!(body["summary"]["signups_by_province"][0]["label"], "น่าน");
    assert_eq!(body["summary"]["signups_by_province"][0]["count"], 3);
    assert_eq!(
        body["summary"]["monthly_signups"].as_array().map(Vec::len),
        Some(12)
    );
    assert_eq!(
        body["summary"]["image_completeness"].as_array().map(Vec::len),
        Some(3)
    );
}

#[actix_web::test]
async fn test_stale_list_response_is_discarded() {
    let test_db = common::TestDb::new("test_stale_list_response_is_discarded.db");
    let repo = seeded_repo(&test_db, 6);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(repo))
            .configure(configure),
    )
    .await;

    let sequencer = Sequencer::new();
    let slow = sequencer.issue();
    let fast = sequencer.issue();

    let mut responses = Vec::new();
    for (ticket, search) in [(fast, "คน06"), (slow, "คน0")] {
        let uri = format!(
            "/api/v1/signups?seq={}&search={}",
            ticket.get(),
            search
                .bytes()
                .map(|b| format!("%{b:02X}"))
                .collect::<String>()
        );
        let req = test::TestRequest::get().uri(&uri).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        responses.push(body);
    }

    let mut shown = None;
    for body in responses {
        let ticket = Ticket::new(body["seq"].as_u64().unwrap());
        if sequencer.accept(ticket) {
            shown = Some(body);
        }
    }

    let shown = shown.unwrap();
    assert_eq!(shown["seq"], fast.get());
    assert_eq!(shown["total"], 1);
}
