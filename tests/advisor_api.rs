use actix_web::{test, web, App};
use pretty_assertions::assert_eq;
use prepshift::config::AppConfig;
use prepshift::models::{Recommendation, RecommendationResponse};
use prepshift::recommender::{RecommendationProvider, StaticRecommender};
use prepshift::server::{configure, AppState};
use prepshift::store::SqliteStore;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;

const CATALOG: &str = "course_id,course_name,semester_offered\n\
    CS101,Programming Fundamentals,1\n\
    MT101,Calculus I,1\n\
    CS201,Data Structures,2-A\n\
    CS301,Algorithms,3\n";

fn state_with(work_dir: &Path, recommender: Arc<dyn RecommendationProvider>) -> web::Data<AppState> {
    let config = AppConfig { work_dir: work_dir.to_path_buf(), ..AppConfig::default() };
    let store = SqliteStore::open_in_memory().unwrap();
    web::Data::new(AppState::new(config, Arc::new(store), recommender))
}

#[actix_web::test]
async fn get_returns_catalog_grouped_by_semester() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("data.csv"), CATALOG).unwrap();
    let app = test::init_service(
        App::new().app_data(state_with(dir.path(), Arc::new(StaticRecommender::empty()))).configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/batch-advisor").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        body,
        json!({"semesters": {
            "1": [
                {"courseId": "CS101", "courseName": "Programming Fundamentals"},
                {"courseId": "MT101", "courseName": "Calculus I"}
            ],
            "2": [{"courseId": "CS201", "courseName": "Data Structures"}],
            "3": [{"courseId": "CS301", "courseName": "Algorithms"}]
        }})
    );
}

#[actix_web::test]
async fn get_reports_missing_catalog_as_500() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(
        App::new().app_data(state_with(dir.path(), Arc::new(StaticRecommender::empty()))).configure(configure),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/batch-advisor").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 500);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to load courses");
    assert!(body["details"].as_str().is_some_and(|d| !d.is_empty()));
}

#[actix_web::test]
async fn post_passes_recommendations_through() {
    let dir = tempfile::tempdir().unwrap();
    let mut core = Recommendation::new("CS301", "Algorithms");
    core.score = Some(3.0);
    core.is_core = Some(true);
    let fixed = RecommendationResponse { recommendations: vec![core, Recommendation::new("CS202", "Databases")] };
    let app = test::init_service(
        App::new().app_data(state_with(dir.path(), Arc::new(StaticRecommender::new(fixed)))).configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/batch-advisor")
        .set_json(json!({"currentSemester": "4", "passedCourses": "CS101, CS201", "gpa": "3.1"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let ids: Vec<&str> = body["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["courseId"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["CS301", "CS202"]);
    assert_eq!(body["recommendations"][0]["isCore"], true);
}

#[actix_web::test]
async fn empty_recommendation_list_is_a_success() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(
        App::new().app_data(state_with(dir.path(), Arc::new(StaticRecommender::empty()))).configure(configure),
    )
    .await;

    let req = test::TestRequest::post().uri("/api/batch-advisor").set_json(json!({})).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"recommendations": []}));
}

#[actix_web::test]
async fn truncated_body_is_a_500() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(
        App::new().app_data(state_with(dir.path(), Arc::new(StaticRecommender::empty()))).configure(configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/batch-advisor")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"gpa": 3.5,"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 500);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to generate recommendations");
    assert!(body["details"].as_str().is_some_and(|d| !d.is_empty()));
}

#[actix_web::test]
async fn provider_failure_is_a_500_with_details() {
    let dir = tempfile::tempdir().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(state_with(dir.path(), Arc::new(StaticRecommender::failing("bad input"))))
            .configure(configure),
    )
    .await;

    let req = test::TestRequest::post().uri("/api/batch-advisor").set_json(json!({})).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 500);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"error": "Failed to generate recommendations", "details": "bad input"}));
}
