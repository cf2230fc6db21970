use actix_web::{test, web, App};
use chrono::Utc;
use pretty_assertions::assert_eq;
use prepshift::config::AppConfig;
use prepshift::recommender::StaticRecommender;
use prepshift::server::{configure, AppState};
use prepshift::store::{PortalStore, SqliteStore};
use prepshift::tour::NewTourLocation;
use prepshift::users::new_profile;
use serde_json::{json, Value};
use std::sync::Arc;

fn state(store: Arc<SqliteStore>) -> web::Data<AppState> {
    web::Data::new(AppState::new(AppConfig::default(), store, Arc::new(StaticRecommender::empty())))
}

macro_rules! app {
    ($store:expr) => {
        test::init_service(App::new().app_data(state($store)).configure(configure)).await
    };
}

fn post_body(content: &str, pinned: bool) -> Value {
    json!({
        "author": {"name": "Admissions Office", "role": "Admin", "uid": "admin-1"},
        "content": content,
        "isPinned": pinned,
        "type": "event"
    })
}

#[actix_web::test]
async fn feed_lists_pinned_first_and_toggles_likes() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let app = app!(store.clone());

    for (content, pinned) in [("Orientation day", true), ("Library hours extended", false)] {
        let req = test::TestRequest::post().uri("/api/posts").set_json(post_body(content, pinned)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 201);
    }

    let req = test::TestRequest::get().uri("/api/posts").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let posts = body["posts"].as_array().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0]["content"], "Orientation day");
    assert_eq!(posts[0]["type"], "event");
    assert!(posts[1]["timestamp"].as_str().unwrap().ends_with("ago"));

    let id = posts[1]["id"].as_str().unwrap().to_string();
    let like = |user: &'static str| {
        test::TestRequest::post()
            .uri(&format!("/api/posts/{}/like", id))
            .set_json(json!({"userId": user}))
            .to_request()
    };
    let first: Value = test::call_and_read_body_json(&app, like("u1")).await;
    assert_eq!(first, json!({"likes": 1, "isLiked": true}));
    let again: Value = test::call_and_read_body_json(&app, like("u1")).await;
    assert_eq!(again, json!({"likes": 0, "isLiked": false}));

    let req = test::TestRequest::post()
        .uri(&format!("/api/posts/{}/like", id))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "User ID is required");
}

#[actix_web::test]
async fn post_validation_and_not_found() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let app = app!(store);

    let req = test::TestRequest::post().uri("/api/posts").set_json(post_body("   ", false)).to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 400);

    let req = test::TestRequest::get().uri("/api/posts/missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Post not found");

    let req = test::TestRequest::delete().uri("/api/posts/missing").to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 404);
}

#[actix_web::test]
async fn post_patch_and_delete() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let app = app!(store.clone());

    let req = test::TestRequest::post().uri("/api/posts").set_json(post_body("Draft", false)).to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["postId"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri(&format!("/api/posts/{}", id))
        .set_json(json!({"content": "Final", "isPinned": true}))
        .to_request();
    assert!(test::call_service(&app, req).await.status().is_success());
    let post = store.get_post(&id).unwrap().unwrap();
    assert_eq!(post.content, "Final");
    assert!(post.is_pinned);

    let req = test::TestRequest::delete().uri(&format!("/api/posts/{}", id)).to_request();
    assert!(test::call_service(&app, req).await.status().is_success());
    assert!(store.get_post(&id).unwrap().is_none());
}

#[actix_web::test]
async fn resources_create_filter_and_download() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let app = app!(store);

    let bodies = [
        json!({"title": "Entry Test Past Papers 2023", "type": "Past Paper", "category": "Entry Test",
               "subject": "All Subjects", "date": "2023", "size": "2.4 MB"}),
        json!({"title": "Mathematics Formula Sheet", "type": "Study Guide", "category": "Mathematics",
               "subject": "Mathematics", "date": "2024", "size": "1.1 MB", "color": "bg-green-500"}),
    ];
    let mut ids = Vec::new();
    for b in bodies {
        let req = test::TestRequest::post().uri("/api/resources").set_json(b).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 201);
        let v: Value = test::read_body_json(resp).await;
        ids.push(v["resourceId"].as_str().unwrap().to_string());
    }

    let req = test::TestRequest::post()
        .uri("/api/resources")
        .set_json(json!({"title": "Incomplete"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let v: Value = test::read_body_json(resp).await;
    assert_eq!(v["error"], "Title, type, category, subject, date, and size are required");

    let req = test::TestRequest::get().uri("/api/resources?search=formula&category=All").to_request();
    let v: Value = test::call_and_read_body_json(&app, req).await;
    let list = v["resources"].as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["icon"], "FileText");
    assert_eq!(list[0]["color"], "bg-green-500");

    let req = test::TestRequest::get().uri("/api/resources?category=Entry%20Test").to_request();
    let v: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(v["resources"][0]["type"], "Past Paper");

    let req = test::TestRequest::post().uri(&format!("/api/resources/{}/download", ids[0])).to_request();
    let v: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(v, json!({"success": true, "message": "Downloads are not tracked"}));

    let req = test::TestRequest::delete().uri(&format!("/api/resources/{}", ids[0])).to_request();
    assert!(test::call_service(&app, req).await.status().is_success());
    let req = test::TestRequest::get().uri(&format!("/api/resources/{}", ids[0])).to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 404);
}

#[actix_web::test]
async fn chat_answers_by_keyword() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let app = app!(store);

    let req = test::TestRequest::post().uri("/api/chat").set_json(json!({"message": "What is the fee?"})).to_request();
    let v: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(v["message"]["role"], "assistant");
    assert!(v["message"]["content"].as_str().unwrap().contains("fee structure"));

    let req = test::TestRequest::post().uri("/api/chat").set_json(json!({"message": "  "})).to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 400);
}

#[actix_web::test]
async fn tour_locations_are_ordered() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    for (name, order) in [("Cafeteria", 3), ("Main Gate", 1), ("Library", 2)] {
        store
            .create_tour_location(NewTourLocation {
                name: name.into(),
                description: format!("{} description", name),
                image: String::new(),
                icon: None,
                order,
            })
            .unwrap();
    }
    let app = app!(store);

    let req = test::TestRequest::get().uri("/api/tour-locations").to_request();
    let v: Value = test::call_and_read_body_json(&app, req).await;
    let names: Vec<&str> = v["locations"].as_array().unwrap().iter().map(|l| l["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Main Gate", "Library", "Cafeteria"]);
}

#[actix_web::test]
async fn users_get_landing_path_and_patch() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    store.upsert_user(&new_profile("stu-1", "Hina", "hina@example.com", Utc::now())).unwrap();
    let app = app!(store.clone());

    let req = test::TestRequest::get().uri("/api/users/stu-1").to_request();
    let v: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(v["success"], true);
    assert_eq!(v["data"]["email"], "hina@example.com");
    assert_eq!(v["landingPath"], "/dashboard");

    let req = test::TestRequest::patch()
        .uri("/api/users/stu-1")
        .set_json(json!({"role": "admin", "bio": "Coordinator"}))
        .to_request();
    let v: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(v["success"], true);

    let req = test::TestRequest::get().uri("/api/users/stu-1").to_request();
    let v: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(v["landingPath"], "/admin");
    assert_eq!(v["data"]["bio"], "Coordinator");

    let req = test::TestRequest::get().uri("/api/users/nobody").to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 404);
}

#[actix_web::test]
async fn malformed_bodies_get_json_errors() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let app = app!(store);

    for uri in ["/api/chat", "/api/posts/x/like", "/api/users"] {
        let req = test::TestRequest::post()
            .uri(uri)
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400, "{}", uri);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()), "{}", uri);
    }

    let req = test::TestRequest::patch()
        .uri("/api/users/u1")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"role": "superuser"}"#)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn sign_in_creates_profile_and_keeps_role() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let app = app!(store.clone());

    let sign_in = || {
        test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({"uid": "g-42", "name": "Zara", "email": "zara@example.com", "emailVerified": true}))
            .to_request()
    };
    let v: Value = test::call_and_read_body_json(&app, sign_in()).await;
    assert_eq!(v["data"]["role"], "student");
    assert_eq!(v["landingPath"], "/dashboard");

    let req = test::TestRequest::patch().uri("/api/users/g-42").set_json(json!({"role": "admin"})).to_request();
    assert!(test::call_service(&app, req).await.status().is_success());

    // segundo sign-in: el rol asignado no se pisa
    let v: Value = test::call_and_read_body_json(&app, sign_in()).await;
    assert_eq!(v["data"]["role"], "admin");
    assert_eq!(v["landingPath"], "/admin");
    assert_eq!(store.get_user("g-42").unwrap().unwrap().role.as_str(), "admin");

    let req = test::TestRequest::post().uri("/api/users").set_json(json!({"email": "a@b.c"})).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let v: Value = test::read_body_json(resp).await;
    assert_eq!(v["error"], "User ID is required.");
}

#[actix_web::test]
async fn tour_locations_can_be_added_over_http() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let app = app!(store);

    let req = test::TestRequest::post()
        .uri("/api/tour-locations")
        .set_json(json!({"name": "Library", "description": "Digital resources and study areas",
                         "image": "/tour/library.jpeg", "icon": "BookOpen", "order": 2}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);
    let v: Value = test::read_body_json(resp).await;
    assert!(v["locationId"].is_string());

    let req = test::TestRequest::post()
        .uri("/api/tour-locations")
        .set_json(json!({"name": "", "description": "nothing"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 400);

    let req = test::TestRequest::get().uri("/api/tour-locations").to_request();
    let v: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(v["locations"].as_array().unwrap().len(), 1);
    assert_eq!(v["locations"][0]["icon"], "BookOpen");
}
