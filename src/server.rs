use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, Responder};
use serde_json::json;
use std::io;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::AdvisorRequest;
use crate::recommender::{ProcessRecommender, RecommendationProvider};
use crate::server_handlers::*;
use crate::store::{PortalStore, SqliteStore};

/// Estado compartido por todos los workers.
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn PortalStore>,
    pub recommender: Arc<dyn RecommendationProvider>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn PortalStore>, recommender: Arc<dyn RecommendationProvider>) -> Self {
        AppState { config, store, recommender }
    }
}

/// Registra todas las rutas. Los tests de integración montan lo mismo con
/// `test::init_service(App::new().app_data(..).configure(configure))`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // los extractores también responden `{ error }`, no texto plano
    cfg.app_data(
        web::JsonConfig::default().error_handler(|err, _req| ApiError::bad_request(err.to_string()).into()),
    )
    .app_data(web::QueryConfig::default().error_handler(|err, _req| ApiError::bad_request(err.to_string()).into()))
    .route("/help", web::get().to(help_handler))
    .service(
        web::resource("/api/batch-advisor")
            .route(web::get().to(batch_advisor_catalog_handler))
            .route(web::post().to(batch_advisor_recommend_handler)),
    )
    .service(
        web::resource("/api/posts")
            .route(web::get().to(list_posts_handler))
            .route(web::post().to(create_post_handler)),
    )
    .service(
        web::resource("/api/posts/{id}")
            .route(web::get().to(get_post_handler))
            .route(web::patch().to(update_post_handler))
            .route(web::delete().to(delete_post_handler)),
    )
    .route("/api/posts/{id}/like", web::post().to(like_post_handler))
    .service(
        web::resource("/api/resources")
            .route(web::get().to(list_resources_handler))
            .route(web::post().to(create_resource_handler)),
    )
    .service(
        web::resource("/api/resources/{id}")
            .route(web::get().to(get_resource_handler))
            .route(web::patch().to(update_resource_handler))
            .route(web::delete().to(delete_resource_handler)),
    )
    .route("/api/resources/{id}/download", web::post().to(download_resource_handler))
    .route("/api/chat", web::post().to(chat_handler))
    .service(
        web::resource("/api/tour-locations")
            .route(web::get().to(tour_locations_handler))
            .route(web::post().to(create_tour_location_handler)),
    )
    .route("/api/users", web::post().to(register_user_handler))
    .service(
        web::resource("/api/users/{uid}")
            .route(web::get().to(get_user_handler))
            .route(web::patch().to(update_user_handler)),
    );
}

/// Levanta el servidor HTTP con la base SQLite y el recomendador externo.
pub async fn run_server(config: AppConfig) -> io::Result<()> {
    let store = SqliteStore::open(&config.db_path).map_err(|e| {
        error!(path = %config.db_path.display(), "failed to open portal database: {}", e);
        io::Error::new(io::ErrorKind::Other, e.to_string())
    })?;
    let recommender = ProcessRecommender::from_config(&config);
    let bind = config.bind_addr.clone();

    let state = web::Data::new(AppState::new(config, Arc::new(store), Arc::new(recommender)));
    let workers = num_cpus::get().max(1);
    info!(%bind, workers, "starting HTTP server");

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .wrap(middleware::Logger::default())
            .configure(configure)
    })
    .workers(workers)
    .bind(bind)?
    .run()
    .await
}

async fn help_handler() -> impl Responder {
    let example = AdvisorRequest {
        current_semester: 4,
        passed_courses: vec!["CS101".to_string(), "MT101".to_string()],
        failed_courses: vec!["CS201".to_string()],
        low_grade_courses: vec!["MT101".to_string()],
        gpa: 2.8,
        warning_count: 0,
        credit_earned: 54,
        max_courses: 5,
    };

    HttpResponse::Ok().json(json!({
        "description": "Backend del portal de preparación. POST /api/batch-advisor acepta un JSON laxo: los números pueden venir como texto y las listas como texto separado por comas.",
        "post_example": example,
        "catalog": "GET /api/batch-advisor devuelve { semesters: { \"<semestre>\": [{ courseId, courseName }] } }",
    }))
}
