use actix_web::{web, HttpResponse};
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::api_json::sanitize_request;
use crate::catalog::load_catalog;
use crate::error::ApiError;
use crate::server::AppState;

/// GET /api/batch-advisor: catálogo agrupado por semestre.
pub async fn batch_advisor_catalog_handler(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let path = state.config.catalog_path();
    let catalog = load_catalog(&path)
        .await
        .map_err(|e| ApiError::internal("Failed to load courses", e))?;
    debug!(semesters = catalog.semesters().count(), courses = catalog.len(), "catalog served");
    Ok(HttpResponse::Ok().json(json!({ "semesters": catalog })))
}

/// POST /api/batch-advisor: sanea el body y delega en el recomendador.
///
/// Cualquier JSON es aceptable (el saneador rellena lo que falte), pero un
/// body que no es JSON falla igual que el recomendador: 500.
pub async fn batch_advisor_recommend_handler(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let raw: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::internal("Failed to generate recommendations", e))?;
    let request = sanitize_request(&raw);

    let response = state
        .recommender
        .recommend(&request)
        .await
        .map_err(|e| ApiError::internal("Failed to generate recommendations", e))?;

    info!(
        semester = request.current_semester,
        passed = request.passed_courses.len(),
        recommendations = response.recommendations.len(),
        "batch advisor request served"
    );
    Ok(HttpResponse::Ok().json(response))
}
