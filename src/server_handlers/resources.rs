use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::ApiError;
use crate::resources::{filter_resources, validate_new_resource, ResourceFilter, ResourcePatch};
use crate::server::AppState;

/// GET /api/resources?search=&category=
pub async fn list_resources_handler(
    state: web::Data<AppState>,
    query: web::Query<ResourceFilter>,
) -> Result<HttpResponse, ApiError> {
    let store = state.store.clone();
    let all = web::block(move || store.list_resources()).await??;
    let resources = filter_resources(all, &query.into_inner());
    Ok(HttpResponse::Ok().json(json!({ "resources": resources })))
}

pub async fn create_resource_handler(
    state: web::Data<AppState>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, ApiError> {
    let new_resource = validate_new_resource(&body).map_err(ApiError::bad_request)?;
    let store = state.store.clone();
    let id = web::block(move || store.create_resource(new_resource)).await??;
    Ok(HttpResponse::Created().json(json!({ "success": true, "resourceId": id })))
}

pub async fn get_resource_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let store = state.store.clone();
    let resource = web::block(move || store.get_resource(&id))
        .await??
        .ok_or_else(|| ApiError::NotFound("Resource not found".to_string()))?;
    Ok(HttpResponse::Ok().json(json!({ "resource": resource })))
}

pub async fn update_resource_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ResourcePatch>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let patch = body.into_inner();
    let store = state.store.clone();
    web::block(move || store.update_resource(&id, &patch)).await??;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Resource updated successfully" })))
}

pub async fn delete_resource_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let store = state.store.clone();
    web::block(move || store.delete_resource(&id)).await??;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Resource deleted successfully" })))
}

/// Las descargas van directo a `fileUrl`; aquí solo se confirma.
pub async fn download_resource_handler(path: web::Path<String>) -> HttpResponse {
    tracing::debug!(resource_id = %path.as_str(), "download requested");
    HttpResponse::Ok().json(json!({ "success": true, "message": "Downloads are not tracked" }))
}
