use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;
use tracing::info;

use crate::error::ApiError;
use crate::server::AppState;
use crate::store::StoreError;
use crate::users::{UserPatch, UserRegistration};

/// POST /api/users: alta o refresco del perfil tras autenticarse fuera.
/// Un perfil existente conserva su rol.
pub async fn register_user_handler(
    state: web::Data<AppState>,
    body: web::Json<UserRegistration>,
) -> Result<HttpResponse, ApiError> {
    let registration = body.into_inner().validate().map_err(ApiError::bad_request)?;
    let store = state.store.clone();
    let profile = web::block(move || {
        let existing = store.get_user(&registration.uid)?;
        let profile = registration.into_profile(existing, Utc::now());
        store.upsert_user(&profile)?;
        Ok::<_, StoreError>(profile)
    })
    .await??;
    info!(uid = %profile.uid, role = profile.role.as_str(), "user profile saved");
    let landing = profile.role.landing_path();
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": profile, "landingPath": landing })))
}

/// Perfil más la ruta a la que se redirige según el rol.
pub async fn get_user_handler(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let uid = path.into_inner();
    let store = state.store.clone();
    let user = web::block(move || store.get_user(&uid))
        .await??
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    let landing = user.role.landing_path();
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": user, "landingPath": landing })))
}

pub async fn update_user_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UserPatch>,
) -> Result<HttpResponse, ApiError> {
    let patch = body.into_inner();
    let uid = path.into_inner();
    let store = state.store.clone();
    web::block(move || store.update_user(&uid, &patch)).await??;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "User profile updated successfully." })))
}
