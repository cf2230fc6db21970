use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::error::ApiError;
use crate::server::AppState;
use crate::tour::{order_locations, NewTourLocation};

pub async fn tour_locations_handler(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let store = state.store.clone();
    let mut locations = web::block(move || store.list_tour_locations()).await??;
    order_locations(&mut locations);
    Ok(HttpResponse::Ok().json(json!({ "locations": locations })))
}

pub async fn create_tour_location_handler(
    state: web::Data<AppState>,
    body: web::Json<NewTourLocation>,
) -> Result<HttpResponse, ApiError> {
    let location = body.into_inner().validate().map_err(ApiError::bad_request)?;
    let store = state.store.clone();
    let id = web::block(move || store.create_tour_location(location)).await??;
    Ok(HttpResponse::Created().json(json!({ "success": true, "locationId": id })))
}
