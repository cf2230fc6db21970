use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::feed::{feed_items, sort_feed, NewPost, PostPatch};
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeBody {
    #[serde(default)]
    user_id: Option<String>,
}

pub async fn list_posts_handler(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let store = state.store.clone();
    let mut posts = web::block(move || store.list_posts()).await??;
    sort_feed(&mut posts);
    let items = feed_items(&posts, Utc::now());
    Ok(HttpResponse::Ok().json(json!({ "posts": items })))
}

pub async fn create_post_handler(
    state: web::Data<AppState>,
    body: web::Json<serde_json::Value>,
) -> Result<HttpResponse, ApiError> {
    let new_post = serde_json::from_value::<NewPost>(body.into_inner())
        .map_err(|e| ApiError::bad_request(format!("Invalid post: {}", e)))?
        .validate()
        .map_err(ApiError::bad_request)?;

    let store = state.store.clone();
    let id = web::block(move || store.create_post(new_post)).await??;
    Ok(HttpResponse::Created().json(json!({ "success": true, "postId": id })))
}

pub async fn get_post_handler(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let store = state.store.clone();
    let post = web::block(move || store.get_post(&id))
        .await??
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))?;
    Ok(HttpResponse::Ok().json(json!({ "post": post })))
}

pub async fn update_post_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PostPatch>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let patch = body.into_inner();
    let store = state.store.clone();
    web::block(move || store.update_post(&id, &patch)).await??;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Post updated successfully" })))
}

pub async fn delete_post_handler(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let store = state.store.clone();
    web::block(move || store.delete_post(&id)).await??;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "message": "Post deleted successfully" })))
}

pub async fn like_post_handler(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<LikeBody>,
) -> Result<HttpResponse, ApiError> {
    let user_id = body
        .into_inner()
        .user_id
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("User ID is required"))?;
    let id = path.into_inner();
    let store = state.store.clone();
    let outcome = web::block(move || store.toggle_post_like(&id, &user_id)).await??;
    Ok(HttpResponse::Ok().json(outcome))
}
