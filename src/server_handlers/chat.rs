use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use crate::chat::assistant_message;
use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    #[serde(default)]
    message: Option<String>,
}

pub async fn chat_handler(body: web::Json<ChatBody>) -> Result<HttpResponse, ApiError> {
    let text = body
        .into_inner()
        .message
        .filter(|m| !m.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Message is required"))?;
    Ok(HttpResponse::Ok().json(json!({ "message": assistant_message(&text) })))
}
