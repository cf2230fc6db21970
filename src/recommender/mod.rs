//! Recomendación de cursos.
//!
//! El algoritmo vive fuera de este crate (un script externo). Aquí solo está
//! el contrato (`RecommendationProvider`) y dos estrategias:
//! - `process`: lanza el intérprete configurado y habla JSON por stdin/stdout
//! - `StaticRecommender`: respuesta fija en proceso, para tests y desarrollo

pub mod process;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{AdvisorRequest, RecommendationResponse};

pub use process::ProcessRecommender;

#[derive(Debug, Error)]
pub enum RecommenderError {
    #[error("failed to spawn recommender: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to write request to recommender: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("failed to collect recommender output: {0}")]
    Wait(#[source] std::io::Error),

    /// Non-zero exit. The message is the child's stderr when it wrote any.
    #[error("{}", exit_message(.code, .stderr))]
    Exited { code: i32, stderr: String },

    #[error("failed to parse output: {0}")]
    Parse(String),

    #[error("failed to serialize request: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Fixed failure returned by `StaticRecommender::failing`.
    #[error("{0}")]
    Other(String),
}

fn exit_message(code: &i32, stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        format!("exited with code {}", code)
    } else {
        trimmed.to_string()
    }
}

/// Maps an advisor request to a ranked course list.
#[async_trait]
pub trait RecommendationProvider: Send + Sync {
    async fn recommend(&self, request: &AdvisorRequest) -> Result<RecommendationResponse, RecommenderError>;
}

/// Estrategia en proceso: siempre devuelve lo mismo.
#[derive(Debug, Clone)]
pub struct StaticRecommender {
    outcome: Result<RecommendationResponse, String>,
}

impl StaticRecommender {
    pub fn new(response: RecommendationResponse) -> Self {
        StaticRecommender { outcome: Ok(response) }
    }

    pub fn empty() -> Self {
        Self::new(RecommendationResponse::default())
    }

    pub fn failing(message: impl Into<String>) -> Self {
        StaticRecommender { outcome: Err(message.into()) }
    }
}

#[async_trait]
impl RecommendationProvider for StaticRecommender {
    async fn recommend(&self, _request: &AdvisorRequest) -> Result<RecommendationResponse, RecommenderError> {
        self.outcome.clone().map_err(RecommenderError::Other)
    }
}
