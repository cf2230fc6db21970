use async_trait::async_trait;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use super::{RecommendationProvider, RecommenderError};
use crate::config::AppConfig;
use crate::models::{AdvisorRequest, RecommendationResponse};

/// Lanza `interpreter script` en `work_dir` por cada petición.
///
/// Contrato con el script: un documento JSON (`AdvisorRequest`) por stdin;
/// en éxito, `{ "recommendations": [...] }` por stdout y código 0; en fallo,
/// código distinto de 0 y diagnóstico por stderr.
///
/// No hay pool ni límite de concurrencia ni timeout: un script colgado deja
/// colgada su petición.
#[derive(Debug, Clone)]
pub struct ProcessRecommender {
    pub interpreter: String,
    pub script: PathBuf,
    pub work_dir: PathBuf,
}

impl ProcessRecommender {
    pub fn new(interpreter: impl Into<String>, script: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> Self {
        ProcessRecommender {
            interpreter: interpreter.into(),
            script: script.into(),
            work_dir: work_dir.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.python_path.clone(), config.script_path(), config.work_dir.clone())
    }
}

#[async_trait]
impl RecommendationProvider for ProcessRecommender {
    async fn recommend(&self, request: &AdvisorRequest) -> Result<RecommendationResponse, RecommenderError> {
        let payload = serde_json::to_vec(request)?;
        let started = Instant::now();

        let mut child = Command::new(&self.interpreter)
            .arg(&self.script)
            .current_dir(&self.work_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                warn!(interpreter = %self.interpreter, script = %self.script.display(), error = %e, "spawn failed");
                RecommenderError::Spawn(e)
            })?;
        debug!(pid = ?child.id(), "recommender started");

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| RecommenderError::Stdin(io::Error::new(io::ErrorKind::BrokenPipe, "stdin not captured")))?;

        // stdin se escribe mientras stdout/stderr se acumulan; al soltar
        // `stdin` el hijo ve EOF.
        let feed = async move {
            stdin.write_all(&payload).await?;
            stdin.flush().await?;
            drop(stdin);
            Ok::<(), io::Error>(())
        };
        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output.map_err(RecommenderError::Wait)?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            warn!(code, elapsed_ms = started.elapsed().as_millis() as u64, "recommender exited with failure");
            return Err(RecommenderError::Exited { code, stderr });
        }
        // Un hijo que sale bien sin leer stdin produce BrokenPipe; solo importa
        // si además no dejó salida utilizable.
        if let Err(e) = fed {
            if e.kind() != io::ErrorKind::BrokenPipe {
                return Err(RecommenderError::Stdin(e));
            }
        }

        let parsed: RecommendationResponse =
            serde_json::from_slice(&output.stdout).map_err(|e| RecommenderError::Parse(e.to_string()))?;

        info!(
            count = parsed.recommendations.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "recommendations generated"
        );
        Ok(parsed)
    }
}
