use std::env;
use std::path::PathBuf;
use tracing::info;

/// Configuración del servidor, leída del entorno (y de `.env` si existe).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    /// Interpreter used to run the recommendation script (`PYTHON_PATH`).
    pub python_path: String,
    /// Directory holding both the script and the catalog; the child process
    /// runs with this as its working directory.
    pub work_dir: PathBuf,
    pub script: PathBuf,
    pub catalog: PathBuf,
    pub db_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            bind_addr: "127.0.0.1:8080".to_string(),
            python_path: "python".to_string(),
            work_dir: PathBuf::from("public"),
            script: PathBuf::from("process.py"),
            catalog: PathBuf::from("data.csv"),
            db_path: PathBuf::from("data/portal.db"),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let _ = dotenv::dotenv();
        let d = AppConfig::default();
        AppConfig {
            bind_addr: var_or("PREPSHIFT_BIND", d.bind_addr),
            python_path: var_or("PYTHON_PATH", d.python_path),
            work_dir: PathBuf::from(var_or("ADVISOR_WORK_DIR", d.work_dir.to_string_lossy().into_owned())),
            script: PathBuf::from(var_or("ADVISOR_SCRIPT", d.script.to_string_lossy().into_owned())),
            catalog: PathBuf::from(var_or("ADVISOR_CATALOG", d.catalog.to_string_lossy().into_owned())),
            db_path: PathBuf::from(var_or("PREPSHIFT_DB_PATH", d.db_path.to_string_lossy().into_owned())),
        }
    }

    /// Script path, resolved against `work_dir` when relative.
    pub fn script_path(&self) -> PathBuf {
        self.work_dir.join(&self.script)
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.work_dir.join(&self.catalog)
    }
}

fn var_or(key: &str, default: String) -> String {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}
