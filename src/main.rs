// --- Portal de preparación - Archivo principal ---

use prepshift::config::AppConfig;
use prepshift::run_server;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // `.env` primero para que RUST_LOG también pueda venir de ahí
    let _ = dotenv::dotenv();
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("=== Portal de preparación (API) ===");
    let config = AppConfig::from_env();
    info!("Iniciando servidor en http://{}", config.bind_addr);
    run_server(config).await
}
