// Biblioteca raíz del crate `prepshift`.
// Reexporta los módulos del portal y `run_server` para `main` y los tests.
pub mod algorithm;
pub mod api_json;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod recommender;
pub mod resources;
pub mod server;
pub mod server_handlers;
pub mod store;
pub mod tour;
pub mod users;

/// Ejecuta el servidor HTTP (reexport para facilitar uso desde `main`)
pub use server::run_server;
