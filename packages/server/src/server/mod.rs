// HTTP server setup (Axum + webhook receiver)
pub mod app;
pub mod routes;

pub use app::*;
