//! Rutas HTTP del sistema
//!
//! Cada entidad expone su router; `crear_router` arma la aplicación completa
//! sobre un `AppState` ya construido, de modo que los tests pueden montarla
//! con el store in-memory sin levantar Postgres.

pub mod asignacion_routes;
pub mod mecanico_routes;
pub mod reserva_routes;

use axum::{response::Json, routing::get, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::middleware::cors::cors_middleware;
use crate::state::AppState;

pub fn crear_router(state: AppState) -> Router {
    Router::new()
        .route("/test", get(test_endpoint))
        .nest("/api/mecanico", mecanico_routes::create_mecanico_router())
        .nest("/api/reserva", reserva_routes::create_reserva_router())
        .nest(
            "/api/asignacion",
            asignacion_routes::create_asignacion_router(),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_middleware())
        .with_state(state)
}

/// Endpoint de prueba simple
async fn test_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "¡API del taller funcionando correctamente!",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
