use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::mecanico_controller::MecanicoController;
use crate::dto::mecanico_dto::{
    ActualizarMecanicoRequest, ApiResponse, CrearMecanicoRequest, MecanicoResponse,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_mecanico_router() -> Router<AppState> {
    Router::new()
        .route("/", post(crear_mecanico))
        .route("/", get(listar_mecanicos))
        .route("/:id", get(obtener_mecanico))
        .route("/:id", put(actualizar_mecanico))
        .route("/:id", delete(eliminar_mecanico))
}

async fn crear_mecanico(
    State(state): State<AppState>,
    Json(request): Json<CrearMecanicoRequest>,
) -> Result<Json<ApiResponse<MecanicoResponse>>, AppError> {
    let controller = MecanicoController::new(state.store.clone());
    let response = controller.crear(request).await?;
    Ok(Json(response))
}

async fn obtener_mecanico(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MecanicoResponse>, AppError> {
    let controller = MecanicoController::new(state.store.clone());
    let response = controller.obtener(id).await?;
    Ok(Json(response))
}

async fn listar_mecanicos(
    State(state): State<AppState>,
) -> Result<Json<Vec<MecanicoResponse>>, AppError> {
    let controller = MecanicoController::new(state.store.clone());
    let response = controller.listar().await?;
    Ok(Json(response))
}

async fn actualizar_mecanico(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ActualizarMecanicoRequest>,
) -> Result<Json<ApiResponse<MecanicoResponse>>, AppError> {
    let controller = MecanicoController::new(state.store.clone());
    let response = controller.actualizar(id, request).await?;
    Ok(Json(response))
}

async fn eliminar_mecanico(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = MecanicoController::new(state.store.clone());
    controller.eliminar(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Mecánico eliminado exitosamente"
    })))
}
