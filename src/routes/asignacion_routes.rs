use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::asignacion_controller::AsignacionController;
use crate::dto::asignacion_dto::{
    ActualizarAsignacionRequest, AsignacionResponse, CambiarEstadoRequest,
    CrearAsignacionRequest, EliminarAsignacionParams, FiltroAsignaciones,
};
use crate::dto::mecanico_dto::ApiResponse;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_asignacion_router() -> Router<AppState> {
    Router::new()
        .route("/", post(crear_asignacion))
        .route("/", get(listar_asignaciones))
        .route("/:id", get(obtener_asignacion))
        .route("/:id", put(actualizar_asignacion))
        .route("/:id", delete(eliminar_asignacion))
        .route("/:id/estado", patch(cambiar_estado))
        .route("/:id/recepcion", patch(marcar_recepcion))
}

async fn crear_asignacion(
    State(state): State<AppState>,
    Json(request): Json<CrearAsignacionRequest>,
) -> Result<Json<ApiResponse<AsignacionResponse>>, AppError> {
    let controller = AsignacionController::new(state.store.clone());
    let response = controller.crear(request).await?;
    Ok(Json(response))
}

async fn obtener_asignacion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AsignacionResponse>, AppError> {
    let controller = AsignacionController::new(state.store.clone());
    let response = controller.obtener(id).await?;
    Ok(Json(response))
}

async fn listar_asignaciones(
    State(state): State<AppState>,
    Query(filtro): Query<FiltroAsignaciones>,
) -> Result<Json<Vec<AsignacionResponse>>, AppError> {
    let controller = AsignacionController::new(state.store.clone());
    let response = controller.listar(filtro.estado).await?;
    Ok(Json(response))
}

async fn actualizar_asignacion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ActualizarAsignacionRequest>,
) -> Result<Json<ApiResponse<AsignacionResponse>>, AppError> {
    let controller = AsignacionController::new(state.store.clone());
    let response = controller.actualizar(id, request).await?;
    Ok(Json(response))
}

async fn cambiar_estado(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CambiarEstadoRequest>,
) -> Result<Json<AsignacionResponse>, AppError> {
    let controller = AsignacionController::new(state.store.clone());
    let response = controller.actualizar_estado(id, &request.estado).await?;
    Ok(Json(response))
}

async fn marcar_recepcion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AsignacionResponse>, AppError> {
    let controller = AsignacionController::new(state.store.clone());
    let response = controller.marcar_recepcion(id).await?;
    Ok(Json(response))
}

async fn eliminar_asignacion(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<EliminarAsignacionParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = AsignacionController::new(state.store.clone());
    controller
        .eliminar(id, params.forzar.unwrap_or(false))
        .await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Asignación eliminada exitosamente"
    })))
}
