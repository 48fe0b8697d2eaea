use axum::{
    extract::{Path, Query, State},
    routing::{get, patch, post},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::reserva_controller::ReservaController;
use crate::dto::mecanico_dto::ApiResponse;
use crate::dto::reserva_dto::{CrearReservaRequest, FiltroReservas, ReservaResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_reserva_router() -> Router<AppState> {
    Router::new()
        .route("/", post(crear_reserva))
        .route("/", get(listar_reservas))
        .route("/:id", get(obtener_reserva))
        .route("/:id/cancelar", patch(cancelar_reserva))
}

async fn crear_reserva(
    State(state): State<AppState>,
    Json(request): Json<CrearReservaRequest>,
) -> Result<Json<ApiResponse<ReservaResponse>>, AppError> {
    let controller = ReservaController::new(state.store.clone());
    let response = controller.crear(request).await?;
    Ok(Json(response))
}

async fn obtener_reserva(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReservaResponse>, AppError> {
    let controller = ReservaController::new(state.store.clone());
    let response = controller.obtener(id).await?;
    Ok(Json(response))
}

async fn listar_reservas(
    State(state): State<AppState>,
    Query(filtro): Query<FiltroReservas>,
) -> Result<Json<Vec<ReservaResponse>>, AppError> {
    let controller = ReservaController::new(state.store.clone());
    let response = controller.listar(filtro.estado).await?;
    Ok(Json(response))
}

async fn cancelar_reserva(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ReservaResponse>>, AppError> {
    let controller = ReservaController::new(state.store.clone());
    let response = controller.cancelar(id).await?;
    Ok(Json(response))
}
