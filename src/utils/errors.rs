//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas. Las violaciones de reglas
//! de dominio se detectan antes de escribir y llegan al caller tipadas;
//! los fallos de almacenamiento se loguean con contexto y salen como 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Mechanic busy: {0}")]
    MechanicBusy(String),

    #[error("Invalid reservation state: {0}")]
    InvalidReservationState(String),

    #[error("Reception required: {0}")]
    ReceptionRequired(String),

    #[error("Already received: {0}")]
    AlreadyReceived(String),

    #[error("Assignment already closed: {0}")]
    AssignmentAlreadyClosed(String),

    #[error("Assignment locked: {0}")]
    AssignmentLocked(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, code, message, details) = match self {
            AppError::Database(e) => {
                tracing::error!("Error de base de datos: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database Error",
                    "DB_ERROR",
                    "An error occurred while accessing the database".to_string(),
                    Some(json!({ "sql_error": e.to_string() })),
                )
            }

            AppError::Validation(e) => {
                tracing::warn!("Error de validación: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    "Validation Error",
                    "VALIDATION_ERROR",
                    "The provided data is invalid".to_string(),
                    Some(json!(e)),
                )
            }

            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                "Not Found",
                "NOT_FOUND",
                msg,
                None,
            ),

            AppError::Conflict(msg) => (
                StatusCode::CONFLICT,
                "Conflict",
                "CONFLICT",
                msg,
                None,
            ),

            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                "Bad Request",
                "BAD_REQUEST",
                msg,
                None,
            ),

            AppError::MechanicBusy(msg) => (
                StatusCode::CONFLICT,
                "Mechanic Busy",
                "MECHANIC_BUSY",
                msg,
                None,
            ),

            AppError::InvalidReservationState(msg) => (
                StatusCode::CONFLICT,
                "Invalid Reservation State",
                "INVALID_RESERVATION_STATE",
                msg,
                None,
            ),

            AppError::ReceptionRequired(msg) => (
                StatusCode::CONFLICT,
                "Reception Required",
                "RECEPTION_REQUIRED",
                msg,
                None,
            ),

            AppError::AlreadyReceived(msg) => (
                StatusCode::CONFLICT,
                "Already Received",
                "ALREADY_RECEIVED",
                msg,
                None,
            ),

            AppError::AssignmentAlreadyClosed(msg) => (
                StatusCode::CONFLICT,
                "Assignment Already Closed",
                "ASSIGNMENT_ALREADY_CLOSED",
                msg,
                None,
            ),

            AppError::AssignmentLocked(msg) => (
                StatusCode::CONFLICT,
                "Assignment Locked",
                "ASSIGNMENT_LOCKED",
                msg,
                None,
            ),

            AppError::InvalidState(msg) => (
                StatusCode::BAD_REQUEST,
                "Invalid State",
                "INVALID_STATE",
                msg,
                None,
            ),

            AppError::Internal(msg) => {
                tracing::error!("Error interno: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    "INTERNAL_ERROR",
                    "An unexpected error occurred".to_string(),
                    Some(json!({ "internal_error": msg })),
                )
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            message,
            details,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_codigos_http_de_dominio() {
        let casos = [
            (
                AppError::MechanicBusy("m".into()).into_response().status(),
                StatusCode::CONFLICT,
            ),
            (
                AppError::InvalidState("x".into()).into_response().status(),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::NotFound("n".into()).into_response().status(),
                StatusCode::NOT_FOUND,
            ),
            (
                AppError::ReceptionRequired("r".into())
                    .into_response()
                    .status(),
                StatusCode::CONFLICT,
            ),
        ];
        for (obtenido, esperado) in casos {
            assert_eq!(obtenido, esperado);
        }
    }
}
