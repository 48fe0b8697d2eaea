use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::asignacion::{Asignacion, EstadoAsignacion};

// Request del binder: reserva + mecánico elegido por el administrador
#[derive(Debug, Deserialize)]
pub struct CrearAsignacionRequest {
    pub reserva_id: Uuid,
    pub mecanico_id: Uuid,
}

// Request de actualización completa (campos mutables sólo en pendiente)
#[derive(Debug, Deserialize, Validate)]
pub struct ActualizarAsignacionRequest {
    pub mecanico_id: Option<Uuid>,

    #[validate(length(max = 500))]
    pub notas: Option<String>,
}

// Request de transición de estado; el token se parsea en el controller
// para que un token desconocido salga como INVALID_STATE y no como 422
#[derive(Debug, Deserialize)]
pub struct CambiarEstadoRequest {
    pub estado: String,
}

// Filtro opcional por estado para el listado
#[derive(Debug, Deserialize)]
pub struct FiltroAsignaciones {
    pub estado: Option<String>,
}

// Parámetros del DELETE: el borrado de una asignación abierta exige el
// override administrativo explícito
#[derive(Debug, Deserialize)]
pub struct EliminarAsignacionParams {
    pub forzar: Option<bool>,
}

// Response de asignación
#[derive(Debug, Serialize)]
pub struct AsignacionResponse {
    pub id: Uuid,
    pub mecanico_id: Uuid,
    pub reserva_id: Uuid,
    pub estado: EstadoAsignacion,
    pub notas: Option<String>,
    pub fecha_recepcion: Option<DateTime<Utc>>,
    pub fecha_completado: Option<DateTime<Utc>>,
    pub creado_en: DateTime<Utc>,
}

impl From<Asignacion> for AsignacionResponse {
    fn from(asignacion: Asignacion) -> Self {
        Self {
            id: asignacion.id,
            mecanico_id: asignacion.mecanico_id,
            reserva_id: asignacion.reserva_id,
            estado: asignacion.estado,
            notas: asignacion.notas,
            fecha_recepcion: asignacion.fecha_recepcion,
            fecha_completado: asignacion.fecha_completado,
            creado_en: asignacion.creado_en,
        }
    }
}
