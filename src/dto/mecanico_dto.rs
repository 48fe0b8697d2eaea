use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::mecanico::Mecanico;

// Request para dar de alta un mecánico
#[derive(Debug, Deserialize, Validate)]
pub struct CrearMecanicoRequest {
    #[validate(length(min = 2, max = 100))]
    pub nombre: String,

    #[validate(length(min = 6, max = 20))]
    pub telefono: String,

    #[validate(length(min = 2, max = 50))]
    pub especialidad: String,

    pub fecha_contratacion: NaiveDate,
}

// Request para actualizar un mecánico existente
#[derive(Debug, Deserialize, Validate)]
pub struct ActualizarMecanicoRequest {
    #[validate(length(min = 2, max = 100))]
    pub nombre: Option<String>,

    #[validate(length(min = 6, max = 20))]
    pub telefono: Option<String>,

    #[validate(length(min = 2, max = 50))]
    pub especialidad: Option<String>,
}

// Response de mecánico con la disponibilidad derivada
#[derive(Debug, Serialize)]
pub struct MecanicoResponse {
    pub id: Uuid,
    pub nombre: String,
    pub telefono: String,
    pub especialidad: String,
    pub fecha_contratacion: NaiveDate,
    pub disponible: bool,
    pub creado_en: DateTime<Utc>,
}

impl MecanicoResponse {
    /// La disponibilidad llega ya calculada por el evaluador; este DTO
    /// nunca la deriva por su cuenta.
    pub fn nueva(mecanico: Mecanico, disponible: bool) -> Self {
        Self {
            id: mecanico.id,
            nombre: mecanico.nombre,
            telefono: mecanico.telefono,
            especialidad: mecanico.especialidad,
            fecha_contratacion: mecanico.fecha_contratacion,
            disponible,
            creado_en: mecanico.creado_en,
        }
    }
}

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}
