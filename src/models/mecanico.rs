//! Modelo de Mecanico
//!
//! El mecánico posee cero o más asignaciones (sólo back-reference: el ciclo
//! de vida de la asignación es del Lifecycle Manager, nunca del mecánico).
//! Su disponibilidad es siempre derivada, no existe como columna.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Mecanico principal - mapea exactamente a la tabla mecanicos
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Mecanico {
    pub id: Uuid,
    pub nombre: String,
    pub telefono: String,
    pub especialidad: String,
    pub fecha_contratacion: NaiveDate,
    pub creado_en: DateTime<Utc>,
}

/// Datos para dar de alta un mecánico
#[derive(Debug, Clone)]
pub struct NuevoMecanico {
    pub nombre: String,
    pub telefono: String,
    pub especialidad: String,
    pub fecha_contratacion: NaiveDate,
}

/// Cambios parciales sobre un mecánico existente
#[derive(Debug, Clone, Default)]
pub struct CambiosMecanico {
    pub nombre: Option<String>,
    pub telefono: Option<String>,
    pub especialidad: Option<String>,
}

/// Proyección de lectura: mecánico junto con el conteo de asignaciones
/// abiertas, del que la capa de consultas deriva `disponible`.
#[derive(Debug, Clone, FromRow)]
pub struct MecanicoConCarga {
    #[sqlx(flatten)]
    pub mecanico: Mecanico,
    pub abiertas: i64,
}
