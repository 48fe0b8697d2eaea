//! Modelo de Asignacion
//!
//! Una asignación vincula un mecánico con una reserva confirmada y lleva
//! su propio ciclo de vida: pendiente -> en_proceso -> (completada | cancelada).
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado de la asignación - mapea al ENUM estado_asignacion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "estado_asignacion", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EstadoAsignacion {
    Pendiente,
    EnProceso,
    Completada,
    Cancelada,
}

impl EstadoAsignacion {
    /// Parsea el token de estado recibido por la API.
    /// Un token desconocido se rechaza en el controller con `InvalidState`.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "pendiente" => Some(Self::Pendiente),
            "en_proceso" => Some(Self::EnProceso),
            "completada" => Some(Self::Completada),
            "cancelada" => Some(Self::Cancelada),
            _ => None,
        }
    }

    /// `completada` y `cancelada` no admiten más transiciones.
    pub fn es_terminal(&self) -> bool {
        matches!(self, Self::Completada | Self::Cancelada)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pendiente => "pendiente",
            Self::EnProceso => "en_proceso",
            Self::Completada => "completada",
            Self::Cancelada => "cancelada",
        }
    }
}

impl std::fmt::Display for EstadoAsignacion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Asignacion principal - mapea exactamente a la tabla asignaciones
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Asignacion {
    pub id: Uuid,
    pub mecanico_id: Uuid,
    pub reserva_id: Uuid,
    pub estado: EstadoAsignacion,
    pub notas: Option<String>,
    pub fecha_recepcion: Option<DateTime<Utc>>,
    pub fecha_completado: Option<DateTime<Utc>>,
    pub creado_en: DateTime<Utc>,
}

/// Cambios estructurales admitidos sólo mientras la asignación está pendiente.
/// Un cambio de mecánico re-ejecuta la comprobación de disponibilidad dentro
/// de la misma transacción que mueve la fila.
#[derive(Debug, Clone, Default)]
pub struct CambiosAsignacion {
    pub mecanico_id: Option<Uuid>,
    pub notas: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tokens_validos() {
        assert_eq!(
            EstadoAsignacion::parse("pendiente"),
            Some(EstadoAsignacion::Pendiente)
        );
        assert_eq!(
            EstadoAsignacion::parse("en_proceso"),
            Some(EstadoAsignacion::EnProceso)
        );
        assert_eq!(
            EstadoAsignacion::parse("completada"),
            Some(EstadoAsignacion::Completada)
        );
        assert_eq!(
            EstadoAsignacion::parse("cancelada"),
            Some(EstadoAsignacion::Cancelada)
        );
    }

    #[test]
    fn test_parse_token_desconocido() {
        assert_eq!(EstadoAsignacion::parse("terminada"), None);
        assert_eq!(EstadoAsignacion::parse("EN_PROCESO"), None);
        assert_eq!(EstadoAsignacion::parse(""), None);
    }

    #[test]
    fn test_estados_terminales() {
        assert!(!EstadoAsignacion::Pendiente.es_terminal());
        assert!(!EstadoAsignacion::EnProceso.es_terminal());
        assert!(EstadoAsignacion::Completada.es_terminal());
        assert!(EstadoAsignacion::Cancelada.es_terminal());
    }

    #[test]
    fn test_display_coincide_con_token() {
        for token in ["pendiente", "en_proceso", "completada", "cancelada"] {
            let estado = EstadoAsignacion::parse(token).unwrap();
            assert_eq!(estado.to_string(), token);
        }
    }
}
