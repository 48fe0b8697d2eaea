//! Modelo de Reserva
//!
//! La reserva llega del subsistema de booking: referencia un vehículo y un
//! servicio del catálogo (ambos colaboradores externos, aquí sólo ids) y
//! una ventana horaria solicitada.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use uuid::Uuid;

/// Estado de la reserva - mapea al ENUM estado_reserva
///
/// Una reserva pasa a CONFIRMADA una sola vez y sólo desde PENDIENTE
/// (cuando el binder crea la asignación). La cancelación sólo se admite
/// desde PENDIENTE: una vez confirmada queda como registro histórico.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "estado_reserva", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum EstadoReserva {
    Pendiente,
    Confirmada,
    Cancelada,
}

impl EstadoReserva {
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "PENDIENTE" => Some(Self::Pendiente),
            "CONFIRMADA" => Some(Self::Confirmada),
            "CANCELADA" => Some(Self::Cancelada),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pendiente => "PENDIENTE",
            Self::Confirmada => "CONFIRMADA",
            Self::Cancelada => "CANCELADA",
        }
    }
}

impl std::fmt::Display for EstadoReserva {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reserva principal - mapea exactamente a la tabla reservas
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reserva {
    pub id: Uuid,
    pub cliente_id: Uuid,
    pub vehiculo_id: Uuid,
    pub servicio_id: Uuid,
    pub fecha: NaiveDate,
    pub hora_inicio: NaiveTime,
    pub hora_fin: NaiveTime,
    pub estado: EstadoReserva,
    pub creado_en: DateTime<Utc>,
}

/// Datos para registrar una reserva nueva (siempre entra en PENDIENTE)
#[derive(Debug, Clone)]
pub struct NuevaReserva {
    pub cliente_id: Uuid,
    pub vehiculo_id: Uuid,
    pub servicio_id: Uuid,
    pub fecha: NaiveDate,
    pub hora_inicio: NaiveTime,
    pub hora_fin: NaiveTime,
}
