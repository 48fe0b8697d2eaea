use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::reserva::{EstadoReserva, Reserva};

// Request para registrar una reserva (entra siempre en PENDIENTE)
#[derive(Debug, Deserialize)]
pub struct CrearReservaRequest {
    pub cliente_id: Uuid,
    pub vehiculo_id: Uuid,
    pub servicio_id: Uuid,
    pub fecha: NaiveDate,
    pub hora_inicio: NaiveTime,
    pub hora_fin: NaiveTime,
}

// Filtro opcional por estado para el listado
#[derive(Debug, Deserialize)]
pub struct FiltroReservas {
    pub estado: Option<String>,
}

// Response de reserva
#[derive(Debug, Serialize)]
pub struct ReservaResponse {
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

impl From<Reserva> for ReservaResponse {
    fn from(reserva: Reserva) -> Self {
        Self {
            id: reserva.id,
            cliente_id: reserva.cliente_id,
            vehiculo_id: reserva.vehiculo_id,
            servicio_id: reserva.servicio_id,
            fecha: reserva.fecha,
            hora_inicio: reserva.hora_inicio,
            hora_fin: reserva.hora_fin,
            estado: reserva.estado,
            creado_en: reserva.creado_en,
        }
    }
}
