//! Controller de reservas: la superficie de intake del booking.
//!
//! Las reservas entran siempre en PENDIENTE; la confirmación es exclusiva
//! del binder y la cancelación sólo procede mientras la reserva siga
//! PENDIENTE (una vez confirmada queda como compromiso con el mecánico).

use std::sync::Arc;

use uuid::Uuid;

use crate::dto::mecanico_dto::ApiResponse;
use crate::dto::reserva_dto::{CrearReservaRequest, ReservaResponse};
use crate::models::reserva::{EstadoReserva, NuevaReserva};
use crate::repositories::TallerRepository;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct ReservaController {
    store: Arc<dyn TallerRepository>,
}

impl ReservaController {
    pub fn new(store: Arc<dyn TallerRepository>) -> Self {
        Self { store }
    }

    pub async fn crear(
        &self,
        request: CrearReservaRequest,
    ) -> AppResult<ApiResponse<ReservaResponse>> {
        if request.hora_fin <= request.hora_inicio {
            return Err(AppError::BadRequest(
                "hora_fin debe ser posterior a hora_inicio".to_string(),
            ));
        }

        let reserva = self
            .store
            .crear_reserva(NuevaReserva {
                cliente_id: request.cliente_id,
                vehiculo_id: request.vehiculo_id,
                servicio_id: request.servicio_id,
                fecha: request.fecha,
                hora_inicio: request.hora_inicio,
                hora_fin: request.hora_fin,
            })
            .await?;

        Ok(ApiResponse::success_with_message(
            reserva.into(),
            "Reserva registrada exitosamente".to_string(),
        ))
    }

    pub async fn obtener(&self, id: Uuid) -> AppResult<ReservaResponse> {
        let reserva = self
            .store
            .buscar_reserva(id)
            .await?
            .ok_or_else(|| not_found_error("Reserva", &id.to_string()))?;

        Ok(reserva.into())
    }

    pub async fn listar(&self, filtro_estado: Option<String>) -> AppResult<Vec<ReservaResponse>> {
        let estado = match filtro_estado {
            Some(token) => Some(EstadoReserva::parse(&token).ok_or_else(|| {
                AppError::InvalidState(format!("Estado desconocido: '{}'", token))
            })?),
            None => None,
        };

        let reservas = self.store.listar_reservas(estado).await?;

        Ok(reservas.into_iter().map(Into::into).collect())
    }

    pub async fn cancelar(&self, id: Uuid) -> AppResult<ApiResponse<ReservaResponse>> {
        let reserva = self.store.cancelar_reserva(id).await?;

        Ok(ApiResponse::success_with_message(
            reserva.into(),
            "Reserva cancelada exitosamente".to_string(),
        ))
    }
}
