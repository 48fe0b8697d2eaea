//! Controller de asignaciones: el núcleo del subsistema.
//!
//! Concentra el binder reserva->asignación, la máquina de estados del ciclo
//! de vida y el registro de recepción. Todas las reglas de dominio se
//! verifican aquí antes de escribir; el repositorio re-verifica las
//! condiciones con guardas (transacción / UPDATE condicional) para cerrar
//! las carreras entre lectura y escritura.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::dto::asignacion_dto::{
    ActualizarAsignacionRequest, AsignacionResponse, CrearAsignacionRequest,
};
use crate::dto::mecanico_dto::ApiResponse;
use crate::models::asignacion::{CambiosAsignacion, EstadoAsignacion};
use crate::repositories::TallerRepository;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct AsignacionController {
    store: Arc<dyn TallerRepository>,
}

impl AsignacionController {
    pub fn new(store: Arc<dyn TallerRepository>) -> Self {
        Self { store }
    }

    /// Binder: convierte una reserva PENDIENTE en una asignación pendiente
    /// del mecánico elegido. La disponibilidad se re-evalúa dentro de la
    /// transacción que inserta; crear la asignación y confirmar la reserva
    /// es todo-o-nada.
    pub async fn crear(
        &self,
        request: CrearAsignacionRequest,
    ) -> AppResult<ApiResponse<AsignacionResponse>> {
        let asignacion = self
            .store
            .vincular(request.reserva_id, request.mecanico_id)
            .await?;

        info!(
            "🔗 Asignación {} creada: reserva {} -> mecánico {}",
            asignacion.id, asignacion.reserva_id, asignacion.mecanico_id
        );

        Ok(ApiResponse::success_with_message(
            asignacion.into(),
            "Asignación creada exitosamente".to_string(),
        ))
    }

    pub async fn obtener(&self, id: Uuid) -> AppResult<AsignacionResponse> {
        let asignacion = self
            .store
            .buscar_asignacion(id)
            .await?
            .ok_or_else(|| not_found_error("Asignación", &id.to_string()))?;

        Ok(asignacion.into())
    }

    pub async fn listar(&self, filtro_estado: Option<String>) -> AppResult<Vec<AsignacionResponse>> {
        let estado = match filtro_estado {
            Some(token) => Some(EstadoAsignacion::parse(&token).ok_or_else(|| {
                AppError::InvalidState(format!("Estado desconocido: '{}'", token))
            })?),
            None => None,
        };

        let asignaciones = self.store.listar_asignaciones(estado).await?;

        Ok(asignaciones.into_iter().map(Into::into).collect())
    }

    /// Máquina de estados del ciclo de vida:
    ///
    /// ```text
    /// pendiente --(recepción)--> pendiente (fecha_recepcion sellada)
    /// pendiente --> en_proceso            [exige recepción previa]
    /// en_proceso --> completada           [terminal, sella fecha_completado]
    /// pendiente|en_proceso --> cancelada  [terminal]
    /// ```
    ///
    /// Al cerrar una asignación la reserva dueña queda CONFIRMADA como
    /// registro histórico, y la disponibilidad del mecánico cambia sola al
    /// derivarse del estado.
    pub async fn actualizar_estado(&self, id: Uuid, token: &str) -> AppResult<AsignacionResponse> {
        let objetivo = EstadoAsignacion::parse(token)
            .ok_or_else(|| AppError::InvalidState(format!("Estado desconocido: '{}'", token)))?;

        let actual = self
            .store
            .buscar_asignacion(id)
            .await?
            .ok_or_else(|| not_found_error("Asignación", &id.to_string()))?;

        if actual.estado.es_terminal() {
            return Err(AppError::AssignmentAlreadyClosed(format!(
                "La asignación {} está {} y no admite más transiciones",
                id, actual.estado
            )));
        }

        let movida = match objetivo {
            EstadoAsignacion::Pendiente => {
                return Err(AppError::BadRequest(format!(
                    "Transición no permitida: {} -> pendiente",
                    actual.estado
                )));
            }

            EstadoAsignacion::EnProceso => {
                if actual.estado != EstadoAsignacion::Pendiente {
                    return Err(AppError::BadRequest(format!(
                        "Transición no permitida: {} -> en_proceso",
                        actual.estado
                    )));
                }
                if actual.fecha_recepcion.is_none() {
                    return Err(AppError::ReceptionRequired(format!(
                        "La asignación {} no registró la recepción del vehículo",
                        id
                    )));
                }
                self.store
                    .guardar_estado(
                        id,
                        EstadoAsignacion::Pendiente,
                        EstadoAsignacion::EnProceso,
                        None,
                    )
                    .await?
            }

            EstadoAsignacion::Completada => {
                if actual.estado != EstadoAsignacion::EnProceso {
                    return Err(AppError::BadRequest(format!(
                        "Transición no permitida: {} -> completada",
                        actual.estado
                    )));
                }
                self.store
                    .guardar_estado(
                        id,
                        EstadoAsignacion::EnProceso,
                        EstadoAsignacion::Completada,
                        Some(Utc::now()),
                    )
                    .await?
            }

            EstadoAsignacion::Cancelada => {
                self.store
                    .guardar_estado(id, actual.estado, EstadoAsignacion::Cancelada, None)
                    .await?
            }
        };

        info!(
            "⚙️ Asignación {} movida: {} -> {}",
            id, actual.estado, movida.estado
        );

        Ok(movida.into())
    }

    /// Registro de la recepción física del vehículo. Es un evento del mundo
    /// real: repetirlo falla con `AlreadyReceived` y el primer sello se
    /// conserva.
    pub async fn marcar_recepcion(&self, id: Uuid) -> AppResult<AsignacionResponse> {
        let actual = self
            .store
            .buscar_asignacion(id)
            .await?
            .ok_or_else(|| not_found_error("Asignación", &id.to_string()))?;

        if actual.estado.es_terminal() {
            return Err(AppError::AssignmentAlreadyClosed(format!(
                "La asignación {} está {} y no admite más transiciones",
                id, actual.estado
            )));
        }

        if actual.estado != EstadoAsignacion::Pendiente || actual.fecha_recepcion.is_some() {
            return Err(AppError::AlreadyReceived(format!(
                "La asignación {} ya registró la recepción",
                id
            )));
        }

        let sellada = self.store.registrar_recepcion(id, Utc::now()).await?;

        info!("📥 Recepción registrada para la asignación {}", id);

        Ok(sellada.into())
    }

    /// Actualización completa: campos estructurales mutables sólo mientras
    /// la asignación está pendiente. Cambiar de mecánico repite la
    /// comprobación de disponibilidad del binder.
    pub async fn actualizar(
        &self,
        id: Uuid,
        request: ActualizarAsignacionRequest,
    ) -> AppResult<ApiResponse<AsignacionResponse>> {
        request.validate()?;

        let actualizada = self
            .store
            .actualizar_asignacion(
                id,
                CambiosAsignacion {
                    mecanico_id: request.mecanico_id,
                    notas: request.notas,
                },
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            actualizada.into(),
            "Asignación actualizada exitosamente".to_string(),
        ))
    }

    /// Borrado: directo en estados terminales; una asignación abierta sólo
    /// cae con el override administrativo, que además devuelve la reserva a
    /// PENDIENTE para que vuelva a ser vinculable.
    pub async fn eliminar(&self, id: Uuid, forzar: bool) -> AppResult<()> {
        let actual = self
            .store
            .buscar_asignacion(id)
            .await?
            .ok_or_else(|| not_found_error("Asignación", &id.to_string()))?;

        if actual.estado.es_terminal() {
            self.store.eliminar_asignacion(id).await
        } else if forzar {
            warn!(
                "🗑️ Borrado administrativo de la asignación abierta {} (estado {})",
                id, actual.estado
            );
            self.store.eliminar_asignacion_abierta(id).await
        } else {
            Err(AppError::Conflict(format!(
                "La asignación {} está {}; el borrado de una asignación abierta exige forzar=true",
                id, actual.estado
            )))
        }
    }
}
