//! Controller de mecánicos: altas, cambios y la proyección de lectura.
//!
//! La proyección junta identidad y contacto con la disponibilidad derivada
//! por el evaluador en cada lectura. Nunca muta estado.

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::dto::mecanico_dto::{
    ActualizarMecanicoRequest, ApiResponse, CrearMecanicoRequest, MecanicoResponse,
};
use crate::models::mecanico::{CambiosMecanico, NuevoMecanico};
use crate::repositories::TallerRepository;
use crate::services::disponibilidad;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct MecanicoController {
    store: Arc<dyn TallerRepository>,
}

impl MecanicoController {
    pub fn new(store: Arc<dyn TallerRepository>) -> Self {
        Self { store }
    }

    pub async fn crear(
        &self,
        request: CrearMecanicoRequest,
    ) -> AppResult<ApiResponse<MecanicoResponse>> {
        request.validate()?;

        let mecanico = self
            .store
            .crear_mecanico(NuevoMecanico {
                nombre: request.nombre,
                telefono: request.telefono,
                especialidad: request.especialidad,
                fecha_contratacion: request.fecha_contratacion,
            })
            .await?;

        // Un mecánico recién dado de alta no posee asignaciones
        let response = MecanicoResponse::nueva(mecanico, disponibilidad::es_disponible(&[]));

        Ok(ApiResponse::success_with_message(
            response,
            "Mecánico registrado exitosamente".to_string(),
        ))
    }

    pub async fn obtener(&self, id: Uuid) -> AppResult<MecanicoResponse> {
        let mecanico = self
            .store
            .buscar_mecanico(id)
            .await?
            .ok_or_else(|| not_found_error("Mecánico", &id.to_string()))?;

        let abiertas = self.store.contar_asignaciones_abiertas(id).await?;

        Ok(MecanicoResponse::nueva(
            mecanico,
            disponibilidad::disponible_con_abiertas(abiertas),
        ))
    }

    /// Proyección del listado: disponibilidad recalculada en cada lectura,
    /// nunca cacheada como estado almacenado.
    pub async fn listar(&self) -> AppResult<Vec<MecanicoResponse>> {
        let mecanicos = self.store.listar_mecanicos_con_carga().await?;

        Ok(mecanicos
            .into_iter()
            .map(|con_carga| {
                MecanicoResponse::nueva(
                    con_carga.mecanico,
                    disponibilidad::disponible_con_abiertas(con_carga.abiertas),
                )
            })
            .collect())
    }

    pub async fn actualizar(
        &self,
        id: Uuid,
        request: ActualizarMecanicoRequest,
    ) -> AppResult<ApiResponse<MecanicoResponse>> {
        request.validate()?;

        let mecanico = self
            .store
            .actualizar_mecanico(
                id,
                CambiosMecanico {
                    nombre: request.nombre,
                    telefono: request.telefono,
                    especialidad: request.especialidad,
                },
            )
            .await?;

        let abiertas = self.store.contar_asignaciones_abiertas(id).await?;
        let response = MecanicoResponse::nueva(
            mecanico,
            disponibilidad::disponible_con_abiertas(abiertas),
        );

        Ok(ApiResponse::success_with_message(
            response,
            "Mecánico actualizado exitosamente".to_string(),
        ))
    }

    /// Un mecánico con una asignación abierta no puede darse de baja; sus
    /// asignaciones históricas caen en cascada con él.
    pub async fn eliminar(&self, id: Uuid) -> AppResult<()> {
        self.store
            .buscar_mecanico(id)
            .await?
            .ok_or_else(|| not_found_error("Mecánico", &id.to_string()))?;

        let abiertas = self.store.contar_asignaciones_abiertas(id).await?;
        if !disponibilidad::disponible_con_abiertas(abiertas) {
            return Err(AppError::Conflict(format!(
                "El mecánico {} tiene una asignación abierta y no puede eliminarse",
                id
            )));
        }

        self.store.eliminar_mecanico(id).await
    }
}
