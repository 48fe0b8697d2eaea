//! Implementación in-memory del repositorio del taller.
//!
//! Mismo contrato que la persistencia Postgres, respaldado por un único
//! mutex: cada operación corre entera bajo el guard, así que las escrituras
//! multi-entidad son atómicas y dos binds concurrentes sobre el mismo
//! mecánico se resuelven igual que con la transacción de la base de datos.
//! Pensada para tests y para sustituir el almacén sin tocar el core.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::asignacion::{Asignacion, CambiosAsignacion, EstadoAsignacion};
use crate::models::mecanico::{CambiosMecanico, Mecanico, MecanicoConCarga, NuevoMecanico};
use crate::models::reserva::{EstadoReserva, NuevaReserva, Reserva};
use crate::repositories::taller_repository::TallerRepository;
use crate::services::disponibilidad;
use crate::utils::errors::{not_found_error, AppError, AppResult};

#[derive(Default)]
struct Interior {
    mecanicos: HashMap<Uuid, Mecanico>,
    reservas: HashMap<Uuid, Reserva>,
    asignaciones: HashMap<Uuid, Asignacion>,
}

impl Interior {
    fn asignaciones_de(&self, mecanico_id: Uuid) -> Vec<Asignacion> {
        self.asignaciones
            .values()
            .filter(|a| a.mecanico_id == mecanico_id)
            .cloned()
            .collect()
    }
}

#[derive(Default)]
pub struct InMemoryTallerRepository {
    interior: Mutex<Interior>,
}

impl InMemoryTallerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn interior(&self) -> MutexGuard<'_, Interior> {
        // Un test que hizo panic con el lock tomado no debe tumbar al resto
        self.interior.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl TallerRepository for InMemoryTallerRepository {
    async fn crear_mecanico(&self, datos: NuevoMecanico) -> AppResult<Mecanico> {
        let mecanico = Mecanico {
            id: Uuid::new_v4(),
            nombre: datos.nombre,
            telefono: datos.telefono,
            especialidad: datos.especialidad,
            fecha_contratacion: datos.fecha_contratacion,
            creado_en: Utc::now(),
        };

        self.interior()
            .mecanicos
            .insert(mecanico.id, mecanico.clone());

        Ok(mecanico)
    }

    async fn buscar_mecanico(&self, id: Uuid) -> AppResult<Option<Mecanico>> {
        Ok(self.interior().mecanicos.get(&id).cloned())
    }

    async fn listar_mecanicos_con_carga(&self) -> AppResult<Vec<MecanicoConCarga>> {
        let interior = self.interior();

        let mut listado: Vec<MecanicoConCarga> = interior
            .mecanicos
            .values()
            .map(|m| {
                let abiertas = interior
                    .asignaciones
                    .values()
                    .filter(|a| a.mecanico_id == m.id && disponibilidad::es_abierta(a.estado))
                    .count() as i64;
                MecanicoConCarga {
                    mecanico: m.clone(),
                    abiertas,
                }
            })
            .collect();

        listado.sort_by(|a, b| b.mecanico.creado_en.cmp(&a.mecanico.creado_en));

        Ok(listado)
    }

    async fn actualizar_mecanico(
        &self,
        id: Uuid,
        cambios: CambiosMecanico,
    ) -> AppResult<Mecanico> {
        let mut interior = self.interior();

        let mecanico = interior
            .mecanicos
            .get_mut(&id)
            .ok_or_else(|| not_found_error("Mecánico", &id.to_string()))?;

        if let Some(nombre) = cambios.nombre {
            mecanico.nombre = nombre;
        }
        if let Some(telefono) = cambios.telefono {
            mecanico.telefono = telefono;
        }
        if let Some(especialidad) = cambios.especialidad {
            mecanico.especialidad = especialidad;
        }

        Ok(mecanico.clone())
    }

    async fn eliminar_mecanico(&self, id: Uuid) -> AppResult<()> {
        let mut interior = self.interior();

        if interior.mecanicos.remove(&id).is_none() {
            return Err(not_found_error("Mecánico", &id.to_string()));
        }

        // Las asignaciones históricas se van con el mecánico (ON DELETE CASCADE)
        interior.asignaciones.retain(|_, a| a.mecanico_id != id);

        Ok(())
    }

    async fn contar_asignaciones_abiertas(&self, mecanico_id: Uuid) -> AppResult<i64> {
        let interior = self.interior();

        let abiertas = interior
            .asignaciones
            .values()
            .filter(|a| a.mecanico_id == mecanico_id && disponibilidad::es_abierta(a.estado))
            .count() as i64;

        Ok(abiertas)
    }

    async fn crear_reserva(&self, datos: NuevaReserva) -> AppResult<Reserva> {
        let reserva = Reserva {
            id: Uuid::new_v4(),
            cliente_id: datos.cliente_id,
            vehiculo_id: datos.vehiculo_id,
            servicio_id: datos.servicio_id,
            fecha: datos.fecha,
            hora_inicio: datos.hora_inicio,
            hora_fin: datos.hora_fin,
            estado: EstadoReserva::Pendiente,
            creado_en: Utc::now(),
        };

        self.interior().reservas.insert(reserva.id, reserva.clone());

        Ok(reserva)
    }

    async fn buscar_reserva(&self, id: Uuid) -> AppResult<Option<Reserva>> {
        Ok(self.interior().reservas.get(&id).cloned())
    }

    async fn listar_reservas(&self, estado: Option<EstadoReserva>) -> AppResult<Vec<Reserva>> {
        let interior = self.interior();

        let mut reservas: Vec<Reserva> = interior
            .reservas
            .values()
            .filter(|r| estado.map_or(true, |e| r.estado == e))
            .cloned()
            .collect();

        reservas.sort_by(|a, b| b.creado_en.cmp(&a.creado_en));

        Ok(reservas)
    }

    async fn cancelar_reserva(&self, id: Uuid) -> AppResult<Reserva> {
        let mut interior = self.interior();

        let reserva = interior
            .reservas
            .get_mut(&id)
            .ok_or_else(|| not_found_error("Reserva", &id.to_string()))?;

        if reserva.estado != EstadoReserva::Pendiente {
            return Err(AppError::InvalidReservationState(format!(
                "La reserva {} está {} y sólo se cancela desde PENDIENTE",
                id, reserva.estado
            )));
        }

        reserva.estado = EstadoReserva::Cancelada;

        Ok(reserva.clone())
    }

    async fn vincular(&self, reserva_id: Uuid, mecanico_id: Uuid) -> AppResult<Asignacion> {
        // Un solo guard para toda la operación: chequeo + insert + confirmación
        // son atómicos, igual que la transacción en Postgres
        let mut interior = self.interior();

        let mecanico = interior
            .mecanicos
            .get(&mecanico_id)
            .cloned()
            .ok_or_else(|| not_found_error("Mecánico", &mecanico_id.to_string()))?;

        let reserva = interior
            .reservas
            .get(&reserva_id)
            .cloned()
            .ok_or_else(|| not_found_error("Reserva", &reserva_id.to_string()))?;

        if reserva.estado != EstadoReserva::Pendiente {
            return Err(AppError::InvalidReservationState(format!(
                "La reserva {} está {} y sólo se vincula desde PENDIENTE",
                reserva_id, reserva.estado
            )));
        }

        if !disponibilidad::es_disponible(&interior.asignaciones_de(mecanico_id)) {
            return Err(AppError::MechanicBusy(format!(
                "El mecánico {} ya tiene una asignación abierta",
                mecanico.nombre
            )));
        }

        let asignacion = Asignacion {
            id: Uuid::new_v4(),
            mecanico_id,
            reserva_id,
            estado: EstadoAsignacion::Pendiente,
            notas: None,
            fecha_recepcion: None,
            fecha_completado: None,
            creado_en: Utc::now(),
        };

        interior
            .asignaciones
            .insert(asignacion.id, asignacion.clone());
        if let Some(reserva) = interior.reservas.get_mut(&reserva_id) {
            reserva.estado = EstadoReserva::Confirmada;
        }

        Ok(asignacion)
    }

    async fn buscar_asignacion(&self, id: Uuid) -> AppResult<Option<Asignacion>> {
        Ok(self.interior().asignaciones.get(&id).cloned())
    }

    async fn listar_asignaciones(
        &self,
        estado: Option<EstadoAsignacion>,
    ) -> AppResult<Vec<Asignacion>> {
        let interior = self.interior();

        let mut asignaciones: Vec<Asignacion> = interior
            .asignaciones
            .values()
            .filter(|a| estado.map_or(true, |e| a.estado == e))
            .cloned()
            .collect();

        asignaciones.sort_by(|a, b| b.creado_en.cmp(&a.creado_en));

        Ok(asignaciones)
    }

    async fn registrar_recepcion(&self, id: Uuid, fecha: DateTime<Utc>) -> AppResult<Asignacion> {
        let mut interior = self.interior();

        let asignacion = interior
            .asignaciones
            .get_mut(&id)
            .ok_or_else(|| not_found_error("Asignación", &id.to_string()))?;

        if asignacion.estado.es_terminal() {
            return Err(AppError::AssignmentAlreadyClosed(format!(
                "La asignación {} está {}",
                id, asignacion.estado
            )));
        }

        if asignacion.estado != EstadoAsignacion::Pendiente || asignacion.fecha_recepcion.is_some()
        {
            return Err(AppError::AlreadyReceived(format!(
                "La asignación {} ya registró la recepción",
                id
            )));
        }

        asignacion.fecha_recepcion = Some(fecha);

        Ok(asignacion.clone())
    }

    async fn guardar_estado(
        &self,
        id: Uuid,
        esperado: EstadoAsignacion,
        nuevo: EstadoAsignacion,
        fecha_completado: Option<DateTime<Utc>>,
    ) -> AppResult<Asignacion> {
        let mut interior = self.interior();

        let asignacion = interior
            .asignaciones
            .get_mut(&id)
            .ok_or_else(|| not_found_error("Asignación", &id.to_string()))?;

        if asignacion.estado != esperado {
            return Err(AppError::Conflict(format!(
                "La asignación {} cambió de estado durante la operación",
                id
            )));
        }

        asignacion.estado = nuevo;
        if fecha_completado.is_some() {
            asignacion.fecha_completado = fecha_completado;
        }

        Ok(asignacion.clone())
    }

    async fn actualizar_asignacion(
        &self,
        id: Uuid,
        cambios: CambiosAsignacion,
    ) -> AppResult<Asignacion> {
        let mut interior = self.interior();

        let actual = interior
            .asignaciones
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found_error("Asignación", &id.to_string()))?;

        if actual.estado != EstadoAsignacion::Pendiente {
            return Err(AppError::AssignmentLocked(format!(
                "La asignación {} está {} y sus campos son inmutables",
                id, actual.estado
            )));
        }

        let mecanico_destino = cambios.mecanico_id.unwrap_or(actual.mecanico_id);

        if mecanico_destino != actual.mecanico_id {
            let mecanico = interior
                .mecanicos
                .get(&mecanico_destino)
                .cloned()
                .ok_or_else(|| not_found_error("Mecánico", &mecanico_destino.to_string()))?;

            if !disponibilidad::es_disponible(&interior.asignaciones_de(mecanico_destino)) {
                return Err(AppError::MechanicBusy(format!(
                    "El mecánico {} ya tiene una asignación abierta",
                    mecanico.nombre
                )));
            }
        }

        let asignacion = interior
            .asignaciones
            .get_mut(&id)
            .ok_or_else(|| not_found_error("Asignación", &id.to_string()))?;

        asignacion.mecanico_id = mecanico_destino;
        if cambios.notas.is_some() {
            asignacion.notas = cambios.notas;
        }

        Ok(asignacion.clone())
    }

    async fn eliminar_asignacion(&self, id: Uuid) -> AppResult<()> {
        let mut interior = self.interior();

        let asignacion = interior
            .asignaciones
            .get(&id)
            .ok_or_else(|| not_found_error("Asignación", &id.to_string()))?;

        if !asignacion.estado.es_terminal() {
            return Err(AppError::Conflict(format!(
                "La asignación {} cambió de estado durante la operación",
                id
            )));
        }

        interior.asignaciones.remove(&id);

        Ok(())
    }

    async fn eliminar_asignacion_abierta(&self, id: Uuid) -> AppResult<()> {
        let mut interior = self.interior();

        let asignacion = interior
            .asignaciones
            .remove(&id)
            .ok_or_else(|| not_found_error("Asignación", &id.to_string()))?;

        if let Some(reserva) = interior.reservas.get_mut(&asignacion.reserva_id) {
            if reserva.estado == EstadoReserva::Confirmada {
                reserva.estado = EstadoReserva::Pendiente;
            }
        }

        Ok(())
    }
}
