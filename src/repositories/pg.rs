//! Implementación PostgreSQL del repositorio del taller.
//!
//! Las operaciones multi-fila corren en una transacción; la serialización de
//! binds concurrentes sobre un mismo mecánico se apoya en el lock de fila
//! (`FOR UPDATE`) y, como árbitro final, en el índice único parcial
//! `asignaciones_mecanico_abierto_idx` (una sola asignación abierta por
//! mecánico a nivel de base de datos).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::asignacion::{Asignacion, CambiosAsignacion, EstadoAsignacion};
use crate::models::mecanico::{CambiosMecanico, Mecanico, MecanicoConCarga, NuevoMecanico};
use crate::models::reserva::{EstadoReserva, NuevaReserva, Reserva};
use crate::repositories::taller_repository::TallerRepository;
use crate::services::disponibilidad;
use crate::utils::errors::{not_found_error, AppError, AppResult};

pub struct PgTallerRepository {
    pool: PgPool,
}

impl PgTallerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Una violación del índice único parcial significa que otro bind concurrente
/// insertó antes la asignación abierta del mecánico.
fn mapear_conflicto_mecanico(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.constraint() == Some("asignaciones_mecanico_abierto_idx") {
            return AppError::MechanicBusy(
                "El mecánico ya tiene una asignación abierta".to_string(),
            );
        }
    }
    AppError::Database(e)
}

#[async_trait]
impl TallerRepository for PgTallerRepository {
    async fn crear_mecanico(&self, datos: NuevoMecanico) -> AppResult<Mecanico> {
        let mecanico = sqlx::query_as::<_, Mecanico>(
            r#"
            INSERT INTO mecanicos (id, nombre, telefono, especialidad, fecha_contratacion, creado_en)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(datos.nombre)
        .bind(datos.telefono)
        .bind(datos.especialidad)
        .bind(datos.fecha_contratacion)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(mecanico)
    }

    async fn buscar_mecanico(&self, id: Uuid) -> AppResult<Option<Mecanico>> {
        let mecanico = sqlx::query_as::<_, Mecanico>("SELECT * FROM mecanicos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(mecanico)
    }

    async fn listar_mecanicos_con_carga(&self) -> AppResult<Vec<MecanicoConCarga>> {
        let mecanicos = sqlx::query_as::<_, MecanicoConCarga>(
            r#"
            SELECT m.*,
                   COUNT(a.id) FILTER (WHERE a.estado IN ('pendiente', 'en_proceso')) AS abiertas
            FROM mecanicos m
            LEFT JOIN asignaciones a ON a.mecanico_id = m.id
            GROUP BY m.id
            ORDER BY m.creado_en DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(mecanicos)
    }

    async fn actualizar_mecanico(
        &self,
        id: Uuid,
        cambios: CambiosMecanico,
    ) -> AppResult<Mecanico> {
        let actual = self
            .buscar_mecanico(id)
            .await?
            .ok_or_else(|| not_found_error("Mecánico", &id.to_string()))?;

        let mecanico = sqlx::query_as::<_, Mecanico>(
            r#"
            UPDATE mecanicos
            SET nombre = $2, telefono = $3, especialidad = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(cambios.nombre.unwrap_or(actual.nombre))
        .bind(cambios.telefono.unwrap_or(actual.telefono))
        .bind(cambios.especialidad.unwrap_or(actual.especialidad))
        .fetch_one(&self.pool)
        .await?;

        Ok(mecanico)
    }

    async fn eliminar_mecanico(&self, id: Uuid) -> AppResult<()> {
        let resultado = sqlx::query("DELETE FROM mecanicos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if resultado.rows_affected() == 0 {
            return Err(not_found_error("Mecánico", &id.to_string()));
        }

        Ok(())
    }

    async fn contar_asignaciones_abiertas(&self, mecanico_id: Uuid) -> AppResult<i64> {
        let (abiertas,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM asignaciones
            WHERE mecanico_id = $1 AND estado IN ('pendiente', 'en_proceso')
            "#,
        )
        .bind(mecanico_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(abiertas)
    }

    async fn crear_reserva(&self, datos: NuevaReserva) -> AppResult<Reserva> {
        let reserva = sqlx::query_as::<_, Reserva>(
            r#"
            INSERT INTO reservas (id, cliente_id, vehiculo_id, servicio_id, fecha, hora_inicio, hora_fin, estado, creado_en)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'PENDIENTE', $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(datos.cliente_id)
        .bind(datos.vehiculo_id)
        .bind(datos.servicio_id)
        .bind(datos.fecha)
        .bind(datos.hora_inicio)
        .bind(datos.hora_fin)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(reserva)
    }

    async fn buscar_reserva(&self, id: Uuid) -> AppResult<Option<Reserva>> {
        let reserva = sqlx::query_as::<_, Reserva>("SELECT * FROM reservas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(reserva)
    }

    async fn listar_reservas(&self, estado: Option<EstadoReserva>) -> AppResult<Vec<Reserva>> {
        let reservas = sqlx::query_as::<_, Reserva>(
            r#"
            SELECT * FROM reservas
            WHERE $1::estado_reserva IS NULL OR estado = $1
            ORDER BY creado_en DESC
            "#,
        )
        .bind(estado)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservas)
    }

    async fn cancelar_reserva(&self, id: Uuid) -> AppResult<Reserva> {
        let cancelada = sqlx::query_as::<_, Reserva>(
            r#"
            UPDATE reservas SET estado = 'CANCELADA'
            WHERE id = $1 AND estado = 'PENDIENTE'
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match cancelada {
            Some(reserva) => Ok(reserva),
            None => {
                let reserva = self
                    .buscar_reserva(id)
                    .await?
                    .ok_or_else(|| not_found_error("Reserva", &id.to_string()))?;
                Err(AppError::InvalidReservationState(format!(
                    "La reserva {} está {} y sólo se cancela desde PENDIENTE",
                    id, reserva.estado
                )))
            }
        }
    }

    async fn vincular(&self, reserva_id: Uuid, mecanico_id: Uuid) -> AppResult<Asignacion> {
        let mut tx = self.pool.begin().await?;

        // Lock de fila: serializa binds concurrentes sobre el mismo mecánico
        let mecanico =
            sqlx::query_as::<_, Mecanico>("SELECT * FROM mecanicos WHERE id = $1 FOR UPDATE")
                .bind(mecanico_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| not_found_error("Mecánico", &mecanico_id.to_string()))?;

        let reserva =
            sqlx::query_as::<_, Reserva>("SELECT * FROM reservas WHERE id = $1 FOR UPDATE")
                .bind(reserva_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| not_found_error("Reserva", &reserva_id.to_string()))?;

        if reserva.estado != EstadoReserva::Pendiente {
            return Err(AppError::InvalidReservationState(format!(
                "La reserva {} está {} y sólo se vincula desde PENDIENTE",
                reserva_id, reserva.estado
            )));
        }

        // Re-evaluación de disponibilidad dentro de la transacción, no de una
        // lectura previa
        let (abiertas,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM asignaciones
            WHERE mecanico_id = $1 AND estado IN ('pendiente', 'en_proceso')
            "#,
        )
        .bind(mecanico_id)
        .fetch_one(&mut *tx)
        .await?;

        if !disponibilidad::disponible_con_abiertas(abiertas) {
            return Err(AppError::MechanicBusy(format!(
                "El mecánico {} ya tiene una asignación abierta",
                mecanico.nombre
            )));
        }

        let asignacion = sqlx::query_as::<_, Asignacion>(
            r#"
            INSERT INTO asignaciones (id, mecanico_id, reserva_id, estado, creado_en)
            VALUES ($1, $2, $3, 'pendiente', $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(mecanico_id)
        .bind(reserva_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await
        .map_err(mapear_conflicto_mecanico)?;

        sqlx::query("UPDATE reservas SET estado = 'CONFIRMADA' WHERE id = $1")
            .bind(reserva_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(asignacion)
    }

    async fn buscar_asignacion(&self, id: Uuid) -> AppResult<Option<Asignacion>> {
        let asignacion =
            sqlx::query_as::<_, Asignacion>("SELECT * FROM asignaciones WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(asignacion)
    }

    async fn listar_asignaciones(
        &self,
        estado: Option<EstadoAsignacion>,
    ) -> AppResult<Vec<Asignacion>> {
        let asignaciones = sqlx::query_as::<_, Asignacion>(
            r#"
            SELECT * FROM asignaciones
            WHERE $1::estado_asignacion IS NULL OR estado = $1
            ORDER BY creado_en DESC
            "#,
        )
        .bind(estado)
        .fetch_all(&self.pool)
        .await?;

        Ok(asignaciones)
    }

    async fn registrar_recepcion(&self, id: Uuid, fecha: DateTime<Utc>) -> AppResult<Asignacion> {
        let sellada = sqlx::query_as::<_, Asignacion>(
            r#"
            UPDATE asignaciones SET fecha_recepcion = $2
            WHERE id = $1 AND estado = 'pendiente' AND fecha_recepcion IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(fecha)
        .fetch_optional(&self.pool)
        .await?;

        match sellada {
            Some(asignacion) => Ok(asignacion),
            // La fila cambió entre la validación y el UPDATE
            None => {
                let asignacion = self
                    .buscar_asignacion(id)
                    .await?
                    .ok_or_else(|| not_found_error("Asignación", &id.to_string()))?;
                if asignacion.estado.es_terminal() {
                    Err(AppError::AssignmentAlreadyClosed(format!(
                        "La asignación {} está {}",
                        id, asignacion.estado
                    )))
                } else {
                    Err(AppError::AlreadyReceived(format!(
                        "La asignación {} ya registró la recepción",
                        id
                    )))
                }
            }
        }
    }

    async fn guardar_estado(
        &self,
        id: Uuid,
        esperado: EstadoAsignacion,
        nuevo: EstadoAsignacion,
        fecha_completado: Option<DateTime<Utc>>,
    ) -> AppResult<Asignacion> {
        let movida = sqlx::query_as::<_, Asignacion>(
            r#"
            UPDATE asignaciones
            SET estado = $3, fecha_completado = COALESCE($4, fecha_completado)
            WHERE id = $1 AND estado = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(esperado)
        .bind(nuevo)
        .bind(fecha_completado)
        .fetch_optional(&self.pool)
        .await?;

        movida.ok_or_else(|| {
            AppError::Conflict(format!(
                "La asignación {} cambió de estado durante la operación",
                id
            ))
        })
    }

    async fn actualizar_asignacion(
        &self,
        id: Uuid,
        cambios: CambiosAsignacion,
    ) -> AppResult<Asignacion> {
        let mut tx = self.pool.begin().await?;

        let actual =
            sqlx::query_as::<_, Asignacion>("SELECT * FROM asignaciones WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| not_found_error("Asignación", &id.to_string()))?;

        if actual.estado != EstadoAsignacion::Pendiente {
            return Err(AppError::AssignmentLocked(format!(
                "La asignación {} está {} y sus campos son inmutables",
                id, actual.estado
            )));
        }

        let mecanico_destino = cambios.mecanico_id.unwrap_or(actual.mecanico_id);

        if mecanico_destino != actual.mecanico_id {
            // Reasignación: misma comprobación de disponibilidad que el bind
            let mecanico =
                sqlx::query_as::<_, Mecanico>("SELECT * FROM mecanicos WHERE id = $1 FOR UPDATE")
                    .bind(mecanico_destino)
                    .fetch_optional(&mut *tx)
                    .await?
                    .ok_or_else(|| {
                        not_found_error("Mecánico", &mecanico_destino.to_string())
                    })?;

            let (abiertas,): (i64,) = sqlx::query_as(
                r#"
                SELECT COUNT(*) FROM asignaciones
                WHERE mecanico_id = $1 AND estado IN ('pendiente', 'en_proceso')
                "#,
            )
            .bind(mecanico_destino)
            .fetch_one(&mut *tx)
            .await?;

            if !disponibilidad::disponible_con_abiertas(abiertas) {
                return Err(AppError::MechanicBusy(format!(
                    "El mecánico {} ya tiene una asignación abierta",
                    mecanico.nombre
                )));
            }
        }

        let actualizada = sqlx::query_as::<_, Asignacion>(
            r#"
            UPDATE asignaciones SET mecanico_id = $2, notas = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(mecanico_destino)
        .bind(cambios.notas.or(actual.notas))
        .fetch_one(&mut *tx)
        .await
        .map_err(mapear_conflicto_mecanico)?;

        tx.commit().await?;

        Ok(actualizada)
    }

    async fn eliminar_asignacion(&self, id: Uuid) -> AppResult<()> {
        let resultado = sqlx::query(
            "DELETE FROM asignaciones WHERE id = $1 AND estado IN ('completada', 'cancelada')",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        if resultado.rows_affected() == 0 {
            return Err(AppError::Conflict(format!(
                "La asignación {} cambió de estado durante la operación",
                id
            )));
        }

        Ok(())
    }

    async fn eliminar_asignacion_abierta(&self, id: Uuid) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let asignacion =
            sqlx::query_as::<_, Asignacion>("SELECT * FROM asignaciones WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| not_found_error("Asignación", &id.to_string()))?;

        sqlx::query("DELETE FROM asignaciones WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        // La reserva vuelve a ser vinculable; el mecánico queda liberado al
        // desaparecer su asignación abierta
        sqlx::query("UPDATE reservas SET estado = 'PENDIENTE' WHERE id = $1 AND estado = 'CONFIRMADA'")
            .bind(asignacion.reserva_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}
