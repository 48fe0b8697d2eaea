//! Contrato del repositorio del taller.
//!
//! Describe el almacén de entidades que consumen los controllers. Las
//! persistencias concretas (Postgres, in-memory para tests) implementan este
//! trait; el core recibe el repositorio inyectado y nunca toca estado global.
//!
//! Las operaciones multi-fila (`vincular`, `actualizar_asignacion`,
//! `eliminar_asignacion_abierta`) son atómicas en cada implementación: o se
//! aplican todas las escrituras o ninguna.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::asignacion::{Asignacion, CambiosAsignacion, EstadoAsignacion};
use crate::models::mecanico::{CambiosMecanico, Mecanico, MecanicoConCarga, NuevoMecanico};
use crate::models::reserva::{EstadoReserva, NuevaReserva, Reserva};
use crate::utils::errors::AppResult;

#[async_trait]
pub trait TallerRepository: Send + Sync {
    // --- Mecánicos ---

    async fn crear_mecanico(&self, datos: NuevoMecanico) -> AppResult<Mecanico>;

    async fn buscar_mecanico(&self, id: Uuid) -> AppResult<Option<Mecanico>>;

    /// Listado con el conteo de asignaciones abiertas por mecánico, del que
    /// la capa de consultas deriva la disponibilidad.
    async fn listar_mecanicos_con_carga(&self) -> AppResult<Vec<MecanicoConCarga>>;

    async fn actualizar_mecanico(&self, id: Uuid, cambios: CambiosMecanico)
        -> AppResult<Mecanico>;

    async fn eliminar_mecanico(&self, id: Uuid) -> AppResult<()>;

    async fn contar_asignaciones_abiertas(&self, mecanico_id: Uuid) -> AppResult<i64>;

    // --- Reservas ---

    async fn crear_reserva(&self, datos: NuevaReserva) -> AppResult<Reserva>;

    async fn buscar_reserva(&self, id: Uuid) -> AppResult<Option<Reserva>>;

    async fn listar_reservas(&self, estado: Option<EstadoReserva>) -> AppResult<Vec<Reserva>>;

    /// Cancela una reserva sólo si sigue en PENDIENTE; una reserva confirmada
    /// queda como compromiso con el mecánico y no se puede retirar.
    async fn cancelar_reserva(&self, id: Uuid) -> AppResult<Reserva>;

    // --- Asignaciones ---

    /// Operación del binder: re-evalúa la disponibilidad del mecánico dentro
    /// de la misma transacción que inserta la asignación y confirma la
    /// reserva. Devuelve `MechanicBusy` si otro bind concurrente ganó la
    /// carrera e `InvalidReservationState` si la reserva no está PENDIENTE.
    async fn vincular(&self, reserva_id: Uuid, mecanico_id: Uuid) -> AppResult<Asignacion>;

    async fn buscar_asignacion(&self, id: Uuid) -> AppResult<Option<Asignacion>>;

    async fn listar_asignaciones(
        &self,
        estado: Option<EstadoAsignacion>,
    ) -> AppResult<Vec<Asignacion>>;

    /// Sella la recepción física del vehículo. La condición (pendiente y sin
    /// recepción previa) se re-verifica en la escritura para cerrar la
    /// ventana entre validación y UPDATE.
    async fn registrar_recepcion(&self, id: Uuid, fecha: DateTime<Utc>) -> AppResult<Asignacion>;

    /// Transición de estado con guarda: la fila sólo se mueve si sigue en
    /// `esperado`. Una carrera perdida sale como `Conflict`, nunca como doble
    /// transición silenciosa.
    async fn guardar_estado(
        &self,
        id: Uuid,
        esperado: EstadoAsignacion,
        nuevo: EstadoAsignacion,
        fecha_completado: Option<DateTime<Utc>>,
    ) -> AppResult<Asignacion>;

    /// Cambios estructurales (mecánico, notas) sólo en pendiente. Si cambia
    /// el mecánico, la disponibilidad del destino se re-evalúa dentro de la
    /// misma transacción.
    async fn actualizar_asignacion(
        &self,
        id: Uuid,
        cambios: CambiosAsignacion,
    ) -> AppResult<Asignacion>;

    /// Borrado regular: sólo asignaciones en estado terminal.
    async fn eliminar_asignacion(&self, id: Uuid) -> AppResult<()>;

    /// Borrado administrativo de una asignación abierta: elimina la fila y
    /// devuelve la reserva dueña a PENDIENTE en la misma transacción, de modo
    /// que el mecánico queda liberado y la reserva vuelve a ser vinculable.
    async fn eliminar_asignacion_abierta(&self, id: Uuid) -> AppResult<()>;
}
