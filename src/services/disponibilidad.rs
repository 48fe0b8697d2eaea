//! Evaluador de disponibilidad
//!
//! Un mecánico está disponible si y sólo si no posee ninguna asignación
//! abierta (pendiente o en_proceso). La disponibilidad se recalcula en cada
//! lectura y nunca se guarda como estado, para que no quede obsoleta tras
//! transiciones concurrentes. Todos los consumidores (binder, proyección,
//! ambos stores) pasan por este módulo: una sola definición de "ocupado".

use crate::models::asignacion::{Asignacion, EstadoAsignacion};

/// Una asignación abierta bloquea al mecánico que la posee.
pub fn es_abierta(estado: EstadoAsignacion) -> bool {
    matches!(
        estado,
        EstadoAsignacion::Pendiente | EstadoAsignacion::EnProceso
    )
}

/// Forma sobre el conjunto de asignaciones del mecánico.
pub fn es_disponible(asignaciones: &[Asignacion]) -> bool {
    !asignaciones.iter().any(|a| es_abierta(a.estado))
}

/// Forma sobre el conteo (para la variante de query agregada en SQL).
pub fn disponible_con_abiertas(abiertas: i64) -> bool {
    abiertas == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn asignacion_con_estado(estado: EstadoAsignacion) -> Asignacion {
        Asignacion {
            id: Uuid::new_v4(),
            mecanico_id: Uuid::new_v4(),
            reserva_id: Uuid::new_v4(),
            estado,
            notas: None,
            fecha_recepcion: None,
            fecha_completado: None,
            creado_en: Utc::now(),
        }
    }

    #[test]
    fn test_sin_asignaciones_esta_disponible() {
        assert!(es_disponible(&[]));
    }

    #[test]
    fn test_asignacion_pendiente_bloquea() {
        let asignaciones = vec![asignacion_con_estado(EstadoAsignacion::Pendiente)];
        assert!(!es_disponible(&asignaciones));
    }

    #[test]
    fn test_asignacion_en_proceso_bloquea() {
        let asignaciones = vec![asignacion_con_estado(EstadoAsignacion::EnProceso)];
        assert!(!es_disponible(&asignaciones));
    }

    #[test]
    fn test_asignaciones_terminales_no_bloquean() {
        let asignaciones = vec![
            asignacion_con_estado(EstadoAsignacion::Completada),
            asignacion_con_estado(EstadoAsignacion::Cancelada),
        ];
        assert!(es_disponible(&asignaciones));
    }

    #[test]
    fn test_mezcla_con_abierta_bloquea() {
        let asignaciones = vec![
            asignacion_con_estado(EstadoAsignacion::Completada),
            asignacion_con_estado(EstadoAsignacion::EnProceso),
        ];
        assert!(!es_disponible(&asignaciones));
    }

    #[test]
    fn test_forma_por_conteo() {
        assert!(disponible_con_abiertas(0));
        assert!(!disponible_con_abiertas(1));
        assert!(!disponible_con_abiertas(3));
    }
}
