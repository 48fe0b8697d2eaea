//! Servicios de dominio
//!
//! Funciones puras compartidas por binder, proyecciones y persistencias.

pub mod disponibilidad;
