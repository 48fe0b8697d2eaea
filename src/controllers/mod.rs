//! Controllers del sistema
//!
//! Lógica de negocio entre las rutas HTTP y el repositorio inyectado.

pub mod asignacion_controller;
pub mod mecanico_controller;
pub mod reserva_controller;
