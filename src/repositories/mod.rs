//! Capa de persistencia del taller.
//!
//! El contrato (`TallerRepository`) se inyecta en los controllers; las
//! implementaciones concretas viven aquí: Postgres para producción y una
//! variante in-memory para tests.

pub mod memoria;
pub mod pg;
pub mod taller_repository;

pub use memoria::InMemoryTallerRepository;
pub use pg::PgTallerRepository;
pub use taller_repository::TallerRepository;
