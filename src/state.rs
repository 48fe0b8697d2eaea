//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. El repositorio viaja como trait object:
//! los handlers nunca tocan el pool directamente, así los tests montan la
//! misma aplicación con el store in-memory.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::{PgTallerRepository, TallerRepository};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TallerRepository>,
    pub config: EnvironmentConfig,
}

impl AppState {
    /// Estado de producción respaldado por Postgres
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            store: Arc::new(PgTallerRepository::new(pool)),
            config,
        }
    }

    /// Estado con un repositorio arbitrario (tests, sustituciones)
    pub fn with_store(store: Arc<dyn TallerRepository>, config: EnvironmentConfig) -> Self {
        Self { store, config }
    }
}
