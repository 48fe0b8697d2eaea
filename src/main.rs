use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use taller_backend::config::environment::EnvironmentConfig;
use taller_backend::database::{connection, DatabaseConnection};
use taller_backend::routes::crear_router;
use taller_backend::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🔧 Taller Backend - Gestión de asignaciones de mecánicos");
    info!("========================================================");

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();

    if let Err(e) = connection::run_migrations(&pool).await {
        error!("❌ Error aplicando migraciones: {}", e);
        return Err(anyhow::anyhow!("Error de migraciones: {}", e));
    }
    info!("✅ Migraciones aplicadas");

    // Crear router de la API
    let config = EnvironmentConfig::default();
    let port = config.port;
    let app_state = AppState::new(pool, config);
    let app = crear_router(app_state);

    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /test - Endpoint de prueba");
    info!("🧑‍🔧 Endpoints - Mecánico:");
    info!("   POST /api/mecanico - Registrar mecánico");
    info!("   GET  /api/mecanico - Listar mecánicos con disponibilidad");
    info!("   GET  /api/mecanico/:id - Obtener mecánico");
    info!("   PUT  /api/mecanico/:id - Actualizar mecánico");
    info!("   DELETE /api/mecanico/:id - Eliminar mecánico");
    info!("📅 Endpoints - Reserva:");
    info!("   POST /api/reserva - Registrar reserva");
    info!("   GET  /api/reserva - Listar reservas (?estado=)");
    info!("   GET  /api/reserva/:id - Obtener reserva");
    info!("   PATCH /api/reserva/:id/cancelar - Cancelar reserva PENDIENTE");
    info!("🔗 Endpoints - Asignación:");
    info!("   POST /api/asignacion - Vincular reserva con mecánico");
    info!("   GET  /api/asignacion - Listar asignaciones (?estado=)");
    info!("   GET  /api/asignacion/:id - Obtener asignación");
    info!("   PUT  /api/asignacion/:id - Actualizar asignación pendiente");
    info!("   PATCH /api/asignacion/:id/estado - Transición de estado");
    info!("   PATCH /api/asignacion/:id/recepcion - Registrar recepción");
    info!("   DELETE /api/asignacion/:id - Eliminar asignación (?forzar=)");

    // Iniciar servidor
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
