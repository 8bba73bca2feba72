use anyhow::Result;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};
use dotenvy::dotenv;

use attendance_api::config::EnvironmentConfig;
use attendance_api::database::{Bootstrapper, MongoConnector};
use attendance_api::routes::create_router;
use attendance_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("🗓️ Employee Attendance API");
    info!("==========================");

    let env_config = EnvironmentConfig::from_env().map_err(|e| {
        error!("❌ Configuration error: {}", e);
        anyhow::anyhow!(e)
    })?;

    info!("⚙️ Entorno: {}", env_config.environment);

    // Sin URI de MongoDB no hay nada que intentar: salida inmediata
    let database = Bootstrapper::from_env(MongoConnector::new())?
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Error de base de datos: {}", e))?;

    let addr: SocketAddr = env_config.server_url().parse()?;
    let app = create_router(AppState::new(env_config, database));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /api/health - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
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
