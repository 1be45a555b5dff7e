use tokio::signal;
use tracing::warn;

/// 等待 Ctrl+C 或 SIGTERM（容器环境下通常收到后者）
pub async fn listen_for_shutdown() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("Failed to listen for Ctrl+C");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("Ctrl+C received, initiating graceful shutdown..."),
        _ = terminate => warn!("SIGTERM received, initiating graceful shutdown..."),
    }
}
