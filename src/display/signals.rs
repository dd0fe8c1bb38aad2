use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Resolves with the signal name on Ctrl-C (SIGINT) or, on Unix, SIGTERM
pub(crate) async fn shutdown_signal() -> &'static str {
    tokio::select! {
        _ = interrupt() => "SIGINT",
        _ = terminate() => "SIGTERM",
    }
}

async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            warn!("Failed to register SIGTERM handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await
}

/// Set `flag` once `signal` resolves. The view polls the flag each tick.
pub(crate) fn spawn_quit_listener<F>(flag: Arc<AtomicBool>, signal: F) -> JoinHandle<()>
where
    F: Future<Output = &'static str> + Send + 'static,
{
    tokio::spawn(async move {
        let name = signal.await;
        info!("Received {} signal, stopping", name);
        flag.store(true, Ordering::Relaxed);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_listener_sets_flag_on_terminate() {
        let flag = Arc::new(AtomicBool::new(false));
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let task = spawn_quit_listener(Arc::clone(&flag), async move {
            let _ = rx.await;
            "SIGTERM"
        });
        assert!(!flag.load(Ordering::Relaxed));

        tx.send(()).unwrap();
        task.await.unwrap();
        assert!(flag.load(Ordering::Relaxed));
    }
}
