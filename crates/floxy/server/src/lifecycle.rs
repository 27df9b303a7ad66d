//! Process lifecycle
//!
//! `Created → Serving → ShuttingDown → Stopped`
//!
//! [`Lifecycle::stop`] is the only transition out of `Serving`. It stops
//! accepting connections and closes the pool without waiting for in-flight
//! requests to finish; handlers still holding the pool may then fail.

use crate::error::ServeError;
use crate::server::Server;
use std::future::IntoFuture;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Lifecycle states of the server process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Created,
    Serving,
    ShuttingDown,
    Stopped,
}

/// Drives a [`Server`] from construction to shutdown
pub struct Lifecycle {
    server: Server,
    state: watch::Sender<LifecycleState>,
}

impl Lifecycle {
    pub fn new(server: Server) -> Self {
        let (state, _) = watch::channel(LifecycleState::Created);
        Self { server, state }
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.borrow()
    }

    pub fn server(&self) -> &Server {
        &self.server
    }

    /// Bind `0.0.0.0:<port>` and serve until stopped
    pub async fn start(&self) -> Result<(), ServeError> {
        if self.state() != LifecycleState::Created {
            return Ok(());
        }

        let addr = SocketAddr::from(([0, 0, 0, 0], self.server.config().port));
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServeError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        self.serve(listener).await
    }

    /// Serve on an already bound listener until stopped
    ///
    /// Returns `Ok(())` once [`Lifecycle::stop`] has been requested, or
    /// immediately if it was requested before serving began.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), ServeError> {
        let mut state_rx = self.state.subscribe();
        let started = self.state.send_if_modified(|state| {
            if *state == LifecycleState::Created {
                *state = LifecycleState::Serving;
                true
            } else {
                false
            }
        });
        if !started {
            tracing::info!("Stop requested before serving, not accepting connections");
            return Ok(());
        }

        let addr = listener.local_addr()?;
        tracing::info!(%addr, mode = %self.server.config().engine_mode, "Floxy UI server listening");

        let app = self.server.router();
        tokio::select! {
            result = axum::serve(listener, app).into_future() => {
                result?;
                Ok(())
            }
            _ = state_rx.wait_for(|state| *state != LifecycleState::Serving) => {
                tracing::info!("Listener stopped");
                Ok(())
            }
        }
    }

    /// Stop serving and release the pool
    ///
    /// The first call performs the shutdown; later or concurrent calls wait
    /// until it has completed and do nothing else.
    pub async fn stop(&self) {
        let initiated = self.state.send_if_modified(|state| match state {
            LifecycleState::Created | LifecycleState::Serving => {
                *state = LifecycleState::ShuttingDown;
                true
            }
            LifecycleState::ShuttingDown | LifecycleState::Stopped => false,
        });

        if !initiated {
            let mut state_rx = self.state.subscribe();
            let _ = state_rx
                .wait_for(|state| *state == LifecycleState::Stopped)
                .await;
            return;
        }

        tracing::info!("Shutting down server...");
        self.server.close().await;
        self.state.send_replace(LifecycleState::Stopped);
        tracing::info!("Server stopped");
    }
}

/// Resolves on SIGINT or SIGTERM (Ctrl+C elsewhere)
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received interrupt signal");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal");
        }
    }
}
