//! HTTP front end: an axum router that turns every request into a
//! [`NetEvent`] for the bridge and waits for its reply.
use std::net::SocketAddr;

use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use log::error;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::http::{NetEvent, NetRequest};

/// Capacity of the queue between the front end and the bridge.
pub(crate) const EVENT_QUEUE: usize = 64;

pub(crate) struct Frontend {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
    addr: SocketAddr,
}

impl Frontend {
    pub(crate) async fn spawn(
        host: &str,
        port: u16,
        events: mpsc::Sender<NetEvent>,
    ) -> std::io::Result<Self> {
        let listener = TcpListener::bind((host, port)).await?;
        let addr = listener.local_addr()?;
        let (shutdown, shutdown_rx) = watch::channel(false);

        let app = Router::new().fallback(forward).with_state(events);
        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(wait_for_shutdown(shutdown_rx))
                .await
            {
                error!("HTTP front end failed: {}", e);
            }
        });

        Ok(Self {
            shutdown,
            task,
            addr,
        })
    }

    pub(crate) fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections; in-flight replies still complete.
    pub(crate) fn stop(&self) {
        let _ = self.shutdown.send(true);
    }

    pub(crate) async fn join(self) {
        if let Err(e) = self.task.await {
            error!("HTTP front end task ended abnormally: {}", e);
        }
    }
}

async fn forward(
    State(events): State<mpsc::Sender<NetEvent>>,
    method: Method,
    uri: Uri,
    body: String,
) -> Response {
    let (event, reply) = NetEvent::new(NetRequest {
        method,
        path: uri.path().to_string(),
        body,
    });
    if events.send(event).await.is_err() {
        return unavailable();
    }
    match reply.await {
        Ok(reply) => reply.into_response(),
        Err(_) => unavailable(),
    }
}

fn unavailable() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "Session closed").into_response()
}

async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    loop {
        if *rx.borrow() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}
