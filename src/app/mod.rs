use std::{io, net::IpAddr, sync::Arc};

use anyhow::Context;
use axum::{http::Request, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{config::Settings, rate::RateClient, store::SubscriberStore};

pub mod error;
pub mod rate;
pub mod subscription;

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn SubscriberStore>,
    rate_client: RateClient,
}

fn app_router() -> Router<AppState> {
    rate::router().merge(subscription::router())
}

pub struct App {
    listener: TcpListener,
    state: AppState,
}

impl App {
    pub async fn with(config: &Settings, store: Arc<dyn SubscriberStore>) -> anyhow::Result<Self> {
        let rate_client = config.rate_api.client()?;

        let address = format!("{}:{}", config.application.host, config.application.port);
        let listener = TcpListener::bind(&address)
            .await
            .with_context(|| format!("Could not bind {}.", address))?;

        Ok(Self {
            listener,
            state: AppState { store, rate_client },
        })
    }

    pub fn host(&self) -> io::Result<IpAddr> {
        Ok(self.listener.local_addr()?.ip())
    }

    pub fn port(&self) -> io::Result<u16> {
        Ok(self.listener.local_addr()?.port())
    }

    /// Serves requests until Ctrl-C or SIGTERM, then drains in-flight requests.
    pub async fn serve(self) -> Result<(), io::Error> {
        let app = app_router().with_state(self.state).layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                let id = uuid::Uuid::new_v4();
                tracing::info_span!(
                    "request",
                    method = ?request.method(),
                    uri = ?request.uri(),
                    %id,
                )
            }),
        );

        axum::serve(self.listener, app.into_make_service())
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install the Ctrl-C handler");
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
                tracing::error!(error = %e, "failed to install the SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
