// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    routing::{get, post},
    Router,
};
use rsa::RsaPrivateKey;
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use super::{accounts, flow_endpoint, handlers};
use crate::config::FlowConfig;
use crate::flow::{FlowDispatcher, LoanFlowDispatcher};
use crate::upstream::AccountService;

/// Shared, read-only request state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<FlowConfig>,
    /// `None` when no key could be loaded; `POST /` then answers 500
    pub private_key: Option<Arc<RsaPrivateKey>>,
    pub dispatcher: Arc<dyn FlowDispatcher>,
    pub accounts: Arc<dyn AccountService>,
}

impl AppState {
    /// State with the loan intake dispatcher over `accounts`
    pub fn new(
        config: FlowConfig,
        private_key: Option<RsaPrivateKey>,
        accounts: Arc<dyn AccountService>,
    ) -> Self {
        let dispatcher: Arc<dyn FlowDispatcher> =
            Arc::new(LoanFlowDispatcher::new(accounts.clone()));

        Self {
            config: Arc::new(config),
            private_key: private_key.map(Arc::new),
            dispatcher,
            accounts,
        }
    }

    /// Replace the dispatcher
    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn FlowDispatcher>) -> Self {
        self.dispatcher = dispatcher;
        self
    }
}

/// Build the router with all routes and middleware
pub fn create_app(state: Arc<AppState>) -> Router {
    let request_timeout = state.config.request_timeout;

    Router::new()
        // Encrypted flow endpoint
        .route("/", post(flow_endpoint::flow_handler))
        .route("/health", get(handlers::health_handler))
        // Plain data exchange and static flow definitions
        .route("/data-exchange", post(handlers::data_exchange_handler))
        .route("/wallet-balance", get(handlers::wallet_balance_flow_handler))
        .route("/bank-details", get(handlers::bank_details_flow_handler))
        .route("/ussd-payment", get(handlers::ussd_payment_flow_handler))
        .nest("/api", accounts::routes())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve until Ctrl-C
pub async fn start_server(state: AppState) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", state.config.host, state.config.port).parse()?;
    let app = create_app(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🚀 Flow endpoint listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = signal::ctrl_c().await;
            info!("🛑 Shutdown signal received");
        })
        .await?;

    Ok(())
}
