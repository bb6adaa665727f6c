use std::{net::SocketAddr, str::FromStr, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::sync::Mutex;

use crate::{api, config::Config, types::PkceToken, warning};

/// State shared between the PKCE flow and the callback handler.
#[derive(Clone)]
pub struct CallbackState {
    pub config: Arc<Config>,
    pub pkce: Arc<Mutex<Option<PkceToken>>>,
}

/// Serves the OAuth callback until the task is aborted.
pub async fn start_api_server(state: CallbackState) {
    let addr = match SocketAddr::from_str(&state.config.server_addr) {
        Ok(addr) => addr,
        Err(e) => {
            warning!("Failed to parse server address: {}", e);
            return;
        }
    };

    let app = Router::new().route("/callback", get(api::callback).layer(Extension(state)));

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            warning!("Failed to bind callback server on {}: {}", addr, e);
            return;
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        warning!("Callback server stopped: {}", e);
    }
}
