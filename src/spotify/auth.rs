use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    config::Config,
    error::ArchiveError,
    management::TokenManager,
    server::{CallbackState, start_api_server},
    types::{ClientCredentialsResponse, PkceToken, Token},
    utils, warning,
};

/// Runs the OAuth 2.0 PKCE flow and persists the resulting user token.
///
/// The flow:
/// 1. Generate a code verifier and its SHA256 challenge
/// 2. Start the local callback server
/// 3. Open the authorization URL in the browser
/// 4. Wait up to 60 seconds for the callback to exchange the code
/// 5. Persist the token through [`TokenManager`]
///
/// The user token is the write credential used for playlist creation.
pub async fn auth(config: &Config) -> Result<Token, ArchiveError> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    let shared_state: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(Some(PkceToken {
        code_verifier,
        token: None,
    })));

    let server_state = CallbackState {
        config: Arc::new(config.clone()),
        pkce: Arc::clone(&shared_state),
    };
    let server = tokio::spawn(async move { start_api_server(server_state).await });

    let auth_url = format!(
        "{spotify_auth_url}?client_id={client_id}&response_type=code&redirect_uri={redirect_uri}&code_challenge={code_challenge}&code_challenge_method=S256&scope={scope}",
        spotify_auth_url = config.auth_url,
        client_id = config.client_id,
        redirect_uri = config.redirect_uri,
        code_challenge = code_challenge,
        scope = config.scope.replace(' ', "%20"),
    );

    if webbrowser::open(&auth_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    let token = wait_for_token(shared_state).await;
    server.abort();

    let token =
        token.ok_or_else(|| ArchiveError::Auth("authentication failed or timed out".into()))?;
    TokenManager::new(token.clone())
        .persist()
        .await
        .map_err(ArchiveError::Auth)?;

    Ok(token)
}

/// Polls the shared state once per second for up to 60 seconds.
async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(token) = lock.as_ref().and_then(|p| p.token.as_ref()) {
            return Some(token.clone());
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Obtains an app-only access token through the client-credentials grant.
///
/// This is the read credential: it can fetch any public playlist but cannot
/// modify anything.
pub async fn client_credentials(config: &Config) -> Result<String, ArchiveError> {
    let client_secret = config.require_client_secret()?;

    let res = Client::new()
        .post(&config.token_url)
        .basic_auth(&config.client_id, Some(client_secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await?
        .error_for_status()
        .map_err(|e| ArchiveError::Auth(e.to_string()))?;

    let json = res.json::<ClientCredentialsResponse>().await?;
    Ok(json.access_token)
}

/// Exchanges a refresh token for a new access token.
///
/// Spotify may omit the refresh token in the response, in which case the
/// previous one stays valid and is carried over.
pub async fn refresh_token(config: &Config, refresh_token: &str) -> Result<Token, String> {
    let res = Client::new()
        .post(&config.token_url)
        .form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", config.client_id.as_str()),
        ])
        .send()
        .await
        .map_err(|e| e.to_string())?
        .error_for_status()
        .map_err(|e| e.to_string())?;

    let json: Value = res.json().await.map_err(|e| e.to_string())?;

    Ok(Token {
        access_token: json["access_token"]
            .as_str()
            .ok_or("token response without access_token")?
            .to_string(),
        refresh_token: json["refresh_token"]
            .as_str()
            .unwrap_or(refresh_token)
            .to_string(),
        scope: json["scope"].as_str().unwrap_or_default().to_string(),
        expires_in: json["expires_in"].as_u64().unwrap_or(3600),
        obtained_at: Utc::now().timestamp() as u64,
    })
}

/// Exchanges an authorization code plus PKCE verifier for a user token.
pub async fn exchange_code_pkce(
    config: &Config,
    code: &str,
    verifier: &str,
) -> Result<Token, String> {
    let res = Client::new()
        .post(&config.token_url)
        .form(&[
            ("grant_type", "authorization_code"),
            ("client_id", config.client_id.as_str()),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .send()
        .await
        .map_err(|e| e.to_string())?
        .error_for_status()
        .map_err(|e| e.to_string())?;

    let json: Value = res.json().await.map_err(|e| e.to_string())?;
    let field = |name: &str| {
        json[name]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| format!("token response without {name}"))
    };

    Ok(Token {
        access_token: field("access_token")?,
        refresh_token: field("refresh_token")?,
        scope: field("scope").unwrap_or_default(),
        expires_in: json["expires_in"].as_u64().unwrap_or(3600),
        obtained_at: Utc::now().timestamp() as u64,
    })
}
