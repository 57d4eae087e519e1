use std::{sync::Arc, time::Duration};

use chrono::Utc;
use reqwest::{Client, Url};
use tokio::sync::Mutex;

use crate::{
    config::Settings,
    error::{SpotifyError, SpotifyResult},
    error, info,
    server::{AppState, start_api_server},
    success,
    types::{PkceToken, Token, TokenResponse},
    warning,
};

/// Builds the accounts-service authorize URL for a PKCE challenge.
pub fn authorize_url(settings: &Settings, code_challenge: &str) -> SpotifyResult<String> {
    let url = Url::parse_with_params(
        &settings.auth_url,
        &[
            ("client_id", settings.client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", settings.redirect_uri.as_str()),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "S256"),
            ("scope", settings.scope.as_str()),
        ],
    )
    .map_err(|e| SpotifyError::InvalidUrl(format!("{}: {}", settings.auth_url, e)))?;

    Ok(url.to_string())
}

/// Runs the interactive login: serve the app, open the browser, wait for the callback.
pub async fn auth(settings: Settings, shared_state: Arc<Mutex<Option<PkceToken>>>) {
    let state = AppState::new(settings.clone(), Arc::clone(&shared_state));
    tokio::spawn(async move {
        if let Err(e) = start_api_server(state).await {
            error!("Cannot start local server. Err: {}", e);
        }
    });

    let login_url = format!("{}/auth/login_with_spotify", settings.local_url());
    info!("Waiting for Spotify login at {}", login_url);
    if webbrowser::open(&login_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            login_url
        )
    }

    match wait_for_token(shared_state).await {
        Some(_) => success!("Authentication successful!"),
        None => error!("Authentication failed or timed out."),
    }
}

async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(pkce_token) = lock.as_ref() {
            if let Some(token) = &pkce_token.token {
                return Some(token.clone());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

pub async fn refresh_token(settings: &Settings, refresh_token: &str) -> SpotifyResult<Token> {
    let response = request_token(
        settings,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", &settings.client_id),
        ],
    )
    .await?;

    // The accounts service may omit a rotated refresh token.
    Ok(into_token(response, Some(refresh_token)))
}

pub async fn exchange_code_pkce(
    settings: &Settings,
    code: &str,
    verifier: &str,
) -> SpotifyResult<Token> {
    let response = request_token(
        settings,
        &[
            ("grant_type", "authorization_code"),
            ("client_id", &settings.client_id),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", &settings.redirect_uri),
        ],
    )
    .await?;

    Ok(into_token(response, None))
}

async fn request_token(settings: &Settings, form: &[(&str, &str)]) -> SpotifyResult<TokenResponse> {
    let client = Client::new();
    let res = client.post(&settings.token_url).form(form).send().await?;

    if !res.status().is_success() {
        let status = res.status();
        let body = res.text().await.unwrap_or_default();
        return Err(SpotifyError::TokenExchangeFailed(format!("{}: {}", status, body)));
    }

    Ok(res.json::<TokenResponse>().await?)
}

fn into_token(response: TokenResponse, previous_refresh: Option<&str>) -> Token {
    let refresh_token = response
        .refresh_token
        .or_else(|| previous_refresh.map(str::to_string))
        .unwrap_or_default();

    Token {
        access_token: response.access_token,
        refresh_token,
        scope: response.scope,
        expires_in: response.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    }
}
