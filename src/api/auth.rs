use axum::{Extension, extract::Query, response::Redirect};
use serde::Deserialize;

use crate::{
    management::TokenManager,
    server::AppState,
    spotify,
    types::PkceToken,
    utils,
};

use super::AppError;

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

/// Starts a PKCE login and sends the browser to the accounts service.
pub async fn login(Extension(state): Extension<AppState>) -> Result<Redirect, AppError> {
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);
    let url = spotify::auth::authorize_url(&state.settings, &code_challenge)?;

    *state.pkce.lock().await = Some(PkceToken {
        code_verifier,
        token: None,
    });

    Ok(Redirect::to(&url))
}

pub async fn callback(
    Query(params): Query<CallbackParams>,
    Extension(state): Extension<AppState>,
) -> Result<Redirect, AppError> {
    if let Some(error) = params.error {
        return Err(AppError::BadRequest(format!(
            "Error received from Spotify: {}",
            error
        )));
    }

    let Some(code) = params.code else {
        return Err(AppError::BadRequest(
            "Error: no code provided by Spotify callback.".to_string(),
        ));
    };

    let mut pkce = state.pkce.lock().await;
    // Take code verifier from state
    let Some(pkce_state) = pkce.as_mut() else {
        return Err(AppError::BadRequest(
            "Missing PKCE code verifier.".to_string(),
        ));
    };

    let token = spotify::auth::exchange_code_pkce(
        &state.settings,
        &code,
        &pkce_state.code_verifier,
    )
    .await?;

    TokenManager::new(state.settings.token_path(), token.clone())
        .persist()
        .await?;
    pkce_state.token = Some(token);
    log::info!("Signed in with Spotify");

    Ok(Redirect::to("/"))
}

pub async fn sign_out(Extension(state): Extension<AppState>) -> Result<Redirect, AppError> {
    TokenManager::clear(&state.settings.token_path()).await?;
    *state.pkce.lock().await = None;
    Ok(Redirect::to("/"))
}
