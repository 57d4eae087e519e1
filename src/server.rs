use std::{io, sync::Arc};

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tokio::sync::Mutex;

use crate::{
    api::{self, AppError},
    config::Settings,
    error::SpotifyError,
    management::{FavoritesStore, TokenManager},
    spotify::Catalog,
    types::PkceToken,
};

/// Shared state of the web application.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub store: FavoritesStore,
    /// Verifier of a login in progress, and the token once the callback completed.
    pub pkce: Arc<Mutex<Option<PkceToken>>>,
}

impl AppState {
    pub fn new(settings: Settings, pkce: Arc<Mutex<Option<PkceToken>>>) -> Self {
        let store = FavoritesStore::new(settings.store_dir());
        Self {
            settings: Arc::new(settings),
            store,
            pkce,
        }
    }

    /// Catalog client for the cached token, refreshed when stale.
    pub async fn catalog(&self) -> Result<Catalog, AppError> {
        let mut token_mgr = TokenManager::load(self.settings.token_path())
            .await
            .map_err(|_| AppError::NotAuthenticated)?;

        match token_mgr.get_valid_token(&self.settings).await {
            Ok(access_token) => Ok(Catalog::new(&self.settings, access_token)),
            Err(SpotifyError::TokenExchangeFailed(e)) => {
                log::warn!("Token refresh rejected, login required: {}", e);
                Err(AppError::NotAuthenticated)
            }
            Err(e) => Err(AppError::Spotify(e)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::index))
        .route("/health", get(api::health))
        .route("/auth/login_with_spotify", get(api::login))
        .route("/auth/callback", get(api::callback))
        .route("/auth/sign_out", get(api::sign_out))
        .route("/playlists", get(api::playlists))
        .route("/currently_playing", get(api::currently_playing))
        .route("/current_user", get(api::current_user))
        .route("/top_tracks", get(api::top_tracks))
        .route("/top_artists", get(api::top_artists))
        .route("/save_top_tracks", post(api::save_top_tracks))
        .route("/save_top_artists", post(api::save_top_artists))
        .route("/find_users", get(api::find_users))
        .route("/create_playlist", get(api::create_playlist))
        .route("/save_playlist", post(api::save_playlist))
        .layer(Extension(state))
}

pub async fn start_api_server(state: AppState) -> io::Result<()> {
    let addr = state.settings.server_address.clone();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("Listening on http://{}", addr);
    axum::serve(listener, app).await
}
