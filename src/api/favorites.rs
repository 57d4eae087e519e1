use axum::{
    Extension,
    response::{Html, Json},
};
use serde::Serialize;

use crate::{
    blend,
    error::SnapshotResult,
    management::{snapshot_top_artists, snapshot_top_tracks},
    server::AppState,
    spotify::Catalog,
    types::{FavoritesKind, FavoritesRecord},
};

use super::{AppError, render};

#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub success: bool,
    pub message: String,
}

pub async fn top_tracks(Extension(state): Extension<AppState>) -> Result<Html<String>, AppError> {
    let catalog = state.catalog().await?;
    let user = catalog.current_user().await?;
    let tracks = catalog.top_tracks_by_tier().await?;

    Ok(Html(render::top_tracks(user.name(), &tracks)))
}

pub async fn top_artists(Extension(state): Extension<AppState>) -> Result<Html<String>, AppError> {
    let catalog = state.catalog().await?;
    let user = catalog.current_user().await?;
    let artists = catalog.top_artists_by_tier().await?;

    Ok(Html(render::top_artists(user.name(), &artists)))
}

pub async fn save_top_tracks(
    Extension(state): Extension<AppState>,
) -> Result<Json<SaveResponse>, AppError> {
    save(&state, FavoritesKind::Tracks, "Top tracks saved successfully!").await
}

pub async fn save_top_artists(
    Extension(state): Extension<AppState>,
) -> Result<Json<SaveResponse>, AppError> {
    save(&state, FavoritesKind::Artists, "Top artists saved successfully!").await
}

/// Snapshot failures are reported in the body, only a missing login is an HTTP error.
async fn save(
    state: &AppState,
    kind: FavoritesKind,
    done: &str,
) -> Result<Json<SaveResponse>, AppError> {
    let catalog = state.catalog().await?;

    let response = match snapshot(state, &catalog, kind).await {
        Ok(record) => {
            log::info!(
                "Saved {} {} for {}",
                record.favorites.len(),
                kind.document_name(),
                record.user_id
            );
            SaveResponse {
                success: true,
                message: done.to_string(),
            }
        }
        Err(e) => {
            log::warn!("Saving {} failed: {}", kind.document_name(), e);
            SaveResponse {
                success: false,
                message: e.to_string(),
            }
        }
    };

    Ok(Json(response))
}

async fn snapshot(
    state: &AppState,
    catalog: &Catalog,
    kind: FavoritesKind,
) -> SnapshotResult<FavoritesRecord> {
    let user = catalog.current_user().await?;
    match kind {
        FavoritesKind::Artists => snapshot_top_artists(catalog, &state.store, &user.id).await,
        FavoritesKind::Tracks => snapshot_top_tracks(catalog, &state.store, &user.id).await,
    }
}

pub async fn find_users(Extension(state): Extension<AppState>) -> Result<Html<String>, AppError> {
    let catalog = state.catalog().await?;
    let user = catalog.current_user().await?;

    let records = state.store.load_all().await?;
    let summaries =
        blend::aggregate(&records, state.settings.blend.per_tier_limit, &catalog).await?;

    Ok(Html(render::users(user.name(), &summaries)))
}
