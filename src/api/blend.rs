use axum::{Extension, Form, response::Html};
use serde::Deserialize;

use crate::{blend, server::AppState, utils};

use super::{AppError, render};

#[derive(Debug, Deserialize)]
pub struct SavePlaylistForm {
    #[serde(default)]
    pub track_ids: String,
}

/// Builds a fresh blend and shows it with a form to save it.
pub async fn create_playlist(
    Extension(state): Extension<AppState>,
) -> Result<Html<String>, AppError> {
    let catalog = state.catalog().await?;
    let user = catalog.current_user().await?;

    let blend = blend::generate(&state.store, &catalog, &state.settings.blend).await?;

    Ok(Html(render::blend_preview(
        user.name(),
        &blend,
        &state.settings.blend.playlist_name,
    )))
}

pub async fn save_playlist(
    Extension(state): Extension<AppState>,
    Form(form): Form<SavePlaylistForm>,
) -> Result<Html<String>, AppError> {
    let catalog = state.catalog().await?;

    let track_ids = utils::split_ids(&form.track_ids);
    if track_ids.is_empty() {
        return Err(AppError::BadRequest("No tracks to save.".to_string()));
    }

    let user = catalog.current_user().await?;
    let playlist = catalog
        .upsert_playlist(&user.id, &state.settings.blend.playlist_name, &track_ids)
        .await?;

    Ok(Html(render::playlist_saved(
        user.name(),
        &playlist,
        track_ids.len(),
    )))
}
