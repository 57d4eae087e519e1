use axum::{Extension, response::Html};

use crate::server::AppState;

use super::{AppError, render};

pub async fn index(Extension(state): Extension<AppState>) -> Result<Html<String>, AppError> {
    let catalog = match state.catalog().await {
        Ok(catalog) => catalog,
        Err(AppError::NotAuthenticated) => return Ok(Html(render::landing())),
        Err(e) => return Err(e),
    };

    let user = catalog.current_user().await?;
    Ok(Html(render::home(&user)))
}

pub async fn playlists(Extension(state): Extension<AppState>) -> Result<Html<String>, AppError> {
    let catalog = state.catalog().await?;
    let user = catalog.current_user().await?;
    let playlists = catalog.playlists().await?;

    Ok(Html(render::playlists(user.name(), &playlists)))
}

pub async fn currently_playing(
    Extension(state): Extension<AppState>,
) -> Result<Html<String>, AppError> {
    let catalog = state.catalog().await?;
    let user = catalog.current_user().await?;

    let track = catalog
        .currently_playing()
        .await?
        .and_then(|playing| playing.item);

    let html = match track {
        Some(track) => {
            let top_tracks = match track.primary_artist_id() {
                Some(artist_id) => catalog.artist_top_tracks(artist_id).await?,
                None => Vec::new(),
            };
            render::currently_playing(user.name(), Some((&track, top_tracks.as_slice())))
        }
        None => render::currently_playing(user.name(), None),
    };

    Ok(Html(html))
}

pub async fn current_user(
    Extension(state): Extension<AppState>,
) -> Result<Html<String>, AppError> {
    let catalog = state.catalog().await?;
    let user = catalog.current_user().await?;
    Ok(Html(render::current_user(&user)))
}
