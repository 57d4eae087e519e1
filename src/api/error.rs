use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::error::{BlendError, SnapshotError, SpotifyError, StoreError};

use super::render;

/// Error type of the HTTP handlers.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not signed in")]
    NotAuthenticated,
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Spotify(#[from] SpotifyError),
    #[error(transparent)]
    Blend(#[from] BlendError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<SnapshotError> for AppError {
    fn from(err: SnapshotError) -> Self {
        match err {
            SnapshotError::Catalog(e) => AppError::Spotify(e),
            SnapshotError::Store(e) => AppError::Store(e),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotAuthenticated => StatusCode::SEE_OTHER,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Spotify(_) => StatusCode::BAD_GATEWAY,
            AppError::Blend(BlendError::UnknownUser { .. }) => StatusCode::NOT_FOUND,
            AppError::Blend(BlendError::Store(_)) | AppError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Blend(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::NotAuthenticated = self {
            return Redirect::to("/auth/login_with_spotify").into_response();
        }

        let status = self.status();
        if status.is_server_error() {
            log::error!("Request failed: {}", self);
        } else {
            log::warn!("Request rejected: {}", self);
        }

        (status, Html(render::message(&self.to_string()))).into_response()
    }
}
