//! # API Module
//!
//! HTTP handlers of the missionary web application.
//!
//! ## Endpoints
//!
//! ### Authentication
//!
//! - [`login`] starts the OAuth 2.0 PKCE flow and redirects to Spotify.
//! - [`callback`] exchanges the authorization code and caches the token.
//! - [`sign_out`] drops the cached token.
//!
//! ### Listening data
//!
//! - [`index`], [`playlists`], [`currently_playing`], [`current_user`]
//! - [`top_tracks`], [`top_artists`] and their `save_*` counterparts, which
//!   snapshot the favorites into the preference store.
//! - [`find_users`] shows every user's stored favorites.
//!
//! ### Blend
//!
//! - [`create_playlist`] samples a blend from all stored top artists.
//! - [`save_playlist`] writes the previewed tracks to "Your Missionary Blend".
//!
//! ### Monitoring
//!
//! - [`health`] returns application status and version.
//!
//! Protected routes answer with a redirect to the login route when no valid
//! token is cached; see [`AppError`].

mod auth;
mod blend;
mod current;
mod error;
mod favorites;
mod health;
pub mod render;

pub use auth::{CallbackParams, callback, login, sign_out};
pub use blend::{SavePlaylistForm, create_playlist, save_playlist};
pub use current::{current_user, currently_playing, index, playlists};
pub use error::AppError;
pub use favorites::{
    SaveResponse, find_users, save_top_artists, save_top_tracks, top_artists, top_tracks,
};
pub use health::health;
