mod auth;
mod favorites;
mod snapshot;

pub use auth::TokenManager;
pub use favorites::FavoritesStore;
pub use snapshot::{artists_record, snapshot_top_artists, snapshot_top_tracks, tracks_record};
