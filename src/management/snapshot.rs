use crate::{
    error::SnapshotResult,
    spotify::Catalog,
    types::{
        ArtistPref, Favorites, FavoritesRecord, FullArtist, FullTrack, TierBuckets, TrackPref,
    },
};

use super::FavoritesStore;

/// Captures the signed-in user's top artists of every tier and stores them.
pub async fn snapshot_top_artists(
    catalog: &Catalog,
    store: &FavoritesStore,
    user_id: &str,
) -> SnapshotResult<FavoritesRecord> {
    let artists = catalog.top_artists_by_tier().await?;
    let record = artists_record(user_id, &artists);
    store.save(&record).await?;
    Ok(record)
}

/// Captures the signed-in user's top tracks of every tier and stores them.
pub async fn snapshot_top_tracks(
    catalog: &Catalog,
    store: &FavoritesStore,
    user_id: &str,
) -> SnapshotResult<FavoritesRecord> {
    let tracks = catalog.top_tracks_by_tier().await?;
    let record = tracks_record(user_id, &tracks);
    store.save(&record).await?;
    Ok(record)
}

pub fn artists_record(user_id: &str, artists: &TierBuckets<FullArtist>) -> FavoritesRecord {
    let items = artists
        .iter()
        .flat_map(|(tier, items)| items.iter().map(move |a| ArtistPref::from_artist(a, tier)))
        .collect();
    FavoritesRecord::new(user_id, Favorites::Artists(items))
}

pub fn tracks_record(user_id: &str, tracks: &TierBuckets<FullTrack>) -> FavoritesRecord {
    let items = tracks
        .iter()
        .flat_map(|(tier, items)| items.iter().map(move |t| TrackPref::from_track(t, tier)))
        .collect();
    FavoritesRecord::new(user_id, Favorites::Tracks(items))
}
