use crate::{
    config::Settings,
    error,
    management::{FavoritesStore, snapshot_top_artists, snapshot_top_tracks},
    success,
};

use super::{catalog, spinner};

pub async fn snapshot(settings: Settings) {
    let catalog = catalog(&settings).await;
    let store = FavoritesStore::new(settings.store_dir());

    let user = match catalog.current_user().await {
        Ok(user) => user,
        Err(e) => error!("Failed to load profile. Err: {}", e),
    };

    let pb = spinner("Saving top artists...");
    let artists = match snapshot_top_artists(&catalog, &store, &user.id).await {
        Ok(record) => record.favorites.len(),
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to save top artists. Err: {}", e)
        }
    };

    pb.set_message("Saving top tracks...");
    let tracks = match snapshot_top_tracks(&catalog, &store, &user.id).await {
        Ok(record) => record.favorites.len(),
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to save top tracks. Err: {}", e)
        }
    };
    pb.finish_and_clear();

    success!(
        "Saved {} artists and {} tracks for {}",
        artists,
        tracks,
        user.name()
    );
}
