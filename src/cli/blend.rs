use tabled::Table;

use crate::{
    blend,
    config::Settings,
    error, info,
    management::FavoritesStore,
    success,
    types::BlendTableRow,
    warning,
};

use super::{catalog, spinner};

pub async fn blend(settings: Settings, save: bool) {
    let catalog = catalog(&settings).await;
    let store = FavoritesStore::new(settings.store_dir());

    let pb = spinner("Sampling blend...");
    let blend = match blend::generate(&store, &catalog, &settings.blend).await {
        Ok(blend) => blend,
        Err(e) => {
            pb.finish_and_clear();
            error!("Failed to build blend. Err: {}", e)
        }
    };
    pb.finish_and_clear();

    if blend.tracks.is_empty() {
        warning!("No saved top artists to blend. Run missionary snapshot first.");
        return;
    }

    info!(
        "Sampled {} tracks from {} artists",
        blend.tracks.len(),
        blend.artists.len()
    );
    let table_rows: Vec<BlendTableRow> = blend
        .tracks
        .iter()
        .map(|t| BlendTableRow {
            track: t.name.clone(),
            artist: t.artist_name.clone(),
            uri: t.uri.clone(),
        })
        .collect();
    println!("{}", Table::new(table_rows));

    if !save {
        return;
    }

    let user = match catalog.current_user().await {
        Ok(user) => user,
        Err(e) => error!("Failed to load profile. Err: {}", e),
    };

    match catalog
        .upsert_playlist(&user.id, &settings.blend.playlist_name, &blend.track_ids())
        .await
    {
        Ok(playlist) => success!(
            "{} playlist {} {}",
            if playlist.replaced { "Updated" } else { "Created" },
            playlist.name,
            playlist.url.unwrap_or_default()
        ),
        Err(e) => error!("Failed to save playlist. Err: {}", e),
    }
}
