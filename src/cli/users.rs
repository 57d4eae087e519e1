use tabled::Table;

use crate::{
    blend,
    config::Settings,
    error,
    management::FavoritesStore,
    types::{ArtistPref, Tier, TierBuckets, UserTableRow},
    warning,
};

use super::{catalog, spinner};

pub async fn users(settings: Settings) {
    let store = FavoritesStore::new(settings.store_dir());
    let records = match store.load_all().await {
        Ok(records) => records,
        Err(e) => error!("Failed to load favorites. Err: {}", e),
    };

    if records.is_empty() {
        warning!("Nobody has saved favorites yet. Run missionary snapshot.");
        return;
    }

    let catalog = catalog(&settings).await;
    let pb = spinner("Looking up users...");
    let summaries =
        match blend::aggregate(&records, settings.blend.per_tier_limit, &catalog).await {
            Ok(summaries) => summaries,
            Err(e) => {
                pb.finish_and_clear();
                error!("Failed to aggregate favorites. Err: {}", e)
            }
        };
    pb.finish_and_clear();

    let table_rows: Vec<UserTableRow> = summaries
        .into_iter()
        .map(|s| UserTableRow {
            short_term: artist_names(&s.artists, Tier::ShortTerm),
            medium_term: artist_names(&s.artists, Tier::MediumTerm),
            long_term: artist_names(&s.artists, Tier::LongTerm),
            user: s.display_name,
        })
        .collect();

    let table = Table::new(table_rows);
    println!("{}", table);
}

fn artist_names(artists: &TierBuckets<ArtistPref>, tier: Tier) -> String {
    artists
        .get(tier)
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
