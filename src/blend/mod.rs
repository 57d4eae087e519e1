//! Blend generation and the favorites overview.
//!
//! Both operations work on the records in the favorites store and reach the
//! catalog only through the [`TrackSource`] and [`DisplayNameLookup`] seams,
//! so they can be driven by stubs in tests.

use std::future::Future;

use rand::{SeedableRng, rngs::StdRng};

use crate::{
    config::BlendSettings,
    error::BlendResult,
    management::FavoritesStore,
    types::{ArtistPref, Blend, Favorites, FavoritesRecord, TierBuckets, TrackRef},
};

mod aggregate;
mod sampler;

pub use aggregate::aggregate;
pub use sampler::{build_track_candidates, select_artists};

/// Supplies the most popular tracks of an artist.
pub trait TrackSource {
    fn fetch_top_tracks(
        &self,
        artist_id: &str,
    ) -> impl Future<Output = BlendResult<Vec<TrackRef>>> + Send;
}

/// Resolves a user id to a human-readable name.
pub trait DisplayNameLookup {
    fn display_name(&self, user_id: &str) -> impl Future<Output = BlendResult<String>> + Send;
}

/// Collects every stored artist preference into per-tier pools.
///
/// Pools keep store order and may contain the same artist more than once
/// when several users share it.
pub fn pools_from_records(records: &[FavoritesRecord]) -> TierBuckets<ArtistPref> {
    let mut pools = TierBuckets::default();
    for record in records {
        if let Favorites::Artists(items) = &record.favorites {
            for artist in items {
                pools.get_mut(artist.range).push(artist.clone());
            }
        }
    }
    pools
}

/// Runs the full blend pipeline against the store.
pub async fn generate<S: TrackSource>(
    store: &FavoritesStore,
    source: &S,
    settings: &BlendSettings,
) -> BlendResult<Blend> {
    let records = store.load_all().await?;
    let pools = pools_from_records(&records);
    log::debug!(
        "Artist pools: {} short, {} medium, {} long",
        pools.short_term.len(),
        pools.medium_term.len(),
        pools.long_term.len()
    );

    let mut rng = StdRng::from_os_rng();
    let artists = select_artists(
        &pools,
        settings.per_tier_target,
        settings.buffer_size,
        &mut rng,
    );
    let tracks =
        build_track_candidates(&artists, settings.tracks_per_artist, source, &mut rng).await?;

    log::info!(
        "Blend built from {} artists with {} tracks",
        artists.len(),
        tracks.len()
    );
    Ok(Blend { artists, tracks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Tier, TrackPref};

    struct EchoSource;

    impl TrackSource for EchoSource {
        async fn fetch_top_tracks(&self, artist_id: &str) -> BlendResult<Vec<TrackRef>> {
            Ok((0..4)
                .map(|n| TrackRef {
                    id: format!("{artist_id}{n}"),
                    name: format!("{artist_id} {n}"),
                    artist_name: artist_id.to_string(),
                    uri: format!("spotify:track:{artist_id}{n}"),
                    external_url: None,
                    image_url: None,
                })
                .collect())
        }
    }

    fn artist(id: &str, range: Tier) -> ArtistPref {
        ArtistPref {
            id: id.to_string(),
            name: id.to_string(),
            range,
            popularity: 0,
            external_url: String::new(),
        }
    }

    #[test]
    fn pools_ignore_track_documents() {
        let records = vec![
            FavoritesRecord {
                user_id: "u1".to_string(),
                captured_at: 0,
                favorites: Favorites::Artists(vec![
                    artist("a", Tier::ShortTerm),
                    artist("b", Tier::LongTerm),
                ]),
            },
            FavoritesRecord {
                user_id: "u1".to_string(),
                captured_at: 0,
                favorites: Favorites::Tracks(vec![TrackPref {
                    id: "t".to_string(),
                    name: "t".to_string(),
                    artist_name: "a".to_string(),
                    album: "x".to_string(),
                    range: Tier::ShortTerm,
                    external_url: String::new(),
                    image_url: None,
                }]),
            },
            FavoritesRecord {
                user_id: "u2".to_string(),
                captured_at: 0,
                favorites: Favorites::Artists(vec![artist("a", Tier::ShortTerm)]),
            },
        ];

        let pools = pools_from_records(&records);
        assert_eq!(pools.short_term.len(), 2);
        assert!(pools.medium_term.is_empty());
        assert_eq!(pools.long_term.len(), 1);
    }

    #[tokio::test]
    async fn generate_reads_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = FavoritesStore::new(dir.path());
        store
            .save(&FavoritesRecord::new(
                "u1",
                Favorites::Artists(vec![
                    artist("a", Tier::ShortTerm),
                    artist("b", Tier::MediumTerm),
                    artist("c", Tier::LongTerm),
                ]),
            ))
            .await
            .unwrap();

        let blend = generate(&store, &EchoSource, &BlendSettings::default())
            .await
            .unwrap();

        assert_eq!(blend.artists.len(), 3);
        assert_eq!(blend.tracks.len(), 6);
        assert_eq!(blend.track_ids().len(), 6);
    }

    #[tokio::test]
    async fn empty_store_gives_empty_blend() {
        let dir = tempfile::tempdir().unwrap();
        let store = FavoritesStore::new(dir.path().join("users"));

        let blend = generate(&store, &EchoSource, &BlendSettings::default())
            .await
            .unwrap();

        assert!(blend.artists.is_empty());
        assert!(blend.tracks.is_empty());
    }
}
