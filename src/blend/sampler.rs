use std::collections::{HashSet, VecDeque};

use rand::{
    Rng,
    seq::{IndexedRandom, SliceRandom},
};

use crate::{
    error::{BlendError, BlendResult},
    types::{ArtistPref, Tier, TierBuckets, TrackRef},
};

use super::TrackSource;

/// Draws up to `per_tier_target` globally unique artists from each tier.
///
/// Each tier gets a random buffer of `min(buffer_size, |pool|)` artists. Tiers
/// are drained in [`Tier::ALL`] order; an artist whose id was already taken by
/// an earlier pick is discarded. A tier that runs dry contributes fewer
/// artists and is not topped up from another tier.
pub fn select_artists<R: Rng>(
    pools: &TierBuckets<ArtistPref>,
    per_tier_target: usize,
    buffer_size: usize,
    rng: &mut R,
) -> Vec<ArtistPref> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut selected = Vec::new();

    for tier in Tier::ALL {
        let mut buffer = sample_buffer(pools.get(tier), buffer_size, rng);
        let mut taken = 0;

        while taken < per_tier_target {
            let Some(artist) = buffer.pop_front() else {
                break;
            };
            if seen.insert(artist.id.as_str()) {
                selected.push(artist.clone());
                taken += 1;
            }
        }

        if taken < per_tier_target {
            log::debug!(
                "Tier {} contributed {} of {} artists",
                tier,
                taken,
                per_tier_target
            );
        }
    }

    selected
}

fn sample_buffer<'a, R: Rng>(
    pool: &'a [ArtistPref],
    buffer_size: usize,
    rng: &mut R,
) -> VecDeque<&'a ArtistPref> {
    let amount = buffer_size.min(pool.len());
    let mut buffer: Vec<&ArtistPref> = pool.choose_multiple(rng, amount).collect();
    buffer.shuffle(rng);
    buffer.into()
}

/// Fetches top tracks for every selected artist, samples `tracks_per_artist`
/// of each, and shuffles the combined list.
///
/// Fails with [`BlendError::InsufficientTrackFetch`] when an artist has fewer
/// top tracks than requested.
pub async fn build_track_candidates<S, R>(
    selected: &[ArtistPref],
    tracks_per_artist: usize,
    source: &S,
    rng: &mut R,
) -> BlendResult<Vec<TrackRef>>
where
    S: TrackSource,
    R: Rng,
{
    let mut candidates = Vec::with_capacity(selected.len() * tracks_per_artist);

    for artist in selected {
        let tracks = source.fetch_top_tracks(&artist.id).await?;
        if tracks.len() < tracks_per_artist {
            return Err(BlendError::InsufficientTrackFetch {
                artist_id: artist.id.clone(),
                required: tracks_per_artist,
                found: tracks.len(),
            });
        }

        candidates.extend(tracks.choose_multiple(rng, tracks_per_artist).cloned());
    }

    candidates.shuffle(rng);
    Ok(candidates)
}
