use crate::{
    error::BlendResult,
    types::{ArtistPref, Favorites, FavoritesRecord, TierBuckets, TrackPref, UserSummary},
};

use super::DisplayNameLookup;

/// Groups stored favorites by owner and resolves each owner's display name.
///
/// Users appear in the order their first record appears. Each tier keeps its
/// stored order and is cut to at most `per_tier_limit` entries. A user with
/// only one kind of document gets empty buckets for the other kind.
pub async fn aggregate<L: DisplayNameLookup>(
    records: &[FavoritesRecord],
    per_tier_limit: usize,
    lookup: &L,
) -> BlendResult<Vec<UserSummary>> {
    let mut grouped: Vec<(String, TierBuckets<ArtistPref>, TierBuckets<TrackPref>)> = Vec::new();

    for record in records {
        let index = match grouped.iter().position(|(id, _, _)| *id == record.user_id) {
            Some(index) => index,
            None => {
                grouped.push((
                    record.user_id.clone(),
                    TierBuckets::default(),
                    TierBuckets::default(),
                ));
                grouped.len() - 1
            }
        };

        let (_, artists, tracks) = &mut grouped[index];
        match &record.favorites {
            Favorites::Artists(items) => {
                for artist in items {
                    artists.get_mut(artist.range).push(artist.clone());
                }
            }
            Favorites::Tracks(items) => {
                for track in items {
                    tracks.get_mut(track.range).push(track.clone());
                }
            }
        }
    }

    let mut summaries = Vec::with_capacity(grouped.len());
    for (user_id, mut artists, mut tracks) in grouped {
        truncate_buckets(&mut artists, per_tier_limit);
        truncate_buckets(&mut tracks, per_tier_limit);

        let display_name = lookup.display_name(&user_id).await?;
        summaries.push(UserSummary {
            user_id,
            display_name,
            artists,
            tracks,
        });
    }

    Ok(summaries)
}

fn truncate_buckets<T>(buckets: &mut TierBuckets<T>, limit: usize) {
    buckets.short_term.truncate(limit);
    buckets.medium_term.truncate(limit);
    buckets.long_term.truncate(limit);
}
