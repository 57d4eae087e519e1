use crate::{
    blend::TrackSource,
    error::{BlendResult, SpotifyResult},
    types::{ArtistTopTracksResponse, FullArtist, FullTrack, Paging, Tier, TierBuckets, TrackRef},
};

use super::Catalog;

/// Page size used for every top-items request.
pub const TOP_ITEMS_LIMIT: u32 = 50;

impl Catalog {
    /// `GET /me/top/artists` for one time range.
    pub async fn top_artists(&self, tier: Tier, limit: u32) -> SpotifyResult<Vec<FullArtist>> {
        let page: Paging<FullArtist> = self
            .get_json(&format!(
                "/me/top/artists?time_range={tier}&limit={limit}",
                tier = tier.as_str(),
                limit = limit
            ))
            .await?;
        Ok(page.items)
    }

    /// `GET /me/top/tracks` for one time range.
    pub async fn top_tracks(&self, tier: Tier, limit: u32) -> SpotifyResult<Vec<FullTrack>> {
        let page: Paging<FullTrack> = self
            .get_json(&format!(
                "/me/top/tracks?time_range={tier}&limit={limit}",
                tier = tier.as_str(),
                limit = limit
            ))
            .await?;
        Ok(page.items)
    }

    pub async fn top_artists_by_tier(&self) -> SpotifyResult<TierBuckets<FullArtist>> {
        let mut buckets = TierBuckets::default();
        for tier in Tier::ALL {
            *buckets.get_mut(tier) = self.top_artists(tier, TOP_ITEMS_LIMIT).await?;
        }
        Ok(buckets)
    }

    pub async fn top_tracks_by_tier(&self) -> SpotifyResult<TierBuckets<FullTrack>> {
        let mut buckets = TierBuckets::default();
        for tier in Tier::ALL {
            *buckets.get_mut(tier) = self.top_tracks(tier, TOP_ITEMS_LIMIT).await?;
        }
        Ok(buckets)
    }

    /// `GET /artists/{id}/top-tracks` in the configured market.
    pub async fn artist_top_tracks(&self, artist_id: &str) -> SpotifyResult<Vec<FullTrack>> {
        let response: ArtistTopTracksResponse = self
            .get_json(&format!(
                "/artists/{id}/top-tracks?market={market}",
                id = artist_id,
                market = self.market
            ))
            .await?;
        Ok(response.tracks)
    }
}

impl TrackSource for Catalog {
    async fn fetch_top_tracks(&self, artist_id: &str) -> BlendResult<Vec<TrackRef>> {
        let tracks = self.artist_top_tracks(artist_id).await?;
        Ok(tracks.iter().map(TrackRef::from).collect())
    }
}
