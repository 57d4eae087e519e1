use std::fmt;

use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub token: Option<Token>,
}

/// Raw response of the accounts service token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

/// Recency bucket of a listening preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    ShortTerm,
    MediumTerm,
    LongTerm,
}

impl Tier {
    /// Processing order used everywhere tiers are walked.
    pub const ALL: [Tier; 3] = [Tier::ShortTerm, Tier::MediumTerm, Tier::LongTerm];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::ShortTerm => "short_term",
            Tier::MediumTerm => "medium_term",
            Tier::LongTerm => "long_term",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::ShortTerm => "Last 4 weeks",
            Tier::MediumTerm => "Last 6 months",
            Tier::LongTerm => "All time",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Three ordered sequences, one per tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierBuckets<T> {
    pub short_term: Vec<T>,
    pub medium_term: Vec<T>,
    pub long_term: Vec<T>,
}

impl<T> Default for TierBuckets<T> {
    fn default() -> Self {
        Self {
            short_term: Vec::new(),
            medium_term: Vec::new(),
            long_term: Vec::new(),
        }
    }
}

impl<T> TierBuckets<T> {
    pub fn get(&self, tier: Tier) -> &Vec<T> {
        match tier {
            Tier::ShortTerm => &self.short_term,
            Tier::MediumTerm => &self.medium_term,
            Tier::LongTerm => &self.long_term,
        }
    }

    pub fn get_mut(&mut self, tier: Tier) -> &mut Vec<T> {
        match tier {
            Tier::ShortTerm => &mut self.short_term,
            Tier::MediumTerm => &mut self.medium_term,
            Tier::LongTerm => &mut self.long_term,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tier, &Vec<T>)> {
        Tier::ALL.into_iter().map(move |tier| (tier, self.get(tier)))
    }

    pub fn len(&self) -> usize {
        self.short_term.len() + self.medium_term.len() + self.long_term.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A stored top-artist snapshot entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistPref {
    pub id: String,
    pub name: String,
    pub range: Tier,
    pub popularity: u32,
    pub external_url: String,
}

impl ArtistPref {
    pub fn from_artist(artist: &FullArtist, range: Tier) -> Self {
        Self {
            id: artist.id.clone(),
            name: artist.name.clone(),
            range,
            popularity: artist.popularity,
            external_url: artist.external_urls.spotify.clone().unwrap_or_default(),
        }
    }
}

/// A stored top-track snapshot entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPref {
    pub id: String,
    pub name: String,
    pub artist_name: String,
    pub album: String,
    pub range: Tier,
    pub external_url: String,
    pub image_url: Option<String>,
}

impl TrackPref {
    pub fn from_track(track: &FullTrack, range: Tier) -> Self {
        Self {
            id: track.id.clone(),
            name: track.name.clone(),
            artist_name: track.primary_artist_name().to_string(),
            album: track.album.name.clone(),
            range,
            external_url: track.external_urls.spotify.clone().unwrap_or_default(),
            image_url: track.album.first_image_url(),
        }
    }
}

/// A catalog track that is a blend candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRef {
    pub id: String,
    pub name: String,
    pub artist_name: String,
    pub uri: String,
    pub external_url: Option<String>,
    pub image_url: Option<String>,
}

impl From<&FullTrack> for TrackRef {
    fn from(track: &FullTrack) -> Self {
        Self {
            id: track.id.clone(),
            name: track.name.clone(),
            artist_name: track.primary_artist_name().to_string(),
            uri: track.uri.clone(),
            external_url: track.external_urls.spotify.clone(),
            image_url: track.album.first_image_url(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FavoritesKind {
    Artists,
    Tracks,
}

impl FavoritesKind {
    pub fn document_name(&self) -> &'static str {
        match self {
            FavoritesKind::Artists => "top_artists",
            FavoritesKind::Tracks => "top_tracks",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum Favorites {
    Artists(Vec<ArtistPref>),
    Tracks(Vec<TrackPref>),
}

impl Favorites {
    pub fn kind(&self) -> FavoritesKind {
        match self {
            Favorites::Artists(_) => FavoritesKind::Artists,
            Favorites::Tracks(_) => FavoritesKind::Tracks,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Favorites::Artists(items) => items.len(),
            Favorites::Tracks(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One stored favorites document, owned by `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoritesRecord {
    pub user_id: String,
    pub captured_at: i64,
    pub favorites: Favorites,
}

impl FavoritesRecord {
    pub fn new(user_id: impl Into<String>, favorites: Favorites) -> Self {
        Self {
            user_id: user_id.into(),
            captured_at: chrono::Utc::now().timestamp(),
            favorites,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub user_id: String,
    pub display_name: String,
    pub artists: TierBuckets<ArtistPref>,
    pub tracks: TierBuckets<TrackPref>,
}

#[derive(Tabled)]
pub struct UserTableRow {
    pub user: String,
    pub short_term: String,
    pub medium_term: String,
    pub long_term: String,
}

#[derive(Tabled)]
pub struct BlendTableRow {
    pub track: String,
    pub artist: String,
    pub uri: String,
}

/// Sampled artists plus the shuffled candidate tracks built from them.
#[derive(Debug, Clone, Default)]
pub struct Blend {
    pub artists: Vec<ArtistPref>,
    pub tracks: Vec<TrackRef>,
}

impl Blend {
    pub fn track_ids(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.id.clone()).collect()
    }
}

// Spotify Web API payloads

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Followers {
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyUser {
    pub id: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub followers: Followers,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    pub country: Option<String>,
    pub email: Option<String>,
    pub product: Option<String>,
}

impl SpotifyUser {
    /// Display name, falling back to the user id when the profile has none.
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullArtist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub popularity: u32,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleArtist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleAlbum {
    pub name: String,
    #[serde(default)]
    pub images: Vec<Image>,
}

impl SimpleAlbum {
    pub fn first_image_url(&self) -> Option<String> {
        self.images.first().map(|i| i.url.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullTrack {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub artists: Vec<SimpleArtist>,
    pub album: SimpleAlbum,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

impl FullTrack {
    pub fn primary_artist_name(&self) -> &str {
        self.artists.first().map(|a| a.name.as_str()).unwrap_or("")
    }

    pub fn primary_artist_id(&self) -> Option<&str> {
        self.artists.first().and_then(|a| a.id.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistTopTracksResponse {
    pub tracks: Vec<FullTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentlyPlaying {
    pub item: Option<FullTrack>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaylistTracksRef {
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner: PlaylistOwner,
    pub images: Option<Vec<Image>>,
    #[serde(default)]
    pub tracks: PlaylistTracksRef,
    #[serde(default)]
    pub external_urls: ExternalUrls,
}

impl Playlist {
    pub fn first_image_url(&self) -> Option<&str> {
        self.images
            .as_ref()
            .and_then(|images| images.first())
            .map(|i| i.url.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
    pub collaborative: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

/// The playlist a blend was written to.
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistRef {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
    pub replaced: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_serializes_snake_case() {
        let json = serde_json::to_string(&Tier::MediumTerm).unwrap();
        assert_eq!(json, "\"medium_term\"");
        let tier: Tier = serde_json::from_str("\"long_term\"").unwrap();
        assert_eq!(tier, Tier::LongTerm);
    }

    #[test]
    fn favorites_record_uses_kind_and_items() {
        let record = FavoritesRecord {
            user_id: "alice".to_string(),
            captured_at: 1_700_000_000,
            favorites: Favorites::Artists(vec![ArtistPref {
                id: "a1".to_string(),
                name: "Artist One".to_string(),
                range: Tier::ShortTerm,
                popularity: 42,
                external_url: "https://open.spotify.com/artist/a1".to_string(),
            }]),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["user_id"], "alice");
        assert_eq!(value["favorites"]["kind"], "artists");
        assert_eq!(value["favorites"]["items"][0]["range"], "short_term");

        let back: FavoritesRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back.favorites.kind(), FavoritesKind::Artists);
    }

    #[test]
    fn full_track_converts_to_refs() {
        let track: FullTrack = serde_json::from_value(serde_json::json!({
            "id": "t1",
            "name": "Song",
            "uri": "spotify:track:t1",
            "artists": [{"id": "a1", "name": "Artist One"}, {"id": "a2", "name": "Guest"}],
            "album": {"name": "Album", "images": [{"url": "https://i.scdn.co/image/x"}]},
            "external_urls": {"spotify": "https://open.spotify.com/track/t1"}
        }))
        .unwrap();

        let track_ref = TrackRef::from(&track);
        assert_eq!(track_ref.artist_name, "Artist One");
        assert_eq!(track_ref.uri, "spotify:track:t1");

        let pref = TrackPref::from_track(&track, Tier::LongTerm);
        assert_eq!(pref.album, "Album");
        assert_eq!(pref.range, Tier::LongTerm);
        assert_eq!(pref.image_url.as_deref(), Some("https://i.scdn.co/image/x"));
    }

    #[test]
    fn user_name_falls_back_to_id() {
        let user: SpotifyUser = serde_json::from_value(serde_json::json!({
            "id": "bob",
            "display_name": null
        }))
        .unwrap();
        assert_eq!(user.name(), "bob");
    }

    #[test]
    fn tier_buckets_walk_in_tier_order() {
        let mut buckets: TierBuckets<u32> = TierBuckets::default();
        buckets.get_mut(Tier::LongTerm).push(3);
        buckets.get_mut(Tier::ShortTerm).push(1);
        let tiers: Vec<Tier> = buckets.iter().map(|(tier, _)| tier).collect();
        assert_eq!(tiers, Tier::ALL.to_vec());
        assert_eq!(buckets.len(), 2);
    }
}
