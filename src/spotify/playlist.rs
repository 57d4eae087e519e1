use crate::{
    error::SpotifyResult,
    types::{
        CreatePlaylistRequest, Paging, Playlist, PlaylistRef, PlaylistTracksRequest,
        SnapshotResponse,
    },
    utils,
};

use super::Catalog;

/// The Web API accepts at most this many URIs per tracks request.
const TRACKS_PER_REQUEST: usize = 100;

impl Catalog {
    /// First page of the current user's playlists.
    pub async fn playlists(&self) -> SpotifyResult<Vec<Playlist>> {
        let page: Paging<Playlist> = self.get_json("/me/playlists?limit=50").await?;
        Ok(page.items)
    }

    /// Finds a playlist owned by `user_id` whose name matches exactly.
    pub async fn find_playlist_by_name(
        &self,
        user_id: &str,
        name: &str,
    ) -> SpotifyResult<Option<Playlist>> {
        let mut next = Some(self.url("/me/playlists?limit=50"));

        while let Some(url) = next {
            let response = self.execute(|client| client.get(&url)).await?;
            let page = response.json::<Paging<Playlist>>().await?;

            if let Some(found) = page
                .items
                .into_iter()
                .find(|p| p.name == name && p.owner.id == user_id)
            {
                return Ok(Some(found));
            }
            next = page.next;
        }

        Ok(None)
    }

    pub async fn create_playlist(&self, user_id: &str, name: &str) -> SpotifyResult<Playlist> {
        let url = self.segment_url(&["users", user_id, "playlists"])?;
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: "Sampled from everyone's top artists.".to_string(),
            public: false,
            collaborative: false,
        };

        let response = self.execute(|client| client.post(&url).json(&body)).await?;
        Ok(response.json::<Playlist>().await?)
    }

    /// Replaces the playlist content with `uris`.
    pub async fn replace_tracks(&self, playlist_id: &str, uris: &[String]) -> SpotifyResult<()> {
        let url = self.url(&format!("/playlists/{}/tracks", playlist_id));
        let (first, rest) = uris.split_at(uris.len().min(TRACKS_PER_REQUEST));
        let body = PlaylistTracksRequest {
            uris: first.to_vec(),
        };

        let response = self.execute(|client| client.put(&url).json(&body)).await?;
        response.json::<SnapshotResponse>().await?;

        self.add_tracks(playlist_id, rest).await
    }

    pub async fn add_tracks(&self, playlist_id: &str, uris: &[String]) -> SpotifyResult<()> {
        let url = self.url(&format!("/playlists/{}/tracks", playlist_id));

        for chunk in uris.chunks(TRACKS_PER_REQUEST) {
            let body = PlaylistTracksRequest {
                uris: chunk.to_vec(),
            };
            let response = self.execute(|client| client.post(&url).json(&body)).await?;
            response.json::<SnapshotResponse>().await?;
        }

        Ok(())
    }

    /// Writes `track_ids` to the user's playlist called `name`, creating it when missing.
    pub async fn upsert_playlist(
        &self,
        user_id: &str,
        name: &str,
        track_ids: &[String],
    ) -> SpotifyResult<PlaylistRef> {
        let uris: Vec<String> = track_ids
            .iter()
            .map(|id| utils::track_id_to_uri(id))
            .collect();

        let (playlist, replaced) = match self.find_playlist_by_name(user_id, name).await? {
            Some(existing) => {
                self.replace_tracks(&existing.id, &uris).await?;
                (existing, true)
            }
            None => {
                let created = self.create_playlist(user_id, name).await?;
                self.add_tracks(&created.id, &uris).await?;
                (created, false)
            }
        };

        log::info!(
            "{} playlist '{}' with {} tracks",
            if replaced { "Replaced" } else { "Created" },
            playlist.name,
            uris.len()
        );

        Ok(PlaylistRef {
            id: playlist.id,
            name: playlist.name,
            url: playlist.external_urls.spotify,
            replaced,
        })
    }
}
