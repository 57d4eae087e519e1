use reqwest::StatusCode;

use crate::{error::SpotifyResult, types::CurrentlyPlaying};

use super::Catalog;

impl Catalog {
    /// `GET /me/player/currently-playing`; `None` when nothing is playing.
    pub async fn currently_playing(&self) -> SpotifyResult<Option<CurrentlyPlaying>> {
        let url = self.url("/me/player/currently-playing");
        let response = self.execute(|client| client.get(&url)).await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let playing = response.json::<CurrentlyPlaying>().await?;
        Ok(playing.item.is_some().then_some(playing))
    }
}
