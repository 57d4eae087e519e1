use crate::{
    blend::DisplayNameLookup,
    error::{BlendError, BlendResult, SpotifyError, SpotifyResult},
    types::SpotifyUser,
};

use super::Catalog;

impl Catalog {
    /// `GET /me`
    pub async fn current_user(&self) -> SpotifyResult<SpotifyUser> {
        self.get_json("/me").await
    }

    /// `GET /users/{id}`
    pub async fn user_profile(&self, user_id: &str) -> SpotifyResult<SpotifyUser> {
        let url = self.segment_url(&["users", user_id])?;
        let response = self.execute(|client| client.get(&url)).await?;
        Ok(response.json::<SpotifyUser>().await?)
    }
}

impl DisplayNameLookup for Catalog {
    async fn display_name(&self, user_id: &str) -> BlendResult<String> {
        match self.user_profile(user_id).await {
            Ok(user) => Ok(user.name().to_string()),
            Err(SpotifyError::ApiRequestFailed { status: 400 | 404, .. }) => {
                Err(BlendError::UnknownUser {
                    user_id: user_id.to_string(),
                })
            }
            Err(e) => Err(BlendError::Catalog(e)),
        }
    }
}
