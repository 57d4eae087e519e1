//! # Spotify integration
//!
//! Thin client over the Spotify accounts service and Web API.
//!
//! - [`auth`]: PKCE authorization URL, code exchange, token refresh, and the
//!   interactive CLI login flow.
//! - [`Catalog`]: bearer-authenticated Web API calls, split by concern across
//!   [`me`], [`top`], [`player`] and [`playlist`].
//!
//! Every request goes through [`Catalog::execute`], which retries a bounded
//! number of times on `502 Bad Gateway` and on `429 Too Many Requests` when the
//! advertised `Retry-After` is reasonable.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    config::Settings,
    error::{SpotifyError, SpotifyResult},
};

pub mod auth;
pub mod me;
pub mod player;
pub mod playlist;
pub mod top;

const MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(10);
const MAX_RETRY_AFTER_SECS: u64 = 120;

/// Authenticated handle on the Web API for one access token.
#[derive(Debug, Clone)]
pub struct Catalog {
    client: Client,
    api_url: String,
    market: String,
    token: String,
    retry_delay: Duration,
}

impl Catalog {
    pub fn new(settings: &Settings, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            market: settings.market.clone(),
            token: token.into(),
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Overrides the pause before retrying a `502 Bad Gateway`.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Appends percent-encoded path segments to the API base URL.
    fn segment_url(&self, segments: &[&str]) -> SpotifyResult<String> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| SpotifyError::InvalidUrl(format!("{}: {}", self.api_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| SpotifyError::InvalidUrl(self.api_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url.into())
    }

    /// Sends a request built by `build`, retrying transient failures.
    async fn execute<F>(&self, build: F) -> SpotifyResult<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let response = build(&self.client)
                .bearer_auth(&self.token)
                .send()
                .await?;

            let status = response.status();
            if status.is_success() {
                return Ok(response);
            }

            if status == StatusCode::BAD_GATEWAY && attempt < MAX_ATTEMPTS {
                log::warn!("Spotify answered 502, retrying in {:?}", self.retry_delay);
                sleep(self.retry_delay).await;
                continue;
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(0);
                if retry_after <= MAX_RETRY_AFTER_SECS && attempt < MAX_ATTEMPTS {
                    log::warn!("Rate limited by Spotify, retrying in {}s", retry_after);
                    sleep(Duration::from_secs(retry_after)).await;
                    continue;
                }
                return Err(SpotifyError::RateLimitExceeded {
                    retry_after_secs: retry_after,
                });
            }

            let message = response.text().await.unwrap_or_default();
            return Err(SpotifyError::ApiRequestFailed {
                status: status.as_u16(),
                message,
            });
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> SpotifyResult<T> {
        let url = self.url(path);
        let response = self.execute(|client| client.get(&url)).await?;
        Ok(response.json::<T>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(api_url: &str) -> Catalog {
        let settings = Settings::from_lookup(|key| match key {
            "SPOTIFY_API_AUTH_CLIENT_ID" => Some("client".to_string()),
            "SPOTIFY_API_URL" => Some(api_url.to_string()),
            _ => None,
        })
        .unwrap();
        Catalog::new(&settings, "token")
    }

    #[test]
    fn segment_url_keeps_base_path_and_encodes_segments() {
        let catalog = catalog("https://api.spotify.com/v1");
        let url = catalog
            .segment_url(&["users", "old school/dj", "playlists"])
            .unwrap();
        assert_eq!(
            url,
            "https://api.spotify.com/v1/users/old%20school%2Fdj/playlists"
        );
    }

    #[test]
    fn segment_url_on_bare_host() {
        let catalog = catalog("http://127.0.0.1:8080/");
        assert_eq!(
            catalog.segment_url(&["users", "alice"]).unwrap(),
            "http://127.0.0.1:8080/users/alice"
        );
    }
}
