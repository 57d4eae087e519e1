//! Configuration management for missionary.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory (`<data_local_dir>/missionary/.env`) and
//! then from a `.env` in the working directory. Only the Spotify client id is
//! required; everything else has a default.

use std::{env, path::PathBuf, str::FromStr};

use reqwest::Url;

use crate::error::{ConfigError, ConfigResult};

pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8080/auth/callback";
pub const DEFAULT_PLAYLIST_NAME: &str = "Your Missionary Blend";
pub const DEFAULT_PORT: u16 = 8080;

pub const DEFAULT_SCOPE: &[&str] = &[
    "user-read-currently-playing",
    "user-top-read",
    "app-remote-control",
    "user-modify-playback-state",
    "user-library-modify",
    "user-library-read",
    "user-read-playback-state",
    "playlist-modify-public",
    "playlist-modify-private",
];

/// Loads environment variables from `.env` files.
///
/// The data directory file is created lazily by the build script as
/// `.env.example`; a missing `.env` is not an error.
pub async fn load_env() -> ConfigResult<()> {
    let mut path = app_data_dir();
    path.push(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| ConfigError::LoadFailed(e.to_string()))?;
    }

    if dotenv::from_path(&path).is_err() {
        log::debug!("No env file at {}", path.display());
    }
    let _ = dotenv::dotenv();
    Ok(())
}

/// `<data_local_dir>/missionary`, or `./missionary` when the platform has none.
pub fn app_data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("missionary");
    path
}

/// Tunables of the blend pipeline and the favorites aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct BlendSettings {
    pub playlist_name: String,
    pub per_tier_target: usize,
    pub buffer_size: usize,
    pub tracks_per_artist: usize,
    pub per_tier_limit: usize,
}

impl Default for BlendSettings {
    fn default() -> Self {
        Self {
            playlist_name: DEFAULT_PLAYLIST_NAME.to_string(),
            per_tier_target: 5,
            buffer_size: 10,
            tracks_per_artist: 2,
            per_tier_limit: 5,
        }
    }
}

/// Runtime settings resolved from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub market: String,
    pub server_address: String,
    pub data_dir: PathBuf,
    pub blend: BlendSettings,
}

impl Settings {
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolves settings through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let client_id = lookup("SPOTIFY_API_AUTH_CLIENT_ID")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvironmentVariable {
                var_name: "SPOTIFY_API_AUTH_CLIENT_ID".to_string(),
            })?;

        let redirect_uri =
            lookup("SPOTIFY_API_REDIRECT_URI").unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string());
        let redirect = Url::parse(&redirect_uri).map_err(|_| ConfigError::InvalidValue {
            field: "SPOTIFY_API_REDIRECT_URI".to_string(),
            value: redirect_uri.clone(),
        })?;

        let server_address = match lookup("SERVER_ADDRESS") {
            Some(addr) => addr,
            None => {
                let port = match lookup("PORT") {
                    Some(raw) => parse_value::<u16>("PORT", &raw)?,
                    None => redirect.port().unwrap_or(DEFAULT_PORT),
                };
                format!("127.0.0.1:{port}")
            }
        };

        let defaults = BlendSettings::default();
        let blend = BlendSettings {
            playlist_name: lookup("BLEND_PLAYLIST_NAME").unwrap_or(defaults.playlist_name),
            per_tier_target: optional_value(
                &lookup,
                "BLEND_PER_TIER_TARGET",
                defaults.per_tier_target,
            )?,
            buffer_size: optional_value(&lookup, "BLEND_BUFFER_SIZE", defaults.buffer_size)?,
            tracks_per_artist: optional_value(
                &lookup,
                "BLEND_TRACKS_PER_ARTIST",
                defaults.tracks_per_artist,
            )?,
            per_tier_limit: optional_value(
                &lookup,
                "FAVORITES_PER_TIER_LIMIT",
                defaults.per_tier_limit,
            )?,
        };

        Ok(Self {
            client_id,
            redirect_uri,
            scope: lookup("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.join(" ")),
            auth_url: lookup("SPOTIFY_API_AUTH_URL")
                .unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: lookup("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            api_url: lookup("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            market: lookup("SPOTIFY_MARKET").unwrap_or_else(|| "US".to_string()),
            server_address,
            data_dir: lookup("MISSIONARY_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(app_data_dir),
            blend,
        })
    }

    /// Root directory of the favorites document store.
    pub fn store_dir(&self) -> PathBuf {
        self.data_dir.join("users")
    }

    /// Location of the cached OAuth token.
    pub fn token_path(&self) -> PathBuf {
        self.data_dir.join("cache").join("token.json")
    }

    /// Base URL the server is reachable at, used to open the browser.
    pub fn local_url(&self) -> String {
        format!("http://{}", self.server_address)
    }
}

fn parse_value<T: FromStr>(field: &str, raw: &str) -> ConfigResult<T> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
        field: field.to_string(),
        value: raw.to_string(),
    })
}

fn optional_value<T, F>(lookup: &F, field: &str, default: T) -> ConfigResult<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(field) {
        Some(raw) => parse_value(field, &raw),
        None => Ok(default),
    }
}

/// Print configuration template for environment variables
pub fn print_config_template() {
    println!("# missionary configuration template");
    println!("export SPOTIFY_API_AUTH_CLIENT_ID=\"your_spotify_client_id_here\"");
    println!("export SPOTIFY_API_REDIRECT_URI=\"{DEFAULT_REDIRECT_URI}\"");
    println!();
    println!("# Optional configuration (with defaults):");
    println!("export SPOTIFY_MARKET=\"US\"");
    println!("export BLEND_PLAYLIST_NAME=\"{DEFAULT_PLAYLIST_NAME}\"");
    println!("export BLEND_PER_TIER_TARGET=\"5\"");
    println!("export BLEND_BUFFER_SIZE=\"10\"");
    println!("export BLEND_TRACKS_PER_ARTIST=\"2\"");
    println!("export FAVORITES_PER_TIER_LIMIT=\"5\"");
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn settings_from(pairs: &[(&str, &str)]) -> ConfigResult<Settings> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_only_client_id_is_set() {
        let settings = settings_from(&[("SPOTIFY_API_AUTH_CLIENT_ID", "abc")]).unwrap();

        assert_eq!(settings.client_id, "abc");
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.server_address, "127.0.0.1:8080");
        assert_eq!(settings.blend, BlendSettings::default());
        assert!(settings.scope.contains("user-top-read"));
    }

    #[test]
    fn missing_client_id_is_reported() {
        let err = settings_from(&[]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingEnvironmentVariable { ref var_name } if var_name == "SPOTIFY_API_AUTH_CLIENT_ID"
        ));
    }

    #[test]
    fn port_comes_from_redirect_uri_unless_overridden() {
        let settings = settings_from(&[
            ("SPOTIFY_API_AUTH_CLIENT_ID", "abc"),
            ("SPOTIFY_API_REDIRECT_URI", "http://127.0.0.1:8888/auth/callback"),
        ])
        .unwrap();
        assert_eq!(settings.server_address, "127.0.0.1:8888");

        let settings = settings_from(&[
            ("SPOTIFY_API_AUTH_CLIENT_ID", "abc"),
            ("SPOTIFY_API_REDIRECT_URI", "http://127.0.0.1:8888/auth/callback"),
            ("PORT", "5000"),
        ])
        .unwrap();
        assert_eq!(settings.server_address, "127.0.0.1:5000");
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let err = settings_from(&[
            ("SPOTIFY_API_AUTH_CLIENT_ID", "abc"),
            ("BLEND_BUFFER_SIZE", "ten"),
        ])
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "BLEND_BUFFER_SIZE"));
    }

    #[test]
    fn data_dir_override_drives_paths() {
        let settings = settings_from(&[
            ("SPOTIFY_API_AUTH_CLIENT_ID", "abc"),
            ("MISSIONARY_DATA_DIR", "/tmp/missionary-test"),
        ])
        .unwrap();
        assert_eq!(settings.store_dir(), PathBuf::from("/tmp/missionary-test/users"));
        assert_eq!(
            settings.token_path(),
            PathBuf::from("/tmp/missionary-test/cache/token.json")
        );
    }
}
