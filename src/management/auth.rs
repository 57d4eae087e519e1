use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::{
    config::Settings,
    error::{SpotifyResult, StoreError, StoreResult},
    spotify,
    types::Token,
};

/// Seconds before expiry at which a token is already treated as stale.
const EXPIRY_MARGIN_SECS: u64 = 240;

pub struct TokenManager {
    path: PathBuf,
    token: Token,
}

impl TokenManager {
    pub fn new(path: impl Into<PathBuf>, token: Token) -> Self {
        TokenManager {
            path: path.into(),
            token,
        }
    }

    pub async fn load(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();
        let content = async_fs::read_to_string(&path).await?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self { path, token })
    }

    pub async fn persist(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Removes a cached token. A missing file counts as success.
    pub async fn clear(path: &Path) -> StoreResult<()> {
        match async_fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    pub async fn get_valid_token(&mut self, settings: &Settings) -> SpotifyResult<String> {
        if self.is_expired() {
            let refreshed =
                spotify::auth::refresh_token(settings, &self.token.refresh_token).await?;
            self.token = refreshed;
            if let Err(e) = self.persist().await {
                log::warn!("Failed to persist refreshed token: {}", e);
            }
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now >= (self.token.obtained_at + self.token.expires_in).saturating_sub(EXPIRY_MARGIN_SECS)
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(obtained_at: u64, expires_in: u64) -> Token {
        Token {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            scope: "user-top-read".to_string(),
            expires_in,
            obtained_at,
        }
    }

    #[test]
    fn fresh_token_is_not_expired() {
        let now = Utc::now().timestamp() as u64;
        let manager = TokenManager::new("token.json", token(now, 3600));
        assert!(!manager.is_expired());
    }

    #[test]
    fn token_inside_margin_is_expired() {
        let now = Utc::now().timestamp() as u64;
        let manager = TokenManager::new("token.json", token(now - 3500, 3600));
        assert!(manager.is_expired());
    }

    #[tokio::test]
    async fn persist_then_load_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache").join("token.json");

        TokenManager::new(&path, token(10, 3600)).persist().await.unwrap();
        let loaded = TokenManager::load(&path).await.unwrap();
        assert_eq!(loaded.current_token().refresh_token, "refresh");

        TokenManager::clear(&path).await.unwrap();
        assert!(TokenManager::load(&path).await.is_err());
        TokenManager::clear(&path).await.unwrap();
    }
}
