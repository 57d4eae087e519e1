//! # CLI Module
//!
//! Command implementations of the `missionary` binary. Each command loads
//! what it needs from [`Settings`], talks to Spotify through
//! [`crate::spotify::Catalog`] and reports progress with the crate's colored
//! output macros.
//!
//! ## Commands
//!
//! - [`auth`] runs the OAuth 2.0 PKCE login through the local server.
//! - [`serve`] runs the web application.
//! - [`snapshot`] saves the signed-in user's top artists and tracks.
//! - [`users`] prints everyone's stored favorites.
//! - [`blend`] samples a blend playlist and optionally saves it.
//!
//! ## Usage
//!
//! ```bash
//! missionary auth              # sign in once
//! missionary snapshot          # store your favorites
//! missionary blend --save      # write "Your Missionary Blend"
//! ```

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{config::Settings, error, management::TokenManager, spotify::Catalog};

mod auth;
mod blend;
mod serve;
mod snapshot;
mod users;

pub use auth::auth;
pub use blend::blend;
pub use serve::serve;
pub use snapshot::snapshot;
pub use users::users;

/// Catalog for the cached token. Exits when nobody is signed in.
async fn catalog(settings: &Settings) -> Catalog {
    let mut token_mgr = match TokenManager::load(settings.token_path()).await {
        Ok(manager) => manager,
        Err(e) => error!(
            "Failed to load token. Please run missionary auth\n Error: {}",
            e
        ),
    };

    match token_mgr.get_valid_token(settings).await {
        Ok(token) => Catalog::new(settings, token),
        Err(e) => error!(
            "Failed to refresh token. Please run missionary auth\n Error: {}",
            e
        ),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}
