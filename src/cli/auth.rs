use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{config::Settings, spotify, types::PkceToken};

pub async fn auth(settings: Settings, shared_state: Arc<Mutex<Option<PkceToken>>>) {
    spotify::auth::auth(settings, shared_state).await;
}
