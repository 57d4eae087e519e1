use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{
    config::Settings,
    error, info,
    server::{AppState, start_api_server},
    warning,
};

pub async fn serve(settings: Settings, open: bool) {
    let url = settings.local_url();
    let state = AppState::new(settings, Arc::new(Mutex::new(None)));

    info!("Serving missionary at {}", url);
    if open && webbrowser::open(&url).is_err() {
        warning!("Failed to open browser. Please navigate to {} manually.", url);
    }

    if let Err(e) = start_api_server(state).await {
        error!("Server stopped. Err: {}", e);
    }
}
