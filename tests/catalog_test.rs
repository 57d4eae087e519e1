//! Catalog calls against a local stand-in for the Spotify Web API.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use missionary::{
    blend::DisplayNameLookup,
    config::Settings,
    error::{BlendError, SpotifyError},
    spotify::Catalog,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

const BLEND_NAME: &str = "Your Missionary Blend";

#[derive(Clone, Default)]
struct FakeSpotify {
    base: String,
    writes: Arc<Mutex<Vec<String>>>,
    playlist_pages: Arc<Vec<Vec<Value>>>,
    me_hits: Arc<AtomicUsize>,
    bad_gateways: Arc<AtomicUsize>,
    rate_limits: Arc<AtomicUsize>,
}

impl FakeSpotify {
    fn record(&self, call: String) {
        self.writes.lock().unwrap().push(call);
    }

    fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

fn take_one(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

fn playlist(id: &str, name: &str, owner: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "owner": { "id": owner },
        "tracks": { "total": 0 },
        "external_urls": { "spotify": format!("https://open.spotify.com/playlist/{id}") },
    })
}

fn track_ids(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("t{i}")).collect()
}

async fn me(State(fake): State<FakeSpotify>) -> Response {
    fake.me_hits.fetch_add(1, Ordering::SeqCst);
    if take_one(&fake.rate_limits) {
        return (StatusCode::TOO_MANY_REQUESTS, [(header::RETRY_AFTER, "0")]).into_response();
    }
    if take_one(&fake.bad_gateways) {
        return StatusCode::BAD_GATEWAY.into_response();
    }
    Json(json!({ "id": "alice", "display_name": "Alice" })).into_response()
}

async fn user(Path(user_id): Path<String>) -> Response {
    if user_id == "ghost" {
        return (StatusCode::NOT_FOUND, "No such user").into_response();
    }
    Json(json!({ "id": user_id, "display_name": format!("Name of {user_id}") })).into_response()
}

async fn my_playlists(
    State(fake): State<FakeSpotify>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let page: usize = params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(0);
    let items = fake.playlist_pages.get(page).cloned().unwrap_or_default();
    let next = (page + 1 < fake.playlist_pages.len())
        .then(|| format!("{}/me/playlists?page={}", fake.base, page + 1));

    Json(json!({ "items": items, "next": next }))
}

async fn create_playlist(
    State(fake): State<FakeSpotify>,
    Path(user_id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let name = body["name"].as_str().unwrap_or_default().to_string();
    fake.record(format!("CREATE {user_id} {name}"));
    Json(playlist("p2", &name, &user_id))
}

fn tracks_call(verb: &str, playlist_id: &str, body: &Value) -> String {
    let uris = body["uris"].as_array().cloned().unwrap_or_default();
    let first = uris.first().and_then(|u| u.as_str()).unwrap_or_default();
    format!("{verb} {playlist_id} {} {first}", uris.len())
}

async fn replace_tracks(
    State(fake): State<FakeSpotify>,
    Path(playlist_id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    fake.record(tracks_call("PUT", &playlist_id, &body));
    Json(json!({ "snapshot_id": "snap" }))
}

async fn add_tracks(
    State(fake): State<FakeSpotify>,
    Path(playlist_id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    fake.record(tracks_call("POST", &playlist_id, &body));
    Json(json!({ "snapshot_id": "snap" }))
}

async fn currently_playing() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Serves the fake on an ephemeral port and returns a catalog pointed at it.
async fn start(pages: Vec<Vec<Value>>) -> (Catalog, FakeSpotify) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let fake = FakeSpotify {
        base: base.clone(),
        playlist_pages: Arc::new(pages),
        ..FakeSpotify::default()
    };

    let app = Router::new()
        .route("/me", get(me))
        .route("/me/playlists", get(my_playlists))
        .route("/me/player/currently-playing", get(currently_playing))
        .route("/users/{user_id}", get(user))
        .route("/users/{user_id}/playlists", post(create_playlist))
        .route(
            "/playlists/{playlist_id}/tracks",
            post(add_tracks).put(replace_tracks),
        )
        .with_state(fake.clone());

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let settings = Settings::from_lookup(|key| match key {
        "SPOTIFY_API_AUTH_CLIENT_ID" => Some("test-client".to_string()),
        "SPOTIFY_API_URL" => Some(base.clone()),
        _ => None,
    })
    .unwrap();
    let catalog = Catalog::new(&settings, "access").with_retry_delay(Duration::from_millis(10));

    (catalog, fake)
}

#[tokio::test]
async fn test_upsert_replaces_existing_playlist_in_chunks() {
    let (catalog, fake) = start(vec![
        vec![playlist("p0", "Road trip", "alice")],
        vec![playlist("p1", BLEND_NAME, "alice")],
    ])
    .await;

    let saved = catalog
        .upsert_playlist("alice", BLEND_NAME, &track_ids(150))
        .await
        .unwrap();

    assert!(saved.replaced);
    assert_eq!(saved.id, "p1");
    assert_eq!(
        fake.writes(),
        vec![
            "PUT p1 100 spotify:track:t0".to_string(),
            "POST p1 50 spotify:track:t100".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_upsert_creates_playlist_when_missing() {
    let (catalog, fake) = start(vec![vec![
        playlist("p0", "Road trip", "alice"),
        playlist("p9", BLEND_NAME, "bob"),
    ]])
    .await;

    let saved = catalog
        .upsert_playlist("alice", BLEND_NAME, &track_ids(3))
        .await
        .unwrap();

    assert!(!saved.replaced);
    assert_eq!(saved.id, "p2");
    assert_eq!(saved.name, BLEND_NAME);
    assert_eq!(
        saved.url.as_deref(),
        Some("https://open.spotify.com/playlist/p2")
    );
    assert_eq!(
        fake.writes(),
        vec![
            format!("CREATE alice {BLEND_NAME}"),
            "POST p2 3 spotify:track:t0".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_display_name_of_missing_user_is_unknown_user() {
    let (catalog, _fake) = start(Vec::new()).await;

    let err = catalog.display_name("ghost").await.unwrap_err();
    assert!(matches!(err, BlendError::UnknownUser { ref user_id } if user_id == "ghost"));
}

#[tokio::test]
async fn test_display_name_encodes_user_id() {
    let (catalog, _fake) = start(Vec::new()).await;

    let name = catalog.display_name("old school/dj").await.unwrap();
    assert_eq!(name, "Name of old school/dj");
}

#[tokio::test]
async fn test_nothing_playing_is_none() {
    let (catalog, _fake) = start(Vec::new()).await;

    assert!(catalog.currently_playing().await.unwrap().is_none());
}

#[tokio::test]
async fn test_bad_gateway_is_retried() {
    let (catalog, fake) = start(Vec::new()).await;
    fake.bad_gateways.store(1, Ordering::SeqCst);

    let user = catalog.current_user().await.unwrap();
    assert_eq!(user.name(), "Alice");
    assert_eq!(fake.me_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_bad_gateway_retries_are_bounded() {
    let (catalog, fake) = start(Vec::new()).await;
    fake.bad_gateways.store(5, Ordering::SeqCst);

    let err = catalog.current_user().await.unwrap_err();
    assert!(matches!(
        err,
        SpotifyError::ApiRequestFailed { status: 502, .. }
    ));
    assert_eq!(fake.me_hits.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_rate_limit_honours_retry_after() {
    let (catalog, fake) = start(Vec::new()).await;
    fake.rate_limits.store(1, Ordering::SeqCst);

    let user = catalog.current_user().await.unwrap();
    assert_eq!(user.id, "alice");
    assert_eq!(fake.me_hits.load(Ordering::SeqCst), 2);

    fake.rate_limits.store(5, Ordering::SeqCst);
    let err = catalog.current_user().await.unwrap_err();
    assert!(matches!(
        err,
        SpotifyError::RateLimitExceeded {
            retry_after_secs: 0
        }
    ));
}
