//! Server-side HTML for every page.

use crate::{
    types::{
        Blend, FullArtist, FullTrack, Playlist, PlaylistRef, SpotifyUser, Tier, TierBuckets,
        UserSummary,
    },
    utils::escape_html as esc,
};

pub fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        esc(title),
        body
    )
}

pub fn navigation(display_name: &str) -> String {
    format!(
        r#"<h2>Hi {}, <small><a href="/auth/sign_out">[sign out]</a></small></h2>
<a href="/playlists">my playlists</a> |
<a href="/currently_playing">currently playing</a> |
<a href="/current_user">me</a> |
<a href="/find_users">find other users</a> |
<a href="/top_tracks">top tracks</a> |
<a href="/top_artists">top artists</a> |
<a href="/create_playlist">create missionary blend</a>
<hr>
"#,
        esc(display_name)
    )
}

pub fn message(text: &str) -> String {
    page("missionary", &format!("<p>{}</p>", esc(text)))
}

pub fn landing() -> String {
    page(
        "missionary",
        r#"<h2>missionary</h2>
<p>Blend your listening with everyone else's.</p>
<a href="/auth/login_with_spotify">Sign in with Spotify</a>"#,
    )
}

pub fn home(user: &SpotifyUser) -> String {
    page("missionary", &navigation(user.name()))
}

pub fn playlists(user_name: &str, playlists: &[Playlist]) -> String {
    let mut body = navigation(user_name);
    body.push_str("<h3>My playlists</h3>\n<ul>\n");
    for playlist in playlists {
        body.push_str("<li>");
        if let Some(url) = playlist.first_image_url() {
            body.push_str(&format!("<img src=\"{}\" width=\"64\"> ", esc(url)));
        }
        body.push_str(&format!(
            "{} ({} tracks)</li>\n",
            esc(&playlist.name),
            playlist.tracks.total
        ));
    }
    body.push_str("</ul>\n");
    page("My playlists", &body)
}

pub fn currently_playing(
    user_name: &str,
    playing: Option<(&FullTrack, &[FullTrack])>,
) -> String {
    let mut body = navigation(user_name);
    match playing {
        Some((track, top_tracks)) => {
            if let Some(url) = track.album.first_image_url() {
                body.push_str(&format!("<img src=\"{}\" width=\"300\">\n", esc(&url)));
            }
            body.push_str(&format!(
                "<h3>{}</h3>\n<p>by {}</p>\n<h4>Top tracks of {}</h4>\n<ol>\n",
                esc(&track.name),
                esc(track.primary_artist_name()),
                esc(track.primary_artist_name())
            ));
            for top in top_tracks {
                body.push_str(&format!("<li>{}</li>\n", esc(&top.name)));
            }
            body.push_str("</ol>\n");
        }
        None => body.push_str("<p>No track currently playing.</p>\n"),
    }
    page("Currently playing", &body)
}

pub fn current_user(user: &SpotifyUser) -> String {
    let field = |value: Option<&str>| esc(value.unwrap_or("-"));
    let followers = user
        .followers
        .total
        .map(|total| total.to_string())
        .unwrap_or_else(|| "-".to_string());

    let mut body = navigation(user.name());
    body.push_str(&format!(
        r#"<h3>{}</h3>
<ul>
<li>Followers: {}</li>
<li>Profile: <a href="{url}">{url}</a></li>
<li>Country: {}</li>
<li>Email: {}</li>
<li>Product: {}</li>
</ul>
"#,
        esc(user.name()),
        followers,
        field(user.country.as_deref()),
        field(user.email.as_deref()),
        field(user.product.as_deref()),
        url = field(user.external_urls.spotify.as_deref()),
    ));
    page("Me", &body)
}

fn save_button(action: &str, label: &str) -> String {
    format!(
        "<form method=\"post\" action=\"{}\"><button type=\"submit\">{}</button></form>\n",
        action,
        esc(label)
    )
}

pub fn top_tracks(user_name: &str, tracks: &TierBuckets<FullTrack>) -> String {
    let mut body = navigation(user_name);
    body.push_str("<h3>Top tracks</h3>\n");
    body.push_str(&save_button("/save_top_tracks", "Save my top tracks"));
    for (tier, items) in tracks.iter() {
        body.push_str(&format!("<h4>{}</h4>\n<ol>\n", tier.label()));
        for track in items {
            body.push_str(&format!(
                "<li>{} - {} <small>({})</small></li>\n",
                esc(&track.name),
                esc(track.primary_artist_name()),
                esc(&track.album.name)
            ));
        }
        body.push_str("</ol>\n");
    }
    page("Top tracks", &body)
}

pub fn top_artists(user_name: &str, artists: &TierBuckets<FullArtist>) -> String {
    let mut body = navigation(user_name);
    body.push_str("<h3>Top artists</h3>\n");
    body.push_str(&save_button("/save_top_artists", "Save my top artists"));
    for (tier, items) in artists.iter() {
        body.push_str(&format!("<h4>{}</h4>\n<ol>\n", tier.label()));
        for artist in items {
            body.push_str(&format!(
                "<li>{} <small>popularity {}</small></li>\n",
                esc(&artist.name),
                artist.popularity
            ));
        }
        body.push_str("</ol>\n");
    }
    page("Top artists", &body)
}

pub fn users(user_name: &str, summaries: &[UserSummary]) -> String {
    let mut body = navigation(user_name);
    body.push_str("<h3>Other users</h3>\n");
    if summaries.is_empty() {
        body.push_str("<p>Nobody has saved their favorites yet.</p>\n");
    }

    for summary in summaries {
        body.push_str(&format!("<h4>{}</h4>\n", esc(&summary.display_name)));
        for tier in Tier::ALL {
            let artists: Vec<String> = summary
                .artists
                .get(tier)
                .iter()
                .map(|a| esc(&a.name))
                .collect();
            let tracks: Vec<String> = summary
                .tracks
                .get(tier)
                .iter()
                .map(|t| format!("{} - {}", esc(&t.name), esc(&t.artist_name)))
                .collect();
            body.push_str(&format!(
                "<p><b>{}</b><br>Artists: {}<br>Tracks: {}</p>\n",
                tier.label(),
                artists.join(", "),
                tracks.join(", ")
            ));
        }
    }
    page("Other users", &body)
}

pub fn blend_preview(user_name: &str, blend: &Blend, playlist_name: &str) -> String {
    let mut body = navigation(user_name);
    body.push_str(&format!("<h3>{}</h3>\n", esc(playlist_name)));

    if blend.tracks.is_empty() {
        body.push_str("<p>No saved top artists to blend yet.</p>\n");
        return page(playlist_name, &body);
    }

    body.push_str("<ol>\n");
    for track in &blend.tracks {
        body.push_str("<li>");
        if let Some(url) = &track.image_url {
            body.push_str(&format!("<img src=\"{}\" width=\"48\"> ", esc(url)));
        }
        body.push_str(&format!(
            "{} - {}</li>\n",
            esc(&track.name),
            esc(&track.artist_name)
        ));
    }
    body.push_str("</ol>\n");
    body.push_str(&format!(
        r#"<form method="post" action="/save_playlist">
<input type="hidden" name="track_ids" value="{}">
<button type="submit">Save to Spotify</button>
</form>
"#,
        esc(&blend.track_ids().join(","))
    ));
    page(playlist_name, &body)
}

pub fn playlist_saved(user_name: &str, playlist: &PlaylistRef, track_count: usize) -> String {
    let mut body = navigation(user_name);
    let verb = if playlist.replaced { "Updated" } else { "Created" };
    body.push_str(&format!(
        "<p>{} playlist <b>{}</b> with {} tracks.</p>\n",
        verb,
        esc(&playlist.name),
        track_count
    ));
    if let Some(url) = &playlist.url {
        body.push_str(&format!("<a href=\"{0}\">{0}</a>\n", esc(url)));
    }
    page(&playlist.name, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrackRef;

    #[test]
    fn navigation_escapes_the_display_name() {
        let nav = navigation("<script>");
        assert!(nav.contains("Hi &lt;script&gt;"));
        assert!(nav.contains("href=\"/create_playlist\""));
    }

    #[test]
    fn blend_preview_posts_comma_joined_ids() {
        let track = |id: &str| TrackRef {
            id: id.to_string(),
            name: format!("Song {id}"),
            artist_name: "Band".to_string(),
            uri: format!("spotify:track:{id}"),
            external_url: None,
            image_url: None,
        };
        let blend = Blend {
            artists: Vec::new(),
            tracks: vec![track("t1"), track("t2")],
        };

        let html = blend_preview("alice", &blend, "Your Missionary Blend");
        assert!(html.contains("name=\"track_ids\" value=\"t1,t2\""));
        assert!(html.contains("Song t2 - Band"));
    }

    #[test]
    fn empty_blend_has_no_save_form() {
        let html = blend_preview("alice", &Blend::default(), "Your Missionary Blend");
        assert!(!html.contains("/save_playlist"));
    }
}
