use crate::core::{Error, Result};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

fn video_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid video id pattern"))
}

/// Extracts the 11-character video id from a YouTube video URL.
///
/// Accepted shapes:
/// - `https://www.youtube.com/watch?v=<id>` (any `youtube.com` subdomain, extra query pairs allowed)
/// - `https://youtu.be/<id>`
/// - `https://www.youtube.com/shorts/<id>`
pub fn parse_video_id(raw: &str) -> Result<String> {
    let url = Url::parse(raw.trim()).map_err(|e| Error::invalid_url(raw, e.to_string()))?;
    let host = url
        .host_str()
        .ok_or_else(|| Error::invalid_url(raw, "missing host"))?;

    let candidate = if host == "youtu.be" {
        url.path_segments().and_then(|mut s| s.next()).map(str::to_string)
    } else if host == "youtube.com" || host.ends_with(".youtube.com") {
        match url.path() {
            "/watch" => url
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            path => path.strip_prefix("/shorts/").map(|id| id.trim_end_matches('/').to_string()),
        }
    } else {
        return Err(Error::invalid_url(raw, format!("unsupported host {host}")));
    };

    let id = candidate.ok_or_else(|| Error::invalid_url(raw, "no video id in URL"))?;
    if !video_id_pattern().is_match(&id) {
        return Err(Error::invalid_url(raw, format!("{id:?} is not an 11-character video id")));
    }
    Ok(id)
}
