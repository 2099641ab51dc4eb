pub const PLAYING_GLYPH: &str = "🎵";

/// Document title for the current page and track.
pub fn compose_title(track_title: Option<&str>, page: &str, site: &str, playing: bool) -> String {
    match track_title {
        Some(title) if playing => format!("{PLAYING_GLYPH} {title} - {page} - {site}"),
        Some(title) => format!("{title} - {page} - {site}"),
        None => format!("{page} - {site}"),
    }
}
