//! Text policy for the address bar, tab strip and window title.
//!
//! Everything here is pure so the controller can re-derive chrome text from a
//! tab snapshot at any time.

use url::Url;

use crate::types::chrome::DEFAULT_WINDOW_TITLE;

/// Placeholder shown while a tab has neither title nor host.
pub const LOADING_LABEL: &str = "Loading...";
/// Label of a freshly created tab before its surface reports anything.
pub const NEW_TAB_LABEL: &str = "New Tab";

const TAB_LABEL_MAX_CHARS: usize = 20;
const TAB_LABEL_KEEP_CHARS: usize = 17;
const ELLIPSIS: &str = "...";
const WINDOW_TITLE_LIMIT_CHARS: usize = 60;
const DOWNLOAD_FALLBACK_NAME: &str = "download";

/// Turns address-bar text into a URL to load.
///
/// Text that already names a scheme (`scheme://`) is kept; anything else gets
/// `https://`. Returns `None` for blank input.
pub fn normalize_url(raw: &str) -> Option<String> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    if text.contains("://") {
        Some(text.to_string())
    } else {
        Some(format!("https://{}", text))
    }
}

/// Normalizes a home page entered in preferences.
///
/// Only `http://` and `https://` are accepted as-is; every other input is
/// treated as a bare host. Returns `None` for blank input.
pub fn normalize_home_page(raw: &str) -> Option<String> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }
    if text.starts_with("http://") || text.starts_with("https://") {
        Some(text.to_string())
    } else {
        Some(format!("https://{}", text))
    }
}

/// Host part of `url`, lowercased, or an empty string when there is none.
///
/// IPv6 hosts keep their brackets. Text that does not parse as an absolute
/// URL has no host.
pub fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_owned))
        .unwrap_or_default()
}

/// File name offered when the page at `url` starts a download: the last
/// path segment, else `<domain>.html`, else `download`.
pub fn download_file_name(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return DOWNLOAD_FALLBACK_NAME.to_string();
    };
    let last = parsed
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|segment| !segment.is_empty());
    match (last, parsed.domain()) {
        (Some(segment), _) => segment.to_string(),
        (None, Some(domain)) => format!("{}.html", domain),
        (None, None) => DOWNLOAD_FALLBACK_NAME.to_string(),
    }
}

/// `url` without its query string, for compact status messages.
pub fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

/// Tab-strip label: page title, else host, else the loading placeholder,
/// truncated to 20 characters.
pub fn tab_label(title: &str, url: &str) -> String {
    let host = host_of(url);
    let text = if !title.is_empty() {
        title.to_string()
    } else if !host.is_empty() {
        host
    } else {
        LOADING_LABEL.to_string()
    };
    truncate_label(&text)
}

/// Truncates to 17 characters plus an ellipsis once a label exceeds 20.
pub fn truncate_label(text: &str) -> String {
    if text.chars().count() > TAB_LABEL_MAX_CHARS {
        let kept: String = text.chars().take(TAB_LABEL_KEEP_CHARS).collect();
        format!("{}{}", kept, ELLIPSIS)
    } else {
        text.to_string()
    }
}

/// Tab tooltip: the full title, else the URL.
pub fn tab_tooltip(title: &str, url: &str) -> String {
    if title.is_empty() {
        url.to_string()
    } else {
        title.to_string()
    }
}

/// Window title: the page title (or host) when shorter than 60 characters,
/// else the host, else the default title. Never truncated.
pub fn window_title(title: &str, url: &str) -> String {
    let host = host_of(url);
    let main = if title.is_empty() { host.as_str() } else { title };
    if !main.is_empty() && main.chars().count() < WINDOW_TITLE_LIMIT_CHARS {
        main.to_string()
    } else if !host.is_empty() {
        host
    } else {
        DEFAULT_WINDOW_TITLE.to_string()
    }
}
