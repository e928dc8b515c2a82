//! Unit tests for the address-bar, tab-strip and window-title text policy.

use rstest::rstest;
use tabshell::services::display::*;

#[rstest]
#[case("example.com", Some("https://example.com"))]
#[case("http://example.com", Some("http://example.com"))]
#[case("https://example.com/a?b=c", Some("https://example.com/a?b=c"))]
#[case("ftp://files.example.com", Some("ftp://files.example.com"))]
#[case("  example.com/path  ", Some("https://example.com/path"))]
#[case("localhost:8080", Some("https://localhost:8080"))]
#[case("", None)]
#[case("   ", None)]
fn test_normalize_url(#[case] raw: &str, #[case] expected: Option<&str>) {
    assert_eq!(normalize_url(raw).as_deref(), expected);
}

#[rstest]
#[case("www.example.org", Some("https://www.example.org"))]
#[case("http://intranet", Some("http://intranet"))]
#[case("https://example.org", Some("https://example.org"))]
#[case("file:///home/me/start.html", Some("https://file:///home/me/start.html"))]
#[case("\t", None)]
fn test_normalize_home_page(#[case] raw: &str, #[case] expected: Option<&str>) {
    assert_eq!(normalize_home_page(raw).as_deref(), expected);
}

#[rstest]
#[case("https://www.rust-lang.org/learn", "www.rust-lang.org")]
#[case("http://EXAMPLE.com:8080", "example.com")]
#[case("https://user@host.test/", "host.test")]
#[case("not a url", "")]
#[case("", "")]
#[case("https://Example.COM\\path", "example.com")]
#[case("http://[2001:db8::1]:443/", "[2001:db8::1]")]
#[case("https://bad host.test/", "")]
fn test_host_of(#[case] url: &str, #[case] expected: &str) {
    assert_eq!(host_of(url), expected);
}

#[rstest]
#[case("https://files.example.com/pub/report.pdf", "report.pdf")]
#[case("https://files.example.com/pub/archive.tar.gz?token=abc", "archive.tar.gz")]
#[case("https://example.com/", "example.com.html")]
#[case("https://example.com", "example.com.html")]
#[case("http://127.0.0.1/", "download")]
#[case("data:text/plain,hello", "download")]
#[case("not a url", "download")]
fn test_download_file_name(#[case] url: &str, #[case] expected: &str) {
    assert_eq!(download_file_name(url), expected);
}

#[test]
fn test_long_title_truncates_label_but_not_window_title() {
    let title = "A very long page title exceeding twenty chars";
    let label = tab_label(title, "https://example.com/");
    assert_eq!(label, "A very long page ...");
    assert_eq!(label.chars().count(), 20);
    assert_eq!(window_title(title, "https://example.com/"), title);
}

#[rstest]
#[case("Short", "Short")]
#[case("Exactly twenty chars", "Exactly twenty chars")]
#[case("Twenty-one characters", "Twenty-one charac...")]
fn test_tab_label_limits(#[case] title: &str, #[case] expected: &str) {
    assert_eq!(tab_label(title, ""), expected);
}

#[test]
fn test_tab_label_falls_back_to_host_then_placeholder() {
    assert_eq!(tab_label("", "https://docs.rs/serde"), "docs.rs");
    assert_eq!(tab_label("", ""), LOADING_LABEL);
    assert_eq!(tab_label("", "about:blank"), LOADING_LABEL);
}

#[test]
fn test_tab_tooltip_prefers_title_then_url() {
    assert_eq!(tab_tooltip("Docs", "https://docs.rs"), "Docs");
    assert_eq!(tab_tooltip("", "https://docs.rs"), "https://docs.rs");
}

#[test]
fn test_window_title_suppressed_past_sixty_chars() {
    let long = "x".repeat(60);
    assert_eq!(window_title(&long, "https://news.example.com/story"), "news.example.com");
    assert_eq!(window_title(&long, ""), "Web Browser");
    assert_eq!(window_title(&"y".repeat(59), ""), "y".repeat(59));
}

#[test]
fn test_window_title_falls_back_to_host_then_default() {
    assert_eq!(window_title("", "https://example.com/page"), "example.com");
    assert_eq!(window_title("", ""), "Web Browser");
}

#[test]
fn test_strip_query_keeps_url_without_query() {
    assert_eq!(strip_query("https://a.test/search?q=rust&page=2"), "https://a.test/search");
    assert_eq!(strip_query("https://a.test/"), "https://a.test/");
}
