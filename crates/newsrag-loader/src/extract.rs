//! Best-effort HTML text and link extraction
//!
//! News pages are reduced to plain text with a few regex passes: drop script
//! and style blocks, strip the remaining tags, collapse whitespace. This is
//! deliberately naive; the seed pages are lightweight "lite" editions.

use regex::Regex;
use std::sync::OnceLock;
use url::Url;

fn script_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap())
}

fn style_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap())
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").unwrap())
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

fn href_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)href\s*=\s*["']([^"']+)["']"#).unwrap())
}

/// Strip markup from an HTML page
pub fn html_to_text(html: &str) -> String {
    let without_scripts = script_re().replace_all(html, " ");
    let without_styles = style_re().replace_all(&without_scripts, " ");
    let without_tags = tag_re().replace_all(&without_styles, " ");
    whitespace_re().replace_all(&without_tags, " ").trim().to_string()
}

/// Extract outbound links from a page, restricted to an allow-list of domains
///
/// `href` values are resolved against the page URL, fragments are dropped,
/// and only http(s) links whose host is in the allow-list survive. Order of
/// first appearance is preserved; duplicates are dropped.
pub fn extract_links(html: &str, base: &Url, allowed_domains: &[String]) -> Vec<Url> {
    let mut links: Vec<Url> = Vec::new();

    for caps in href_re().captures_iter(html) {
        let Some(raw) = caps.get(1) else { continue };
        let Ok(mut resolved) = base.join(raw.as_str()) else { continue };
        resolved.set_fragment(None);

        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }

        let Some(host) = resolved.host_str() else { continue };
        if !allowed_domains.iter().any(|domain| domain == host) {
            continue;
        }

        if !links.contains(&resolved) {
            links.push(resolved);
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags_and_collapses_whitespace() {
        let html = "<html><body><h1>Headline</h1>\n\n  <p>Body   text.</p></body></html>";
        assert_eq!(html_to_text(html), "Headline Body text.");
    }

    #[test]
    fn test_removes_script_blocks() {
        let html = "<p>Before</p><script type=\"text/javascript\">var x = '<p>not text</p>';\nalert(x);</script><p>After</p>";
        assert_eq!(html_to_text(html), "Before After");
    }

    #[test]
    fn test_removes_style_blocks() {
        let html = "<style>p { color: red; }</style><p>Visible</p>";
        assert_eq!(html_to_text(html), "Visible");
    }

    #[test]
    fn test_script_matching_is_case_insensitive() {
        let html = "<SCRIPT>hidden()</SCRIPT>shown";
        assert_eq!(html_to_text(html), "shown");
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(html_to_text("Inflation rose 3% in June."), "Inflation rose 3% in June.");
    }

    fn base() -> Url {
        Url::parse("https://news.example.com/lite/").unwrap()
    }

    fn allowed() -> Vec<String> {
        vec!["news.example.com".to_string()]
    }

    #[test]
    fn test_extracts_and_resolves_relative_links() {
        let html = r#"<a href="/lite/story-1">One</a> <a href="story-2">Two</a>"#;
        let links = extract_links(html, &base(), &allowed());

        assert_eq!(
            links,
            vec![
                Url::parse("https://news.example.com/lite/story-1").unwrap(),
                Url::parse("https://news.example.com/lite/story-2").unwrap(),
            ]
        );
    }

    #[test]
    fn test_filters_out_foreign_domains() {
        let html = r#"<a href="https://ads.example.org/banner">Ad</a>
                      <a href="https://news.example.com/lite/story">Story</a>"#;
        let links = extract_links(html, &base(), &allowed());

        assert_eq!(links.len(), 1);
        assert_eq!(links[0].host_str(), Some("news.example.com"));
    }

    #[test]
    fn test_filters_out_non_http_schemes() {
        let html = r#"<a href="mailto:tips@news.example.com">Mail</a>
                      <a href="javascript:void(0)">Nope</a>"#;
        assert!(extract_links(html, &base(), &allowed()).is_empty());
    }

    #[test]
    fn test_deduplicates_and_drops_fragments() {
        let html = r#"<a href="/lite/story#top">A</a> <a href="/lite/story">B</a>"#;
        let links = extract_links(html, &base(), &allowed());

        assert_eq!(links, vec![Url::parse("https://news.example.com/lite/story").unwrap()]);
    }
}
