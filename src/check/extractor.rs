use super::types::CandidateLink;
use crate::cms::Post;
use crate::config::CheckerConfig;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extract deduplicated outbound `http(s)` links from one rendered post body.
///
/// Pure function of HTML in, list out — no network I/O. Malformed HTML never
/// fails: `scraper` parses forgivingly and anchors with unparseable `href`
/// values are skipped, not fatal. Relative and non-http(s) hrefs are treated
/// as internal and dropped, as are hosts on the configured skip-list.
pub fn extract_links(post: &Post, config: &CheckerConfig) -> Vec<CandidateLink> {
    let document = Html::parse_fragment(&post.body);
    let Ok(anchors) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&anchors) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(url) = parse_outbound(href) else {
            continue;
        };
        if is_skipped(&url, &config.skip_hosts) {
            continue;
        }
        let url = url.to_string();
        if !seen.insert(url.clone()) {
            continue;
        }

        links.push(CandidateLink {
            url,
            context: surrounding_context(element, config.context_chars),
            post_id: post.id,
            post_slug: post.slug.clone(),
            post_title: post.title.clone(),
        });
    }

    links
}

/// Relative hrefs fail `Url::parse`, which is exactly the internal-link
/// filter we want.
fn parse_outbound(href: &str) -> Option<Url> {
    let url = Url::parse(href.trim()).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}

fn is_skipped(url: &Url, skip_hosts: &[String]) -> bool {
    let Some(host) = url.host_str() else {
        return true;
    };
    let host = host.strip_prefix("www.").unwrap_or(host);
    skip_hosts.iter().any(|skip| {
        let skip = skip.strip_prefix("www.").unwrap_or(skip);
        host == skip || host.ends_with(&format!(".{skip}"))
    })
}

/// Anchor text, widened to the parent element's text when the anchor alone
/// says nothing useful ("here", "link"), normalized and bounded.
fn surrounding_context(element: ElementRef<'_>, max_chars: usize) -> String {
    let anchor_text = normalize_whitespace(element.text());
    let context = if anchor_text.chars().count() >= 20 {
        anchor_text
    } else {
        element
            .parent()
            .and_then(ElementRef::wrap)
            .map(|parent| normalize_whitespace(parent.text()))
            .filter(|parent_text| parent_text.chars().count() > anchor_text.chars().count())
            .unwrap_or(anchor_text)
    };
    truncate_text(&context, max_chars)
}

fn normalize_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The ellipsis counts against the budget: output never exceeds `max_chars`.
fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_with_body(body: &str) -> Post {
        Post {
            id: 7,
            slug: "test-post".into(),
            title: "Test Post".into(),
            body: body.into(),
            categories: Vec::new(),
            author: None,
            published_at: None,
        }
    }

    fn extract(body: &str) -> Vec<CandidateLink> {
        extract_links(&post_with_body(body), &CheckerConfig::default())
    }

    #[test]
    fn simple_anchor() {
        let links = extract(r#"<p>See <a href="https://example.com/doc">the docs</a>.</p>"#);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://example.com/doc");
        assert_eq!(links[0].post_id, 7);
        assert_eq!(links[0].post_slug, "test-post");
    }

    #[test]
    fn relative_links_skipped() {
        let links = extract(r#"<a href="/about">about</a> <a href="../up">up</a>"#);
        assert!(links.is_empty());
    }

    #[test]
    fn non_http_schemes_skipped() {
        let links =
            extract(r#"<a href="mailto:x@example.com">mail</a> <a href="ftp://f.example.com">f</a>"#);
        assert!(links.is_empty());
    }

    #[test]
    fn skip_list_hosts_dropped() {
        let links = extract(
            r#"<a href="https://twitter.com/share?u=1">share</a>
               <a href="https://www.facebook.com/sharer/sharer.php">share</a>
               <a href="https://example.org/kept">kept</a>"#,
        );
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://example.org/kept");
    }

    #[test]
    fn skip_list_covers_subdomains() {
        let links = extract(r#"<a href="https://share.twitter.com/x">x</a>"#);
        assert!(links.is_empty());
    }

    #[test]
    fn deduplicates_preserving_order() {
        let links = extract(
            r#"<a href="https://b.example.com">one</a>
               <a href="https://a.example.com">two</a>
               <a href="https://b.example.com">again</a>"#,
        );
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].url, "https://b.example.com/");
        assert_eq!(links[1].url, "https://a.example.com/");
    }

    #[test]
    fn malformed_html_never_panics() {
        for body in [
            "<a href=",
            "<<<>>>",
            r#"<a href="https://example.com"><p>unclosed"#,
            "<a href=\"ht tp://bad url\">x</a>",
            "",
        ] {
            let _links = extract(body);
        }
    }

    #[test]
    fn unparseable_href_skipped_others_kept() {
        let links = extract(
            r#"<a href="http://[broken">bad</a> <a href="https://ok.example.com">ok</a>"#,
        );
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].url, "https://ok.example.com/");
    }

    #[test]
    fn context_uses_anchor_text() {
        let links = extract(
            r#"<p><a href="https://example.com/x">A long descriptive anchor text here</a></p>"#,
        );
        assert_eq!(links[0].context, "A long descriptive anchor text here");
    }

    #[test]
    fn short_anchor_widens_to_parent() {
        let links = extract(
            r#"<p>The full migration guide is available <a href="https://example.com/guide">here</a> for reference.</p>"#,
        );
        assert!(links[0].context.contains("migration guide"));
    }

    #[test]
    fn context_bounded_with_ellipsis_inside_budget() {
        let long = "word ".repeat(100);
        let body = format!(r#"<p>{long}<a href="https://example.com/x">here</a></p>"#);
        let links = extract(&body);
        assert_eq!(links[0].context.chars().count(), 150);
        assert!(links[0].context.ends_with("..."));
    }

    #[test]
    fn short_non_ascii_anchor_widens_to_parent() {
        // 13 chars but 39 bytes: the widening threshold counts chars.
        let links = extract(
            r#"<p>The deployment notes are in <a href="https://example.com/notes">詳細はこちらをご覧ください</a> for this release.</p>"#,
        );
        assert!(links[0].context.contains("deployment notes"));
    }

    #[test]
    fn no_links_yields_empty_vec() {
        let links = extract("<p>Plain prose, no anchors at all.</p>");
        assert!(links.is_empty());
    }
}
