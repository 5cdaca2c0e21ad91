//! HTML and plain-text helpers for notification bodies.

/// Escapes text for HTML display.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Wraps already-escaped HTML in a strike-through span.
pub fn strike(html: &str) -> String {
    format!("<span style='text-decoration: line-through'>{html}</span>")
}

/// Renders a changed value: the old one struck through, then the new one.
///
/// Both arguments must already be HTML.
pub fn strike_through(old_html: &str, new_html: &str) -> String {
    format!("{}<br />{new_html}", strike(old_html))
}

/// Creates an HTML anchor whose label is the link itself.
pub fn hyperlink(url: &str) -> String {
    let escaped = html_escape(url);
    format!("<a href=\"{escaped}\">{escaped}</a>")
}

/// Creates bullet points from a list of items.
pub fn bulletize(items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    items
        .iter()
        .map(|item| format!("• {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    mod html_escape_tests {
        use super::*;

        #[test]
        fn escapes_special_chars() {
            assert_eq!(
                html_escape("<b>\"Tom\" & 'Jerry'</b>"),
                "&lt;b&gt;&quot;Tom&quot; &amp; &#x27;Jerry&#x27;&lt;/b&gt;"
            );
        }
    }

    mod strike_tests {
        use super::*;

        #[test]
        fn strike_only() {
            assert_eq!(
                strike("Old"),
                "<span style='text-decoration: line-through'>Old</span>"
            );
        }

        #[test]
        fn old_then_new() {
            assert_eq!(
                strike_through("Old", "New"),
                "<span style='text-decoration: line-through'>Old</span><br />New"
            );
        }
    }

    mod hyperlink_tests {
        use super::*;

        #[test]
        fn escapes_url() {
            assert_eq!(
                hyperlink("https://example.com/?a=1&b=2"),
                "<a href=\"https://example.com/?a=1&amp;b=2\">https://example.com/?a=1&amp;b=2</a>"
            );
        }
    }

    mod bulletize_tests {
        use super::*;

        #[test]
        fn empty() {
            assert_eq!(bulletize(&[]), "");
        }

        #[test]
        fn one_item_per_line() {
            let items = vec!["Title: Standup".to_string(), "Location: Room 1".to_string()];
            assert_eq!(bulletize(&items), "• Title: Standup\n• Location: Room 1");
        }
    }
}
