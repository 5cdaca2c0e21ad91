//! Link detection for event fields.
//!
//! Only absolute `http`/`https` links are turned into anchors; anything else
//! (plain text, `mailto:`, `tel:`) is rendered as escaped text.
//!
//! # Example
//!
//! ```
//! use imip_core::links::linkify;
//!
//! assert_eq!(
//!     linkify("https://meet.example.com/abc"),
//!     r#"<a href="https://meet.example.com/abc">https://meet.example.com/abc</a>"#
//! );
//! assert_eq!(linkify("Room <4>"), "Room &lt;4&gt;");
//! ```

use url::Url;

use crate::format::{html_escape, hyperlink};

/// Returns `true` if `text` is an absolute web link.
pub fn is_web_url(text: &str) -> bool {
    let text = text.trim();
    if text.chars().any(char::is_whitespace) {
        return false;
    }
    Url::parse(text)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}

/// Renders `text` as HTML, wrapping it in an anchor when it is a web link.
pub fn linkify(text: &str) -> String {
    if is_web_url(text) {
        hyperlink(text.trim())
    } else {
        html_escape(text)
    }
}
