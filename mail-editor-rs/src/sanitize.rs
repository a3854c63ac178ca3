//! HTML sanitization for the write path
//!
//! Content arriving from the in-browser editor is attacker-controlled and is
//! reduced to an email-safe allow-list before it is persisted. Comments are
//! kept because the subject line convention (`<!-- Subject: ... -->`) has to
//! survive the sanitize/persist/render round trip.

use ammonia::Builder;
use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

/// Elements commonly needed in HTML email markup.
const ALLOWED_TAGS: &[&str] = &[
    "a", "b", "blockquote", "br", "code", "div", "em", "h1", "h2", "h3", "h4", "h5", "h6",
    "hr", "i", "img", "li", "ol", "p", "pre", "span", "strong", "table", "tbody", "td",
    "th", "thead", "tr", "u", "ul",
];

const ALLOWED_CSS_PROPERTIES: &[&str] = &[
    "background",
    "background-color",
    "color",
    "display",
    "font",
    "font-family",
    "font-size",
    "font-style",
    "font-weight",
    "height",
    "letter-spacing",
    "line-height",
    "list-style-type",
    "max-width",
    "text-align",
    "text-decoration",
    "text-indent",
    "text-transform",
    "vertical-align",
    "white-space",
    "width",
    // Box-model properties the editor emits for layout tweaks
    "padding",
    "margin",
    "border",
];

/// Reduce untrusted editor output to the email-safe subset.
///
/// This is the only form the write path ever persists.
pub fn clean(html: &str) -> String {
    builder().clean(html).to_string()
}

fn builder() -> Builder<'static> {
    let mut tag_attributes: HashMap<&str, HashSet<&str>> = HashMap::new();
    tag_attributes.insert("a", ["href", "title", "target"].into_iter().collect());
    tag_attributes.insert(
        "img",
        ["src", "alt", "width", "height"].into_iter().collect(),
    );
    tag_attributes.insert(
        "table",
        ["width", "border", "cellpadding", "cellspacing"].into_iter().collect(),
    );
    tag_attributes.insert(
        "td",
        ["colspan", "rowspan", "align", "valign", "width"].into_iter().collect(),
    );
    tag_attributes.insert(
        "th",
        ["colspan", "rowspan", "align", "valign", "width"].into_iter().collect(),
    );

    let mut builder = Builder::default();
    builder
        .tags(ALLOWED_TAGS.iter().copied().collect())
        .tag_attributes(tag_attributes)
        .generic_attributes(["style"].into_iter().collect())
        .strip_comments(false)
        .attribute_filter(|_element, attribute, value| {
            if attribute == "style" {
                let filtered = filter_css(value);
                if filtered.is_empty() {
                    None
                } else {
                    Some(Cow::Owned(filtered))
                }
            } else {
                Some(Cow::Borrowed(value))
            }
        });
    builder
}

/// Keep only allow-listed properties of an inline style declaration list.
fn filter_css(style: &str) -> String {
    style
        .split(';')
        .filter_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim();
            if value.is_empty() || !css_property_allowed(&property) {
                return None;
            }
            Some(format!("{}: {}", property, value))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn css_property_allowed(property: &str) -> bool {
    ALLOWED_CSS_PROPERTIES.contains(&property)
        || property.starts_with("padding-")
        || property.starts_with("margin-")
        || property.starts_with("border-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_markup_is_idempotent() {
        let input = r#"<p style="color: red">Hello <strong>world</strong></p>"#;
        let once = clean(input);
        let twice = clean(&once);
        assert_eq!(once, twice);
        assert!(once.contains("<strong>world</strong>"));
        assert!(once.contains("color: red"));
    }

    #[test]
    fn test_script_is_stripped_siblings_survive() {
        let input = "<p>keep me</p><script>alert('xss')</script><p>and me</p>";
        let cleaned = clean(input);
        assert!(!cleaned.contains("script"));
        assert!(!cleaned.contains("alert"));
        assert!(cleaned.contains("<p>keep me</p>"));
        assert!(cleaned.contains("<p>and me</p>"));
    }

    #[test]
    fn test_event_handler_attributes_are_dropped() {
        let cleaned = clean(r#"<p onclick="steal()">text</p>"#);
        assert!(!cleaned.contains("onclick"));
        assert!(cleaned.contains("text"));
    }

    #[test]
    fn test_subject_comment_survives() {
        let input = "<!-- Subject: Hello World -->\n<p>body</p>";
        let cleaned = clean(input);
        assert!(cleaned.contains("<!-- Subject: Hello World -->"));
    }

    #[test]
    fn test_disallowed_css_properties_are_filtered() {
        let cleaned = clean(
            r#"<div style="color: blue; position: fixed; padding-top: 4px">x</div>"#,
        );
        assert!(cleaned.contains("color: blue"));
        assert!(cleaned.contains("padding-top: 4px"));
        assert!(!cleaned.contains("position"));
    }

    #[test]
    fn test_style_allowed_on_any_element() {
        let cleaned = clean(r#"<span style="font-weight: bold">x</span>"#);
        assert!(cleaned.contains("font-weight: bold"));
    }
}
