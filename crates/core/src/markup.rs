//! Built-in sanitizer for lock messages.
//!
//! Mirrors the usual CMS text formats:
//!
//! - `plain_text`: everything escaped, line breaks become `<br>`.
//! - `basic_html` / `restricted_html`: allow-listed tags only, every attribute
//!   dropped except a safe `href` on links. Unknown tags are removed but their
//!   text is kept; `<script>`/`<style>` blocks and comments go entirely.
//! - `full_html`: passed through untouched.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::collaborators::MarkupRenderer;
use crate::rule::MessageFormat;

static SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid regex"));
static STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("valid regex"));
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<\s*(/?)\s*([a-zA-Z][a-zA-Z0-9]*)([^>]*)>").expect("valid regex")
});
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#[0-9]+|#[xX][0-9a-fA-F]+|[a-zA-Z][a-zA-Z0-9]*);").expect("valid regex")
});
static HREF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#).expect("valid regex")
});

const BASIC_HTML_TAGS: &[&str] = &[
    "a", "em", "strong", "b", "i", "u", "cite", "blockquote", "code", "ul", "ol", "li", "dl",
    "dt", "dd", "h2", "h3", "h4", "h5", "h6", "p", "br", "span",
];

const RESTRICTED_HTML_TAGS: &[&str] = &[
    "a", "em", "strong", "cite", "blockquote", "code", "ul", "ol", "li", "dl", "dt", "dd", "h2",
    "h3", "h4", "h5", "h6",
];

const UNSAFE_SCHEMES: &[&str] = &["javascript:", "vbscript:", "data:"];

#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinMarkupRenderer;

impl MarkupRenderer for BuiltinMarkupRenderer {
    fn render(&self, text: &str, format: MessageFormat) -> String {
        match format {
            MessageFormat::PlainText => plain_text(text),
            MessageFormat::BasicHtml => filter_html(text, BASIC_HTML_TAGS),
            MessageFormat::RestrictedHtml => line_breaks(&filter_html(text, RESTRICTED_HTML_TAGS)),
            MessageFormat::FullHtml => text.to_string(),
        }
    }
}

fn plain_text(text: &str) -> String {
    line_breaks(&html_escape::encode_text(text))
}

fn line_breaks(text: &str) -> String {
    text.trim_end()
        .replace("\r\n", "\n")
        .replace('\n', "<br>\n")
}

/// Text between tags is always escaped, so a stray or unterminated `<`
/// can never open a tag. Entity references already present are kept.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for entity in ENTITY_RE.find_iter(text) {
        out.push_str(&html_escape::encode_text(&text[last..entity.start()]));
        out.push_str(entity.as_str());
        last = entity.end();
    }
    out.push_str(&html_escape::encode_text(&text[last..]));
    out
}

fn filter_html(text: &str, allowed: &[&str]) -> String {
    let text = SCRIPT_RE.replace_all(text, "");
    let text = STYLE_RE.replace_all(&text, "");
    let text = COMMENT_RE.replace_all(&text, "");

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in TAG_RE.captures_iter(&text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&escape_text(&text[last..whole.start()]));
        out.push_str(&rebuild_tag(&caps, allowed));
        last = whole.end();
    }
    out.push_str(&escape_text(&text[last..]));
    out
}

/// Allowed tags come back bare (links keep a safe `href`); anything else
/// is dropped.
fn rebuild_tag(caps: &Captures, allowed: &[&str]) -> String {
    let closing = !caps[1].is_empty();
    let tag = caps[2].to_ascii_lowercase();
    if !allowed.contains(&tag.as_str()) {
        return String::new();
    }
    if closing {
        return format!("</{tag}>");
    }
    match (tag.as_str(), safe_href(&caps[3])) {
        ("a", Some(href)) => format!(
            "<a href=\"{}\">",
            html_escape::encode_double_quoted_attribute(&href)
        ),
        _ => format!("<{tag}>"),
    }
}

fn safe_href(attributes: &str) -> Option<String> {
    let caps = HREF_RE.captures(attributes)?;
    let value = caps
        .get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))?
        .as_str()
        .trim();

    let lowered: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    if UNSAFE_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return None;
    }
    Some(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(text: &str, format: MessageFormat) -> String {
        BuiltinMarkupRenderer.render(text, format)
    }

    #[test]
    fn plain_text_escapes_everything() {
        assert_eq!(
            render("<b>Locked</b> & done\nbye", MessageFormat::PlainText),
            "&lt;b&gt;Locked&lt;/b&gt; &amp; done<br>\nbye"
        );
    }

    #[test]
    fn basic_html_keeps_allowed_tags_and_drops_attributes() {
        assert_eq!(
            render(
                r#"<p class="x" onclick="evil()">Already <strong>registered</strong></p>"#,
                MessageFormat::BasicHtml
            ),
            "<p>Already <strong>registered</strong></p>"
        );
    }

    #[test]
    fn basic_html_removes_scripts_and_unknown_tags() {
        assert_eq!(
            render(
                "<div>Hi<script>alert(1)</script><!-- note --><iframe src=x></iframe></div>",
                MessageFormat::BasicHtml
            ),
            "Hi"
        );
    }

    #[test]
    fn links_keep_safe_href_only() {
        assert_eq!(
            render(r#"<a href="https://example.org/help" target="_blank">help</a>"#, MessageFormat::BasicHtml),
            r#"<a href="https://example.org/help">help</a>"#
        );
        assert_eq!(
            render(r#"<a href=" JavaScript:alert(1)">x</a>"#, MessageFormat::BasicHtml),
            "<a>x</a>"
        );
    }

    #[test]
    fn unterminated_tags_are_escaped() {
        let basic = render("Locked <img src=x onerror=alert(1) ", MessageFormat::BasicHtml);
        assert!(!basic.contains("<img"));
        assert_eq!(basic, "Locked &lt;img src=x onerror=alert(1) ");

        let restricted = render("a <b onclick=alert(1)", MessageFormat::RestrictedHtml);
        assert!(!restricted.contains("<b"));
        assert_eq!(restricted, "a &lt;b onclick=alert(1)");
    }

    #[test]
    fn stray_brackets_are_escaped_but_entities_kept() {
        assert_eq!(
            render("<p>1 < 2 &amp; 3 > 2 & done</p>", MessageFormat::BasicHtml),
            "<p>1 &lt; 2 &amp; 3 &gt; 2 &amp; done</p>"
        );
    }

    #[test]
    fn link_href_is_attribute_encoded() {
        assert_eq!(
            render(r#"<a href='/help?a=1&b="2"'>help</a>"#, MessageFormat::BasicHtml),
            r#"<a href="/help?a=1&amp;b=&quot;2&quot;">help</a>"#
        );
    }

    #[test]
    fn restricted_html_drops_paragraphs_and_breaks_lines() {
        assert_eq!(
            render("<p>one</p>\n<em>two</em>", MessageFormat::RestrictedHtml),
            "one<br>\n<em>two</em>"
        );
    }

    #[test]
    fn full_html_is_verbatim() {
        let html = r#"<div style="color:red">x</div>"#;
        assert_eq!(render(html, MessageFormat::FullHtml), html);
    }
}
