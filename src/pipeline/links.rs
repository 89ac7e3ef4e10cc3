use std::sync::LazyLock;

use regex::Regex;

static INLINE_LINKS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]+)\)").unwrap());
static HREF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"href="([^"]*)""#).unwrap());

/// Inline style shared by every generated anchor.
pub const ANCHOR_STYLE: &str = "color:#0066cc;text-decoration:none";

/// Returned by `extract_url_from_html` when the input carries no anchor.
pub const FALLBACK_URL: &str = "https://linkhub.site";

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Build a styled anchor. Both href and visible text are entity-escaped.
pub fn styled_anchor(href: &str, text: &str) -> String {
    format!(
        r#"<a href="{}" style="{}" target="_blank">{}</a>"#,
        escape_html(href),
        ANCHOR_STYLE,
        escape_html(text),
    )
}

/// Rewrite every inline `[text](target)` as an HTML anchor. Text outside the
/// matches passes through untouched; malformed bracket/paren sequences never
/// match and stay literal.
pub fn md_links_to_html(s: &str) -> String {
    INLINE_LINKS_RE
        .replace_all(s, |caps: &regex::Captures| styled_anchor(&caps[2], &caps[1]))
        .to_string()
}

/// First `href="..."` attribute value in `s`, or the fixed fallback URL.
pub fn extract_url_from_html(s: &str) -> String {
    HREF_RE
        .captures(s)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| FALLBACK_URL.to_string())
}

// ── Tests ──
