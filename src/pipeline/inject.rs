use std::sync::LazyLock;

use rand::seq::SliceRandom;
use regex::Regex;

use super::links::{extract_url_from_html, styled_anchor};

/// Fixed pool of promotional link hosts, sampled uniformly at random.
pub const LINK_POOL: [&str; 9] = [
    "77links.net",
    "88links.vip",
    "99links.top",
    "linkhub.site",
    "linkgo.club",
    "linkone.pro",
    "linkmax.live",
    "linkstar.fun",
    "linkday.xyz",
];

/// Pool hosts that must never appear in body text.
pub const DENYLIST: [&str; 3] = ["77links.net", "88links.vip", "99links.top"];

pub const MARKER_OPEN: &str = "【链接地址：";
pub const MARKER_CLOSE: &str = "】";
/// Marker with an empty value, as it appears before a bare URL.
pub const FULL_MARKER: &str = "【链接地址：】";

const CONTAINER_STYLE: &str = "font-size:16px;font-weight:bold";

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"【链接地址：[^】]*】").unwrap());

/// Random-choice capability; tests supply a deterministic stub.
pub trait HostPicker {
    fn pick(&mut self, pool: &'static [&'static str]) -> &'static str;
}

pub struct RandomPicker;

impl HostPicker for RandomPicker {
    fn pick(&mut self, pool: &'static [&'static str]) -> &'static str {
        pool.choose(&mut rand::thread_rng()).copied().unwrap_or(pool[0])
    }
}

fn marker_snippet(host: &str) -> String {
    format!(
        "{}{}{}",
        MARKER_OPEN,
        styled_anchor(&format!("https://{}", host), host),
        MARKER_CLOSE,
    )
}

/// Build the column-A (title) cell: strip any existing marker pattern, pick a
/// host, and splice the marker+anchor snippet between the first and second
/// ` - `-separated segments when the title has three of them, otherwise
/// append it. The whole result is wrapped in a styled container.
pub fn create_column_a_content(original: &str, picker: &mut dyn HostPicker) -> String {
    let host = picker.pick(&LINK_POOL);
    let cleaned = MARKER_RE.replace_all(original, "").to_string();
    let snippet = marker_snippet(host);

    let parts: Vec<&str> = cleaned.splitn(3, " - ").collect();
    let joined = if parts.len() >= 3 {
        format!("{} - {}{} - {}", parts[0], snippet, parts[1], parts[2])
    } else {
        format!("{}{}", cleaned, snippet)
    };

    format!(r#"<p style="{}">{}</p>"#, CONTAINER_STYLE, joined)
}

/// Replace the first pair of consecutive empty paragraphs in `fragment` with
/// a "permanent link" paragraph pointing at the first anchor of the processed
/// title cell. Without such a pair the paragraph is dropped, never appended.
pub fn splice_permanent_link(fragment: &str, title_html: &str) -> String {
    let url = extract_url_from_html(title_html);
    let paragraph = format!("<p>永久地址：{}</p>", styled_anchor(&url, &url));
    fragment.replacen("<p></p>\n<p></p>", &paragraph, 1)
}

// ── Tests ──
