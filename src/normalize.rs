use std::sync::LazyLock;

use regex::Regex;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#+\s*").unwrap());

/// Strip leading `#` markers from a README first line.
pub fn strip_heading(line: &str) -> String {
    HEADING_RE.replace(line.trim(), "").to_string()
}

/// Derive the "final repo name" column from a raw title: drop leading `#`
/// markers, then truncate at the last `-` if one exists. Best-effort — a
/// title whose content legitimately contains `-` loses its tail too.
pub fn clean_final_repo_name(title: &str) -> String {
    if title.is_empty() {
        return String::new();
    }
    let name = strip_heading(title);
    match name.rfind('-') {
        Some(idx) => name[..idx].trim().to_string(),
        None => name.trim().to_string(),
    }
}

/// Per-line normalizer: strip leading `#` markers and trim every line
/// independently, preserving the line count. No truncation.
pub fn clean_text(text: &str) -> String {
    text.lines()
        .map(|line| HEADING_RE.replace(line.trim(), "").trim().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_heading_markers() {
        assert_eq!(clean_final_repo_name("## my-repo - mirror"), "my-repo");
        assert_eq!(clean_final_repo_name("#title"), "title");
    }

    #[test]
    fn truncates_at_last_dash() {
        assert_eq!(clean_final_repo_name("# a - b - c"), "a - b");
    }

    #[test]
    fn no_dash_passes_through() {
        assert_eq!(clean_final_repo_name("# Plain Title"), "Plain Title");
    }

    #[test]
    fn empty_title() {
        assert_eq!(clean_final_repo_name(""), "");
    }

    #[test]
    fn clean_text_preserves_line_count() {
        let input = "# one\n## two\nplain\n";
        let out = clean_text(input);
        assert_eq!(out.lines().count(), input.lines().count());
        assert!(out.lines().all(|l| !l.starts_with('#')));
        assert_eq!(out, "one\ntwo\nplain");
    }

    #[test]
    fn clean_text_no_truncation() {
        assert_eq!(clean_text("# a - b - c"), "a - b - c");
    }
}
