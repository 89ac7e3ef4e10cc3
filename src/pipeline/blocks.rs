use std::sync::LazyLock;

use regex::Regex;

use super::inject::{DENYLIST, FULL_MARKER};
use super::links::{escape_html, md_links_to_html, styled_anchor};

static BULLET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*[-*•]\s+(.*)$").unwrap());

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(String),
    List(Vec<String>),
    Blank,
}

/// Convert one spreadsheet cell into an HTML fragment. Empty input yields an
/// empty string, not an empty paragraph. `column_a` enables the bare-value
/// anchor replacement after the link-address marker.
pub fn convert_cell_to_html(cell: &str, column_a: bool) -> String {
    if cell.is_empty() {
        return String::new();
    }
    let normalized = cell.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.lines().map(str::trim_end).collect();
    let kept = filter_denylisted(&lines);
    let blocks = classify_lines(&kept);
    render_blocks(&blocks, column_a)
}

/// Drop every line containing a denylisted token. Runs before
/// classification, so a denylisted bullet line never opens a list.
pub fn filter_denylisted<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    lines
        .iter()
        .copied()
        .filter(|line| !DENYLIST.iter().any(|token| line.contains(token)))
        .collect()
}

/// Two-state line scanner: a blank line flushes any pending list and emits a
/// Blank block; a bullet line accumulates into the pending list; anything
/// else flushes and becomes a Paragraph.
pub fn classify_lines(lines: &[&str]) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(lines.len());
    let mut items: Vec<String> = Vec::new();

    for line in lines {
        if line.trim().is_empty() {
            flush_list(&mut items, &mut blocks);
            blocks.push(Block::Blank);
        } else if let Some(caps) = BULLET_RE.captures(line) {
            items.push(caps[1].to_string());
        } else {
            flush_list(&mut items, &mut blocks);
            blocks.push(Block::Paragraph(line.to_string()));
        }
    }
    flush_list(&mut items, &mut blocks);

    blocks
}

fn flush_list(items: &mut Vec<String>, blocks: &mut Vec<Block>) {
    if !items.is_empty() {
        blocks.push(Block::List(std::mem::take(items)));
    }
}

fn render_blocks(blocks: &[Block], column_a: bool) -> String {
    let mut out = Vec::with_capacity(blocks.len());

    for block in blocks {
        match block {
            Block::Blank => out.push("<p></p>".to_string()),
            Block::List(items) => {
                let lis: Vec<String> = items
                    .iter()
                    .map(|item| {
                        let rewritten = md_links_to_html(item);
                        let text = if rewritten.contains("<a ") {
                            rewritten
                        } else {
                            escape_html(item)
                        };
                        format!("<li>{}</li>", text)
                    })
                    .collect();
                out.push(format!("<ul>\n{}\n</ul>", lis.join("\n")));
            }
            Block::Paragraph(line) => {
                let mut text = md_links_to_html(line);
                if column_a {
                    text = anchor_marker_value(&text);
                }
                // Escape only anchor-free lines; escaping again would mangle
                // already-built anchor markup.
                let text = if text.contains("<a ") {
                    text
                } else {
                    escape_html(line)
                };
                out.push(format!("<p>{}</p>", text));
            }
        }
    }

    out.join("\n")
}

/// Column-A special case: `【链接地址：】<bare value>` gets the bare value
/// replaced by an anchor whose href and visible text both equal the value.
fn anchor_marker_value(line: &str) -> String {
    if let Some(idx) = line.find(FULL_MARKER) {
        let (head, rest) = line.split_at(idx + FULL_MARKER.len());
        let value = rest.trim();
        if !value.is_empty() {
            return format!("{}{}", head, styled_anchor(value, value));
        }
    }
    line.to_string()
}

// ── Tests ──
