pub mod blocks;
pub mod inject;
pub mod links;

use crate::normalize::clean_text;
use blocks::convert_cell_to_html;
use inject::{create_column_a_content, splice_permanent_link, HostPicker, MARKER_OPEN};

pub struct TransformedRow {
    pub title_html: String,
    pub body_html: String,
}

/// Two-cell pipeline: title → column-A HTML (marker anchoring for titles that
/// already carry the link-address marker, random host injection otherwise),
/// body → fragment with the permanent-link paragraph spliced in.
pub fn transform_row(title: &str, body: &str, picker: &mut dyn HostPicker) -> TransformedRow {
    let title_html = if title.contains(MARKER_OPEN) {
        convert_cell_to_html(title, true)
    } else {
        create_column_a_content(title, picker)
    };

    let fragment = convert_cell_to_html(&clean_text(body), false);
    let body_html = splice_permanent_link(&fragment, &title_html);

    TransformedRow { title_html, body_html }
}

// ── Tests ──
