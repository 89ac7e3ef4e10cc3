use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{debug, warn};

use crate::normalize::{clean_final_repo_name, strip_heading};

const DOC_NAME: &str = "README.md";

/// One extracted document: folder name, heading-stripped title, body, and
/// the derived final-name column.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    pub repo: String,
    pub title: String,
    pub body: String,
    pub final_name: String,
}

/// One Record per immediate subdirectory of `base` that contains `README.md`.
/// Folders without the file are skipped silently; files that exist but fail
/// to read (I/O error, invalid UTF-8) are skipped with a warning. Order is
/// deterministic (sorted by folder name).
pub fn collect_records(base: &Path) -> Result<Vec<Record>> {
    if !base.is_dir() {
        bail!("input directory not found: {}", base.display());
    }

    let mut dirs: Vec<_> = fs::read_dir(base)
        .with_context(|| format!("reading {}", base.display()))?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    let mut records = Vec::new();
    for dir in dirs {
        let repo = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let doc = dir.join(DOC_NAME);
        if !doc.is_file() {
            debug!("no {} in {}, skipping", DOC_NAME, repo);
            continue;
        }

        let content = match fs::read_to_string(&doc) {
            Ok(content) => content,
            Err(err) => {
                warn!("skipping unreadable {}: {}", doc.display(), err);
                continue;
            }
        };

        records.push(split_document(&repo, &content));
    }

    Ok(records)
}

fn split_document(repo: &str, content: &str) -> Record {
    let content = content.trim();
    let mut lines = content.lines();
    let first = lines.next().unwrap_or("").trim();
    let body = lines.collect::<Vec<_>>().join("\n").trim().to_string();

    Record {
        repo: repo.to_string(),
        title: strip_heading(first),
        body,
        final_name: clean_final_repo_name(first),
    }
}

// ── Tests ──
