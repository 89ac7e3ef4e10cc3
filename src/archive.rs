use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::TempDir;
use tracing::debug;
use zip::ZipArchive;

/// An extracted archive. The temp dir is deleted when this is dropped, on
/// every exit path.
pub struct ExtractedArchive {
    _dir: TempDir,
    root: PathBuf,
}

impl ExtractedArchive {
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Extract a zip archive into a scoped temp dir. Entry paths are sanitized
/// via `enclosed_name`; entries escaping the target dir are skipped. If the
/// archive wraps everything in a single top-level folder, the returned root
/// points inside it.
pub fn extract_zip(path: &Path) -> Result<ExtractedArchive> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut archive =
        ZipArchive::new(file).with_context(|| format!("reading zip {}", path.display()))?;
    let dir = tempfile::tempdir().context("creating temp dir")?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(rel) = entry.enclosed_name() else {
            debug!("skipping unsafe zip entry {:?}", entry.name());
            continue;
        };
        let target = dir.path().join(rel);
        if entry.is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&target)
                .with_context(|| format!("extracting {}", target.display()))?;
            io::copy(&mut entry, &mut out)?;
        }
    }

    let root = unwrap_single_folder(dir.path())?;
    Ok(ExtractedArchive { root, _dir: dir })
}

/// Common zip layout: one wrapping folder holding the per-repo directories.
fn unwrap_single_folder(base: &Path) -> Result<PathBuf> {
    let entries: Vec<PathBuf> = fs::read_dir(base)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|e| e.path())
        .collect();

    match entries.as_slice() {
        [only] if only.is_dir() => Ok(only.clone()),
        _ => Ok(base.to_path_buf()),
    }
}

// ── Tests ──
