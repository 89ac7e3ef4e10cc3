mod archive;
mod extract;
mod normalize;
mod pipeline;
mod sheet;

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use extract::Record;
use pipeline::inject::RandomPicker;

const EXPORT_HEADER: [&str; 4] = ["Repo", "Title", "Body", "Final Name"];
const HTML_HEADER: [&str; 2] = ["Title", "Body"];

#[derive(Parser)]
#[command(
    name = "repo_export",
    about = "README corpus → spreadsheet exporter with an HTML rewrite stage"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract one README per folder into a 4-column spreadsheet
    Export {
        /// Corpus directory or .zip archive
        input: PathBuf,
        #[arg(short, long, default_value = "repos.xlsx")]
        output: PathBuf,
    },
    /// HTML-rewrite the first two columns of an already-exported spreadsheet
    Transform {
        input: PathBuf,
        #[arg(short, long, default_value = "repos_html.xlsx")]
        output: PathBuf,
    },
    /// Extract + HTML-rewrite in one pipeline
    Run {
        /// Corpus directory or .zip archive
        input: PathBuf,
        #[arg(short, long, default_value = "repos_html.xlsx")]
        output: PathBuf,
    },
    /// Preview extracted records without writing a file
    List {
        input: PathBuf,
        /// Emit records as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Export { input, output } => {
            let source = resolve_input(&input)?;
            let records = extract::collect_records(source.path())?;
            if records.is_empty() {
                warn!("no data to export from {}", input.display());
                return Ok(());
            }
            let rows: Vec<Vec<String>> = records
                .iter()
                .map(|r| {
                    vec![
                        r.repo.clone(),
                        r.title.clone(),
                        r.body.clone(),
                        r.final_name.clone(),
                    ]
                })
                .collect();
            sheet::write_rows(&output, &EXPORT_HEADER, &rows)?;
            println!("Exported {} repos to {}", rows.len(), output.display());
            Ok(())
        }
        Commands::Transform { input, output } => transform_spreadsheet(&input, &output),
        Commands::Run { input, output } => {
            let source = resolve_input(&input)?;
            let records = extract::collect_records(source.path())?;
            if records.is_empty() {
                warn!("no data to export from {}", input.display());
                return Ok(());
            }
            let cells: Vec<(String, String)> = records
                .iter()
                .map(|r| (r.title.clone(), r.body.clone()))
                .collect();
            let transformed = transform_cells(&cells)?;
            sheet::write_rows(&output, &HTML_HEADER, &transformed)?;
            println!(
                "Extracted and transformed {} repos to {}",
                transformed.len(),
                output.display()
            );
            Ok(())
        }
        Commands::List { input, json } => {
            let source = resolve_input(&input)?;
            let records = extract::collect_records(source.path())?;
            if records.is_empty() {
                warn!("no records found in {}", input.display());
                return Ok(());
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print_records(&records);
            }
            Ok(())
        }
    }
}

/// Either a plain directory or a zip archive extracted into a scoped temp
/// dir; the temp dir lives as long as this value.
enum InputSource {
    Dir(PathBuf),
    Zip(archive::ExtractedArchive),
}

impl InputSource {
    fn path(&self) -> &Path {
        match self {
            InputSource::Dir(path) => path,
            InputSource::Zip(extracted) => extracted.root(),
        }
    }
}

fn resolve_input(input: &Path) -> Result<InputSource> {
    let is_zip = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
    if is_zip {
        Ok(InputSource::Zip(archive::extract_zip(input)?))
    } else {
        Ok(InputSource::Dir(input.to_path_buf()))
    }
}

/// The `transform` stage: read an uploaded sheet, HTML-rewrite its
/// title/body columns, and write a 2-column sheet.
fn transform_spreadsheet(input: &Path, output: &Path) -> Result<()> {
    let rows = sheet::read_rows(input)?;
    // First row is the header written by `export`.
    let Some((header, data)) = rows.split_first() else {
        warn!("no data in {}", input.display());
        return Ok(());
    };
    if header.len() < 2 {
        bail!(
            "{} has {} column(s); HTML processing needs at least 2",
            input.display(),
            header.len()
        );
    }
    let (title_idx, body_idx) = title_body_indices(header);
    let cells: Vec<(String, String)> = data
        .iter()
        .map(|row| {
            let title = row.get(title_idx).cloned().unwrap_or_default();
            let body = row.get(body_idx).cloned().unwrap_or_default();
            (title, body)
        })
        .collect();
    if cells.is_empty() {
        warn!("no data rows in {}", input.display());
        return Ok(());
    }
    let transformed = transform_cells(&cells)?;
    sheet::write_rows(output, &HTML_HEADER, &transformed)?;
    println!("Transformed {} rows to {}", transformed.len(), output.display());
    Ok(())
}

/// Locate the title/body columns in an uploaded sheet. The 4-column `export`
/// layout puts Repo first, so the columns are found by header name; sheets
/// without recognizable headers fall back to the first two columns.
fn title_body_indices(header: &[String]) -> (usize, usize) {
    let find = |name: &str| header.iter().position(|h| h.eq_ignore_ascii_case(name));
    match (find("Title"), find("Body")) {
        (Some(title), Some(body)) => (title, body),
        _ => (0, 1),
    }
}

fn transform_cells(cells: &[(String, String)]) -> Result<Vec<Vec<String>>> {
    let pb = ProgressBar::new(cells.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len}")?
            .progress_chars("=> "),
    );

    let mut picker = RandomPicker;
    let mut out = Vec::with_capacity(cells.len());
    for (title, body) in cells {
        let row = pipeline::transform_row(title, body, &mut picker);
        out.push(vec![row.title_html, row.body_html]);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(out)
}

fn print_records(records: &[Record]) {
    println!(
        "{:>3} | {:<24} | {:<32} | {:<24} | {:>5}",
        "#", "Repo", "Title", "Final Name", "Body"
    );
    println!("{}", "-".repeat(100));
    for (i, r) in records.iter().enumerate() {
        println!(
            "{:>3} | {:<24} | {:<32} | {:<24} | {:>5}",
            i + 1,
            truncate(&r.repo, 24),
            truncate(&r.title, 32),
            truncate(&r.final_name, 24),
            r.body.lines().count(),
        );
    }
    println!("\n{} records | body column shows line count", records.len());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::pipeline::inject::LINK_POOL;

    #[test]
    fn end_to_end_directory_to_spreadsheet() {
        let tmp = tempfile::tempdir().unwrap();
        let corpus = tmp.path().join("corpus");
        fs::create_dir(&corpus).unwrap();
        let one = corpus.join("one");
        fs::create_dir(&one).unwrap();
        fs::write(one.join("README.md"), "# Title One\nBody line").unwrap();
        fs::create_dir(corpus.join("two")).unwrap(); // no README.md

        let records = extract::collect_records(&corpus).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Title One");
        assert_eq!(records[0].body, "Body line");

        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|r| {
                vec![
                    r.repo.clone(),
                    r.title.clone(),
                    r.body.clone(),
                    r.final_name.clone(),
                ]
            })
            .collect();
        let out = tmp.path().join("repos.xlsx");
        sheet::write_rows(&out, &EXPORT_HEADER, &rows).unwrap();

        let back = sheet::read_rows(&out).unwrap();
        assert_eq!(back.len(), 2); // header + one data row
        assert_eq!(back[0], EXPORT_HEADER.map(String::from).to_vec());
        assert_eq!(back[1][1], "Title One");
    }

    #[test]
    fn end_to_end_transform_stage() {
        let cells = vec![("My Repo".to_string(), "intro\n\n\nrest".to_string())];
        let transformed = transform_cells(&cells).unwrap();
        assert_eq!(transformed.len(), 1);
        let title_html = &transformed[0][0];
        let body_html = &transformed[0][1];
        assert!(LINK_POOL.iter().any(|h| title_html.contains(h)));
        assert!(body_html.contains("永久地址"));
    }

    #[test]
    fn resolve_input_passes_directories_through() {
        let tmp = tempfile::tempdir().unwrap();
        let source = resolve_input(tmp.path()).unwrap();
        assert_eq!(source.path(), tmp.path());
    }

    #[test]
    fn title_body_found_by_header_name() {
        let export_header: Vec<String> = EXPORT_HEADER.map(String::from).to_vec();
        assert_eq!(title_body_indices(&export_header), (1, 2));

        let html_header: Vec<String> = HTML_HEADER.map(String::from).to_vec();
        assert_eq!(title_body_indices(&html_header), (0, 1));

        let unknown: Vec<String> = vec!["X".into(), "Y".into()];
        assert_eq!(title_body_indices(&unknown), (0, 1));
    }

    #[test]
    fn export_output_feeds_transform() {
        let tmp = tempfile::tempdir().unwrap();
        let corpus = tmp.path().join("corpus");
        fs::create_dir(&corpus).unwrap();
        let repo = corpus.join("repo-folder-name");
        fs::create_dir(&repo).unwrap();
        fs::write(repo.join("README.md"), "# Real Title\nReal body text").unwrap();

        let records = extract::collect_records(&corpus).unwrap();
        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|r| {
                vec![
                    r.repo.clone(),
                    r.title.clone(),
                    r.body.clone(),
                    r.final_name.clone(),
                ]
            })
            .collect();
        let exported = tmp.path().join("repos.xlsx");
        sheet::write_rows(&exported, &EXPORT_HEADER, &rows).unwrap();

        let transformed_path = tmp.path().join("repos_html.xlsx");
        transform_spreadsheet(&exported, &transformed_path).unwrap();

        let back = sheet::read_rows(&transformed_path).unwrap();
        assert_eq!(back.len(), 2);
        let title_html = &back[1][0];
        let body_html = &back[1][1];
        // The title column gets the link injection, not the folder name.
        assert!(title_html.contains("Real Title"));
        assert!(!title_html.contains("repo-folder-name"));
        assert!(body_html.contains("Real body text"));
    }

    #[test]
    fn transform_rejects_single_column_sheet() {
        let tmp = tempfile::tempdir().unwrap();
        let narrow = tmp.path().join("narrow.xlsx");
        let rows = vec![vec!["only title".to_string()]];
        sheet::write_rows(&narrow, &["Title"], &rows).unwrap();

        let out = tmp.path().join("out.xlsx");
        let err = transform_spreadsheet(&narrow, &out).unwrap_err();
        assert!(err.to_string().contains("at least 2"));
        assert!(!out.exists());
    }

    #[test]
    fn truncate_respects_column_width() {
        assert_eq!(truncate("short", 24), "short");
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
        assert_eq!(truncate("abcdefghij", 8).chars().count(), 8);
    }
}
