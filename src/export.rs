//! Static snapshot export.
//!
//! Writes every view as plain HTML files that work straight from disk:
//!
//! ```text
//! dist/
//! ├── index.html              # feed
//! ├── profiles/index.html
//! ├── report/index.html
//! ├── clipping/index.html     # feed + profiles, used for the clipping PDF
//! ├── post/<slug>.html        # one per post
//! └── static/                 # copy of the asset root, placeholders included
//! ```
//!
//! All links inside the snapshot are relative, so the directory can be
//! zipped, opened via `file://`, or dropped behind any static host. The
//! output directory is cleared before writing.

use crate::assets;
use crate::config::Project;
use crate::render::{self, Context, Links};
use crate::types::Dataset;
use maud::Markup;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to walk asset directory: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("refusing to export into {0}: it contains the project data or assets")]
    UnsafeOutputDir(PathBuf),
}

/// One written page, relative to the snapshot root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPage {
    pub label: String,
    pub path: PathBuf,
}

/// What an export produced, for CLI output.
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub output_dir: PathBuf,
    /// Section pages (feed, profiles, report, clipping) in write order.
    pub pages: Vec<WrittenPage>,
    /// Number of post detail pages. Posts sharing a page name count once.
    pub post_pages: usize,
    /// Files copied from the asset root.
    pub assets_copied: usize,
    /// Placeholders that had to be generated in the snapshot.
    pub placeholders_created: usize,
}

impl ExportReport {
    /// Absolute path of the page with `label`, if it was written.
    pub fn page_path(&self, label: &str) -> Option<PathBuf> {
        self.pages
            .iter()
            .find(|p| p.label == label)
            .map(|p| self.output_dir.join(&p.path))
    }
}

pub const FEED_PAGE: &str = "Feed";
pub const PROFILES_PAGE: &str = "Perfis";
pub const REPORT_PAGE: &str = "Relatório";
pub const CLIPPING_PAGE: &str = "Clipping";

/// Export the project's snapshot into its configured output directory.
pub fn export_project(project: &Project, dataset: &Dataset) -> Result<ExportReport, ExportError> {
    export_to(project, dataset, &project.export_dir())
}

/// Export a snapshot of `dataset` into `output_dir`.
pub fn export_to(
    project: &Project,
    dataset: &Dataset,
    output_dir: &Path,
) -> Result<ExportReport, ExportError> {
    guard_output_dir(project, output_dir)?;
    clear_dir(output_dir)?;

    let config = &project.config;
    let ctx = |depth| Context {
        site: &config.site,
        report: &config.report,
        links: Links::Snapshot { depth },
    };

    let mut report = ExportReport {
        output_dir: output_dir.to_path_buf(),
        ..ExportReport::default()
    };

    let sections: [(&str, &str, Markup); 4] = [
        (FEED_PAGE, "index.html", render::render_feed(&ctx(0), dataset)),
        (
            PROFILES_PAGE,
            "profiles/index.html",
            render::render_profiles(&ctx(1), dataset),
        ),
        (
            REPORT_PAGE,
            "report/index.html",
            render::render_report(&ctx(1), dataset),
        ),
        (
            CLIPPING_PAGE,
            "clipping/index.html",
            render::render_clipping(&ctx(1), dataset),
        ),
    ];
    for (label, rel, markup) in sections {
        write_page(output_dir, rel, markup)?;
        report.pages.push(WrittenPage {
            label: label.to_string(),
            path: PathBuf::from(rel),
        });
    }

    // first post per slug wins, as in `views::find_post`
    let mut written = HashSet::new();
    for post in &dataset.posts {
        let slug = render::post_slug(&post.post_id);
        let rel = format!("post/{slug}.html");
        if !written.insert(slug) {
            tracing::debug!(post_id = %post.post_id, page = %rel, "skipping duplicate post page");
            continue;
        }
        write_page(output_dir, &rel, render::render_post(&ctx(1), post))?;
        report.post_pages += 1;
    }

    let static_out = output_dir.join("static");
    report.assets_copied = copy_tree(&project.static_dir(), &static_out)?;
    report.placeholders_created = assets::ensure_placeholders(&static_out)?.len();

    tracing::info!(
        output = %output_dir.display(),
        posts = report.post_pages,
        assets = report.assets_copied,
        "snapshot exported"
    );
    Ok(report)
}

fn write_page(output_dir: &Path, rel: &str, markup: Markup) -> std::io::Result<()> {
    let path = output_dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, markup.into_string())
}

/// Reject output directories that would wipe the project's own inputs.
fn guard_output_dir(project: &Project, output_dir: &Path) -> Result<(), ExportError> {
    let out = normalize(output_dir);
    let inputs = [
        normalize(&project.root),
        normalize(&project.static_dir()),
        normalize(&project.data_path()),
    ];
    if inputs.iter().any(|input| input.starts_with(&out)) {
        return Err(ExportError::UnsafeOutputDir(output_dir.to_path_buf()));
    }
    Ok(())
}

fn normalize(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

fn clear_dir(dir: &Path) -> std::io::Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)?;
    }
    fs::create_dir_all(dir)
}

/// Copy every file under `src` into `dst`, preserving layout. A missing
/// `src` copies nothing.
fn copy_tree(src: &Path, dst: &Path) -> Result<usize, ExportError> {
    fs::create_dir_all(dst)?;
    if !src.is_dir() {
        tracing::warn!(path = %src.display(), "asset directory not found; snapshot has placeholders only");
        return Ok(0);
    }
    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry?;
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else if entry.file_type().is_file() {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}
