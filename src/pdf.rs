//! PDF printing through headless Chrome.
//!
//! Two documents are printed:
//!
//! - **clipping**: the `/clipping` page, feed followed by profiles
//! - **report**: the `/report` page, one A4 sheet per group of posts
//!
//! Pages come either from a running live server (`--base-url`) or, by
//! default, from a throwaway static snapshot opened via `file://`. Chrome is
//! driven over the DevTools protocol; each page gets `wait_ms` to settle
//! after navigation so remote images have a chance to load.

use crate::config::{PdfConfig, Project};
use crate::export::{self, CLIPPING_PAGE, ExportError, ExportReport, REPORT_PAGE};
use crate::types::Dataset;
use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// A4 in inches, as the DevTools protocol expects.
const A4_WIDTH_IN: f64 = 8.27;
const A4_HEIGHT_IN: f64 = 11.69;
const MM_PER_INCH: f64 = 25.4;

/// Characters escaped in `file://` URL paths.
const FILE_PATH: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'#').add(b'%').add(b'?');

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot export failed: {0}")]
    Export(#[from] ExportError),
    #[error("browser error: {0}")]
    Browser(String),
    #[error("{0} page missing from snapshot")]
    MissingPage(&'static str),
}

fn browser_err(err: impl std::fmt::Display) -> PdfError {
    PdfError::Browser(err.to_string())
}

/// One document to print.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfJob {
    pub label: &'static str,
    pub url: String,
    pub output: PathBuf,
}

/// A printed document.
#[derive(Debug, Clone)]
pub struct PdfFile {
    pub label: &'static str,
    pub url: String,
    pub path: PathBuf,
    pub bytes: usize,
}

/// Jobs printing from a live server at `base_url`.
pub fn jobs_for_base_url(project: &Project, base_url: &str) -> Vec<PdfJob> {
    let base = base_url.trim_end_matches('/');
    let pdf = &project.config.pdf;
    let dir = project.pdf_dir();
    vec![
        PdfJob {
            label: CLIPPING_PAGE,
            url: format!("{base}/clipping"),
            output: dir.join(&pdf.clipping_file),
        },
        PdfJob {
            label: REPORT_PAGE,
            url: format!("{base}/report"),
            output: dir.join(&pdf.report_file),
        },
    ]
}

/// Jobs printing from an exported snapshot.
pub fn jobs_for_snapshot(project: &Project, snapshot: &ExportReport) -> Result<Vec<PdfJob>, PdfError> {
    let pdf = &project.config.pdf;
    let dir = project.pdf_dir();
    let page = |label: &'static str| -> Result<String, PdfError> {
        let path = snapshot
            .page_path(label)
            .ok_or(PdfError::MissingPage(label))?;
        Ok(file_url(&path))
    };
    Ok(vec![
        PdfJob {
            label: CLIPPING_PAGE,
            url: page(CLIPPING_PAGE)?,
            output: dir.join(&pdf.clipping_file),
        },
        PdfJob {
            label: REPORT_PAGE,
            url: page(REPORT_PAGE)?,
            output: dir.join(&pdf.report_file),
        },
    ])
}

/// `file://` URL for an absolute path.
pub fn file_url(path: &Path) -> String {
    let absolute = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let raw = absolute.to_string_lossy().replace('\\', "/");
    let encoded = utf8_percent_encode(&raw, FILE_PATH).to_string();
    if encoded.starts_with('/') {
        format!("file://{encoded}")
    } else {
        format!("file:///{encoded}")
    }
}

/// Print settings: A4, configured margins, backgrounds on, page numbers in
/// the footer.
pub fn print_options(config: &PdfConfig, title: &str) -> PrintToPdfOptions {
    let m = &config.margins;
    PrintToPdfOptions {
        landscape: Some(false),
        display_header_footer: Some(true),
        print_background: Some(true),
        paper_width: Some(A4_WIDTH_IN),
        paper_height: Some(A4_HEIGHT_IN),
        margin_top: Some(m.top / MM_PER_INCH),
        margin_bottom: Some(m.bottom / MM_PER_INCH),
        margin_left: Some(m.left / MM_PER_INCH),
        margin_right: Some(m.right / MM_PER_INCH),
        header_template: Some(header_template(title)),
        footer_template: Some(FOOTER_TEMPLATE.to_string()),
        prefer_css_page_size: Some(true),
        ..Default::default()
    }
}

fn header_template(title: &str) -> String {
    maud::html! {
        div style="font-size:8px;width:100%;padding:0 14mm;color:#888;" {
            (title)
        }
    }
    .into_string()
}

const FOOTER_TEMPLATE: &str = r#"<div style="font-size:8px;width:100%;padding:0 14mm;color:#888;text-align:right;"><span class="pageNumber"></span> / <span class="totalPages"></span></div>"#;

/// Print every job with one browser instance.
pub fn print_jobs(project: &Project, jobs: &[PdfJob]) -> Result<Vec<PdfFile>, PdfError> {
    let config = &project.config.pdf;
    fs::create_dir_all(project.pdf_dir())?;

    let launch = LaunchOptions::default_builder()
        .headless(true)
        .window_size(Some((1280, 1800)))
        .build()
        .map_err(browser_err)?;
    let browser = Browser::new(launch).map_err(browser_err)?;
    let title = &project.config.site.title;

    let mut files = Vec::with_capacity(jobs.len());
    for job in jobs {
        tracing::info!(page = job.label, url = %job.url, "printing");
        let tab = browser.new_tab().map_err(browser_err)?;
        tab.navigate_to(&job.url)
            .map_err(browser_err)?
            .wait_until_navigated()
            .map_err(browser_err)?;
        std::thread::sleep(Duration::from_millis(config.wait_ms));

        let doc_title = format!("{title} — {}", job.label);
        let bytes = tab
            .print_to_pdf(Some(print_options(config, &doc_title)))
            .map_err(browser_err)?;
        fs::write(&job.output, &bytes)?;
        if let Err(err) = tab.close(true) {
            tracing::debug!(page = job.label, error = %err, "could not close tab");
        }

        files.push(PdfFile {
            label: job.label,
            url: job.url.clone(),
            path: job.output.clone(),
            bytes: bytes.len(),
        });
    }
    Ok(files)
}

/// Print both documents.
///
/// With `base_url`, pages are fetched from that live server. Otherwise a
/// temporary snapshot of `dataset` is exported and printed from disk; it is
/// removed afterwards.
pub fn print_project(
    project: &Project,
    dataset: &Dataset,
    base_url: Option<&str>,
) -> Result<Vec<PdfFile>, PdfError> {
    match base_url {
        Some(base) => print_jobs(project, &jobs_for_base_url(project, base)),
        None => {
            let snapshot_dir = tempfile::Builder::new().prefix("insta-clip-").tempdir()?;
            let snapshot = export::export_to(project, dataset, snapshot_dir.path())?;
            tracing::debug!(dir = %snapshot_dir.path().display(), "printing from temporary snapshot");
            print_jobs(project, &jobs_for_snapshot(project, &snapshot)?)
        }
    }
}
