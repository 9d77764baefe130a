//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (post, profile, page) is its semantic identity, its
//! positional index plus id or handle, with file paths and secondary
//! details shown as indented context lines.
//!
//! # Output Format
//!
//! ## Inspect
//!
//! ```text
//! Posts (newest first)
//! 001 p3 @ana 10/05/2024 09:30
//!     Caption: Praia
//!     Image: (placeholder)
//!     Stats: 300 likes, 1 comments, 12 shares
//!
//! Profiles
//! 001 @ana Ana Souza (2 posts)
//!     Followers: 1.200
//!     Totals: 420 likes, 17 shares
//!
//! Summary
//!     5 posts, 4 profiles, 3 dated
//!     Source: data/posts.xlsx
//! ```
//!
//! ## Export
//!
//! ```text
//! Feed → index.html
//! Perfis → profiles/index.html
//! Relatório → report/index.html
//! Clipping → clipping/index.html
//!
//! Exported 5 post pages, 3 assets to dist
//! ```
//!
//! ## PDF
//!
//! ```text
//! Clipping → exports/clipping.pdf (184 KB)
//!     Source: http://localhost:5000/clipping
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::export::ExportReport;
use crate::images::ImageRef;
use crate::pdf::PdfFile;
use crate::render::{format_count, format_timestamp};
use crate::types::Dataset;
use crate::views;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    }
}

fn image_label(image: &ImageRef) -> String {
    match image {
        _ if image.is_placeholder() => "(placeholder)".to_string(),
        ImageRef::Local(path) => format!("static/{path}"),
        ImageRef::External(url) => url.clone(),
    }
}

fn format_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{} KB", bytes / 1024)
    } else {
        format!("{bytes} B")
    }
}

// ============================================================================
// Inspect
// ============================================================================

/// Format the loaded dataset: feed in display order, then profiles, then totals.
pub fn format_inspect_output(dataset: &Dataset, source: &Path, date_format: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let pad = indent(1);

    lines.push("Posts (newest first)".to_string());
    let feed = views::feed(dataset);
    if feed.is_empty() {
        lines.push(format!("{pad}(none)"));
    }
    for (i, post) in feed.iter().enumerate() {
        let when = post
            .posted_at
            .as_ref()
            .map(|dt| format_timestamp(dt, date_format))
            .unwrap_or_else(|| "(undated)".to_string());
        lines.push(format!(
            "{} {} @{} {}",
            format_index(i + 1),
            post.post_id,
            post.author_username,
            when
        ));
        if !post.caption.is_empty() {
            lines.push(format!("{pad}Caption: {}", truncate(&post.caption, 60)));
        }
        lines.push(format!("{pad}Image: {}", image_label(&post.post_image_ref)));
        lines.push(format!(
            "{pad}Stats: {} likes, {} comments, {} shares",
            post.likes, post.comments_count, post.shares_count
        ));
    }

    lines.push(String::new());
    lines.push("Profiles".to_string());
    if dataset.profiles.is_empty() {
        lines.push(format!("{pad}(none)"));
    }
    for (i, profile) in dataset.profiles.iter().enumerate() {
        lines.push(format!(
            "{} @{} {} ({} posts)",
            format_index(i + 1),
            profile.username,
            profile.name,
            profile.total_posts
        ));
        lines.push(format!("{pad}Followers: {}", format_count(profile.followers)));
        lines.push(format!(
            "{pad}Totals: {} likes, {} shares",
            profile.total_likes, profile.total_shares
        ));
    }

    let summary = views::summarize(dataset);
    lines.push(String::new());
    lines.push("Summary".to_string());
    lines.push(format!(
        "{pad}{} posts, {} profiles, {} dated",
        summary.posts, summary.authors, summary.dated
    ));
    lines.push(format!("{pad}Source: {}", source.display()));
    lines
}

pub fn print_inspect_output(dataset: &Dataset, source: &Path, date_format: &str) {
    for line in format_inspect_output(dataset, source, date_format) {
        println!("{}", line);
    }
}

// ============================================================================
// Export
// ============================================================================

/// Format export output: each section page, then the totals line.
pub fn format_export_output(report: &ExportReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .pages
        .iter()
        .map(|page| format!("{} → {}", page.label, page.path.display()))
        .collect();
    lines.push(String::new());
    lines.push(format!(
        "Exported {} post pages, {} assets to {}",
        report.post_pages,
        report.assets_copied,
        report.output_dir.display()
    ));
    if report.placeholders_created > 0 {
        lines.push(format!(
            "{}Added {} placeholder images",
            indent(1),
            report.placeholders_created
        ));
    }
    lines
}

pub fn print_export_output(report: &ExportReport) {
    for line in format_export_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// PDF
// ============================================================================

/// Format PDF output: one entry per printed document with its source URL.
pub fn format_pdf_output(files: &[PdfFile]) -> Vec<String> {
    let mut lines = Vec::new();
    for file in files {
        lines.push(format!(
            "{} → {} ({})",
            file.label,
            file.path.display(),
            format_size(file.bytes)
        ));
        lines.push(format!("{}Source: {}", indent(1), file.url));
    }
    lines
}

pub fn print_pdf_output(files: &[PdfFile]) {
    for line in format_pdf_output(files) {
        println!("{}", line);
    }
}
