//! # Insta Clip
//!
//! Turns a spreadsheet of social-media posts into a browsable feed, author
//! profiles, a printable report and PDF clippings. The spreadsheet is the
//! only data source: a hand-maintained sheet with one row per post.
//!
//! # Architecture
//!
//! ```text
//! posts.xlsx → table → loader → Dataset → views → render → live server
//!                                                        → static snapshot
//!                                                        → PDF (headless Chrome)
//! ```
//!
//! The loader never fails: a missing or unreadable spreadsheet yields an
//! empty dataset and every page renders an empty state. Every cell is
//! optional and every malformed value falls back to a default, so a
//! half-filled sheet still produces a complete site.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`table`] | Reads the first sheet of a workbook into header-addressed cells |
//! | [`coerce`] | Lenient cell conversions: text, counts, timestamps |
//! | [`images`] | Resolves image cells to local assets, external URLs or placeholders |
//! | [`loader`] | Normalizes rows into posts and folds them into profiles |
//! | [`ordering`] | Feed order: newest first, undated last, ties by sheet row |
//! | [`types`] | `Post`, `Profile`, `Dataset` |
//! | [`views`] | Feed, lookup, report pagination and totals |
//! | [`render`] | Maud templates for every page, live or snapshot links |
//! | [`assets`] | Embedded stylesheet and placeholder images |
//! | [`export`] | Writes the static snapshot |
//! | [`server`] | axum live view |
//! | [`pdf`] | Prints the clipping and the report through headless Chrome |
//! | [`config`] | `config.toml` loading, merging with stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Re-read On Every Request
//!
//! The live view loads the spreadsheet per request instead of caching it.
//! Sheets are small and edited by hand while the server runs; a reload in
//! the browser always shows the current file.
//!
//! ## One Template Set, Two Link Styles
//!
//! Pages are rendered by the same Maud functions for the server and the
//! snapshot. Only [`render::Links`] differs: absolute routes live, relative
//! file paths on disk, so a snapshot opens from `file://` with working
//! navigation and images.
//!
//! ## Single Clipping Document
//!
//! The clipping PDF prints one page that holds the feed followed by the
//! profiles, separated by a CSS page break, so the two parts share one
//! page-numbered document.

pub mod assets;
pub mod coerce;
pub mod config;
pub mod export;
pub mod images;
pub mod loader;
pub mod ordering;
pub mod output;
pub mod pdf;
pub mod render;
pub mod server;
pub mod table;
pub mod types;
pub mod views;

#[cfg(test)]
pub(crate) mod test_helpers;
