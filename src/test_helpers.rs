//! Shared test utilities for the insta-clip test suite.
//!
//! Provides table builders, workbook fixtures written with `rust_xlsxwriter`,
//! and lookup helpers that panic with a readable message on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let table = TableBuilder::new(&["post_id", "likes"])
//!     .row(&["p1", "10"])
//!     .build();
//! let dataset = loader::load(&table);
//! assert_eq!(find_post(&dataset, "p1").likes, 10);
//! ```

use crate::images::ImageRef;
use crate::table::{Cell, Table};
use crate::types::{Dataset, Post};
use chrono::NaiveDateTime;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::path::Path;
use tempfile::TempDir;

// =========================================================================
// Tables and workbooks
// =========================================================================

/// Builds an in-memory [`Table`] from string rows. Empty strings become
/// [`Cell::Empty`].
pub struct TableBuilder {
    table: Table,
}

impl TableBuilder {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            table: Table::new(headers),
        }
    }

    pub fn row(mut self, cells: &[&str]) -> Self {
        let row = cells
            .iter()
            .map(|c| if c.is_empty() { Cell::Empty } else { Cell::from(*c) })
            .collect();
        self.table.push_row(row);
        self
    }

    pub fn build(self) -> Table {
        self.table
    }
}

/// Write a single-sheet xlsx workbook with the given header and rows.
pub fn write_workbook(path: &Path, headers: &[&str], rows: &[Vec<Cell>]) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        let r = r as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Empty => {}
                Cell::Text(s) => {
                    sheet.write_string(r, col, s).unwrap();
                }
                Cell::Number(n) => {
                    sheet.write_number(r, col, *n).unwrap();
                }
                Cell::Bool(b) => {
                    sheet.write_boolean(r, col, *b).unwrap();
                }
                Cell::DateTime(dt) => {
                    let stamp = dt.format("%Y-%m-%d %H:%M:%S").to_string();
                    let excel = ExcelDateTime::parse_from_str(&stamp).unwrap();
                    sheet
                        .write_datetime_with_format(r, col, &excel, &date_format)
                        .unwrap();
                }
            }
        }
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    workbook.save(path).unwrap();
}

/// The column set of a fully populated sheet.
pub const FULL_HEADERS: &[&str] = &[
    "post_id",
    "actor_username",
    "actor_name",
    "actor_avatar_url",
    "actor_bio",
    "actor_followers",
    "actor_following",
    "post_image_url",
    "post_caption",
    "post_datetime",
    "likes",
    "comments_count",
    "shares_count",
    "comment_1",
    "comment_2",
];

/// Three authors, five posts, a mix of dated and undated rows.
pub fn sample_rows() -> Vec<Vec<Cell>> {
    let rows: [[&str; 15]; 5] = [
        [
            "p1", "ana", "Ana Souza", "/static/avatars/ana.png", "Fotógrafa", "1200", "300",
            "https://cdn.example/p1.jpg", "Pôr do sol <3", "2024-03-01 18:00", "120", "2", "5",
            "Linda!", "",
        ],
        [
            "p2", "bia", "", "", "", "80", "90", "/static/images/p2.jpg", "Café", "", "15", "0",
            "1", "", "",
        ],
        [
            "p3", "ana", "Ana S.", "", "outra bio", "1", "1", "", "Praia", "2024-05-10 09:30",
            "300", "1", "12", "Uau", "Quero ir",
        ],
        [
            "", "", "", "", "", "", "", "", "Sem autor", "not a date", "abc", "", "", "", "",
        ],
        [
            "p5", "caio", "Caio", "https://cdn.example/caio.png", "", "10", "10",
            "https://cdn.example/p5.jpg", "", "2024-05-10 09:30", "7", "0", "0", "", "",
        ],
    ];
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|c| if c.is_empty() { Cell::Empty } else { Cell::from(*c) })
                .collect()
        })
        .collect()
}

/// A project directory with `data/posts.xlsx` holding [`sample_rows`].
pub fn setup_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_workbook(&tmp.path().join("data/posts.xlsx"), FULL_HEADERS, &sample_rows());
    tmp
}

/// [`sample_rows`] loaded in memory.
pub fn sample_dataset() -> Dataset {
    let mut table = Table::new(FULL_HEADERS);
    for row in sample_rows() {
        table.push_row(row);
    }
    crate::loader::load(&table)
}

// =========================================================================
// Post fixtures and lookups
// =========================================================================

/// A minimal post with the given row index and optional `%Y-%m-%d %H:%M:%S`
/// timestamp.
pub fn post_at(source_index: usize, posted_at: Option<&str>) -> Post {
    Post {
        source_index,
        post_id: source_index.to_string(),
        author_username: "usuario".to_string(),
        author_name: "Usuário".to_string(),
        author_avatar_ref: ImageRef::placeholder(true),
        author_bio: String::new(),
        author_followers: 0,
        author_following: 0,
        post_image_ref: ImageRef::placeholder(false),
        caption: String::new(),
        posted_at: posted_at
            .map(|s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()),
        likes: 0,
        comments_count: 0,
        shares_count: 0,
        comments: Vec::new(),
    }
}

/// Find a post by id. Panics if not found.
pub fn find_post<'a>(dataset: &'a Dataset, post_id: &str) -> &'a Post {
    dataset
        .posts
        .iter()
        .find(|p| p.post_id == post_id)
        .unwrap_or_else(|| {
            let ids: Vec<&str> = dataset.posts.iter().map(|p| p.post_id.as_str()).collect();
            panic!("post '{post_id}' not found. Available: {ids:?}")
        })
}
