//! Spreadsheet rows → normalized posts and author profiles.
//!
//! ## Recognized columns
//!
//! ```text
//! post_id  actor_username  actor_name  actor_avatar_url  actor_bio
//! actor_followers  actor_following  post_image_url  post_caption
//! post_datetime  likes  comments_count  shares_count  comment_1 .. comment_10
//! ```
//!
//! Any of them may be missing from the sheet; a missing column reads as blank
//! on every row. Extra columns are ignored.
//!
//! ## Defaults
//!
//! | Field             | When blank                                   |
//! |-------------------|----------------------------------------------|
//! | `post_id`         | row index                                    |
//! | `author_username` | `usuario`                                    |
//! | `author_name`     | raw `actor_username`, then `Usuário`         |
//! | counts            | `0` (also for non-numeric text)              |
//! | `posted_at`       | `None` (also for unparseable text)           |
//! | images            | placeholder, see [`crate::images`]           |
//! | bio, caption      | empty string                                 |
//!
//! Loading never fails on cell contents. A missing or unreadable workbook
//! loads as an empty [`Dataset`].

use crate::coerce;
use crate::images;
use crate::table::{self, Cell, Table};
use crate::types::{Dataset, Post};
use std::path::Path;

pub const DEFAULT_USERNAME: &str = "usuario";
pub const DEFAULT_NAME: &str = "Usuário";
pub const COMMENT_SLOTS: usize = 10;

/// Column positions for every recognized field, resolved once per table.
#[derive(Debug, Default)]
struct Schema {
    post_id: Option<usize>,
    actor_username: Option<usize>,
    actor_name: Option<usize>,
    actor_avatar_url: Option<usize>,
    actor_bio: Option<usize>,
    actor_followers: Option<usize>,
    actor_following: Option<usize>,
    post_image_url: Option<usize>,
    post_caption: Option<usize>,
    post_datetime: Option<usize>,
    likes: Option<usize>,
    comments_count: Option<usize>,
    shares_count: Option<usize>,
    comments: [Option<usize>; COMMENT_SLOTS],
}

impl Schema {
    fn for_table(table: &Table) -> Self {
        Self {
            post_id: table.column("post_id"),
            actor_username: table.column("actor_username"),
            actor_name: table.column("actor_name"),
            actor_avatar_url: table.column("actor_avatar_url"),
            actor_bio: table.column("actor_bio"),
            actor_followers: table.column("actor_followers"),
            actor_following: table.column("actor_following"),
            post_image_url: table.column("post_image_url"),
            post_caption: table.column("post_caption"),
            post_datetime: table.column("post_datetime"),
            likes: table.column("likes"),
            comments_count: table.column("comments_count"),
            shares_count: table.column("shares_count"),
            comments: std::array::from_fn(|slot| table.column(&format!("comment_{}", slot + 1))),
        }
    }

    fn project<'a>(&self, row: &'a [Cell]) -> RawRow<'a> {
        let get = move |col: Option<usize>| col.and_then(|c| row.get(c));
        RawRow {
            post_id: get(self.post_id),
            actor_username: get(self.actor_username),
            actor_name: get(self.actor_name),
            actor_avatar_url: get(self.actor_avatar_url),
            actor_bio: get(self.actor_bio),
            actor_followers: get(self.actor_followers),
            actor_following: get(self.actor_following),
            post_image_url: get(self.post_image_url),
            post_caption: get(self.post_caption),
            post_datetime: get(self.post_datetime),
            likes: get(self.likes),
            comments_count: get(self.comments_count),
            shares_count: get(self.shares_count),
            comments: self.comments.map(get),
        }
    }
}

/// One row viewed through the schema. `None` = column absent or row too short.
#[derive(Debug)]
struct RawRow<'a> {
    post_id: Option<&'a Cell>,
    actor_username: Option<&'a Cell>,
    actor_name: Option<&'a Cell>,
    actor_avatar_url: Option<&'a Cell>,
    actor_bio: Option<&'a Cell>,
    actor_followers: Option<&'a Cell>,
    actor_following: Option<&'a Cell>,
    post_image_url: Option<&'a Cell>,
    post_caption: Option<&'a Cell>,
    post_datetime: Option<&'a Cell>,
    likes: Option<&'a Cell>,
    comments_count: Option<&'a Cell>,
    shares_count: Option<&'a Cell>,
    comments: [Option<&'a Cell>; COMMENT_SLOTS],
}

impl RawRow<'_> {
    fn normalize(&self, source_index: usize) -> Post {
        let raw_username = coerce::text(self.actor_username);
        let author_name = coerce::text(self.actor_name)
            .or_else(|| raw_username.clone())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());

        Post {
            source_index,
            post_id: coerce::text(self.post_id).unwrap_or_else(|| source_index.to_string()),
            author_username: raw_username.unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            author_name,
            author_avatar_ref: images::resolve(
                coerce::text(self.actor_avatar_url).as_deref(),
                true,
            ),
            author_bio: coerce::text(self.actor_bio).unwrap_or_default(),
            author_followers: coerce::count(self.actor_followers).unwrap_or(0),
            author_following: coerce::count(self.actor_following).unwrap_or(0),
            post_image_ref: images::resolve(coerce::text(self.post_image_url).as_deref(), false),
            caption: coerce::text(self.post_caption).unwrap_or_default(),
            posted_at: coerce::timestamp(self.post_datetime),
            likes: coerce::count(self.likes).unwrap_or(0),
            comments_count: coerce::count(self.comments_count).unwrap_or(0),
            shares_count: coerce::count(self.shares_count).unwrap_or(0),
            comments: self.comments.iter().filter_map(|c| coerce::text(*c)).collect(),
        }
    }
}

/// Normalize every row of `table` and aggregate author profiles.
///
/// Posts come back in sheet order, one per row.
pub fn load(table: &Table) -> Dataset {
    let schema = Schema::for_table(table);
    let posts = table
        .rows
        .iter()
        .enumerate()
        .map(|(idx, row)| schema.project(row).normalize(idx))
        .collect();
    Dataset::from_posts(posts)
}

/// Read the workbook at `path` and load it.
///
/// A missing file is an empty dataset. So is an unreadable one, after a
/// warning is logged.
pub fn load_file(path: &Path) -> Dataset {
    match table::read_first_sheet(path) {
        Ok(Some(table)) => {
            let dataset = load(&table);
            tracing::debug!(
                path = %path.display(),
                posts = dataset.posts.len(),
                profiles = dataset.profiles.len(),
                "loaded spreadsheet"
            );
            dataset
        }
        Ok(None) => {
            tracing::debug!(path = %path.display(), "spreadsheet not found, nothing to show");
            Dataset::default()
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "could not read spreadsheet");
            Dataset::default()
        }
    }
}
