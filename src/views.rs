//! View models handed to the renderers.
//!
//! Each function here is a pure projection of a [`Dataset`]: the feed in
//! display order, a single post, the report pages, and the summary totals
//! shown on the report cover.

use crate::ordering;
use crate::types::{Dataset, Post};
use serde::Serialize;

/// All posts, newest first.
pub fn feed(dataset: &Dataset) -> Vec<&Post> {
    let mut posts: Vec<&Post> = dataset.posts.iter().collect();
    posts.sort_by(|a, b| ordering::compare(a, b));
    posts
}

/// First post whose id equals `post_id`, in sheet order.
///
/// Ids are not required to be unique; later duplicates are unreachable here.
pub fn find_post<'a>(dataset: &'a Dataset, post_id: &str) -> Option<&'a Post> {
    dataset.posts.iter().find(|p| p.post_id == post_id)
}

/// One printed page of the report.
#[derive(Debug)]
pub struct ReportPage<'a> {
    /// 1-based page number.
    pub number: usize,
    pub posts: &'a [&'a Post],
}

/// Split the feed into pages of `per_page` posts. The last page may be short.
///
/// `per_page` of zero is treated as one.
pub fn paginate<'a>(feed: &'a [&'a Post], per_page: usize) -> Vec<ReportPage<'a>> {
    feed.chunks(per_page.max(1))
        .enumerate()
        .map(|(i, posts)| ReportPage {
            number: i + 1,
            posts,
        })
        .collect()
}

/// Totals printed on the report cover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub posts: usize,
    pub authors: usize,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub dated: usize,
}

pub fn summarize(dataset: &Dataset) -> Summary {
    dataset.posts.iter().fold(
        Summary {
            authors: dataset.profiles.len(),
            ..Summary::default()
        },
        |mut acc, post| {
            acc.posts += 1;
            acc.likes = acc.likes.saturating_add(post.likes);
            acc.comments = acc.comments.saturating_add(post.comments_count);
            acc.shares = acc.shares.saturating_add(post.shares_count);
            acc.dated += usize::from(post.posted_at.is_some());
            acc
        },
    )
}
