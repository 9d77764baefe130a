//! Feed ordering: newest first, undated last, ties by sheet position.

use crate::types::Post;
use std::cmp::Ordering;

/// Total order for the feed.
///
/// Sorting with this comparator yields the final display order directly:
/// `posted_at` descending with "no timestamp" below every real timestamp,
/// then `source_index` ascending, so an earlier row wins a tie.
pub fn compare(a: &Post, b: &Post) -> Ordering {
    // Option orders None before Some, which is exactly "undated is oldest"
    b.posted_at
        .cmp(&a.posted_at)
        .then_with(|| a.source_index.cmp(&b.source_index))
}

pub fn sort_feed(posts: &mut [Post]) {
    posts.sort_by(compare);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::post_at;

    fn order(posts: &[Post]) -> Vec<usize> {
        posts.iter().map(|p| p.source_index).collect()
    }

    #[test]
    fn newest_first() {
        let mut posts = vec![
            post_at(0, Some("2023-01-01 10:00:00")),
            post_at(1, Some("2024-06-01 10:00:00")),
            post_at(2, Some("2023-08-15 10:00:00")),
        ];
        sort_feed(&mut posts);
        assert_eq!(order(&posts), vec![1, 2, 0]);
    }

    #[test]
    fn undated_posts_go_last() {
        let mut posts = vec![
            post_at(0, None),
            post_at(1, Some("1970-01-01 00:00:00")),
            post_at(2, None),
            post_at(3, Some("2020-01-01 00:00:00")),
        ];
        sort_feed(&mut posts);
        assert_eq!(order(&posts), vec![3, 1, 0, 2]);
    }

    #[test]
    fn equal_timestamps_keep_sheet_order() {
        let mut posts = vec![
            post_at(4, Some("2023-01-01 00:00:00")),
            post_at(2, Some("2023-01-01 00:00:00")),
            post_at(7, Some("2023-01-01 00:00:00")),
        ];
        sort_feed(&mut posts);
        assert_eq!(order(&posts), vec![2, 4, 7]);
    }

    #[test]
    fn all_undated_is_sheet_order() {
        let mut posts: Vec<Post> = (0..5).rev().map(|i| post_at(i, None)).collect();
        sort_feed(&mut posts);
        assert_eq!(order(&posts), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn compare_is_antisymmetric() {
        let a = post_at(0, None);
        let b = post_at(1, Some("2023-01-01 00:00:00"));
        assert_eq!(compare(&a, &b), Ordering::Greater);
        assert_eq!(compare(&b, &a), Ordering::Less);
        assert_eq!(compare(&a, &a), Ordering::Equal);
    }

    #[test]
    fn sorting_is_repeatable() {
        let base = vec![
            post_at(0, None),
            post_at(1, Some("2023-01-01 00:00:00")),
            post_at(2, None),
            post_at(3, Some("2023-01-01 00:00:00")),
        ];
        let mut first = base.clone();
        let mut second = base.into_iter().rev().collect::<Vec<_>>();
        sort_feed(&mut first);
        sort_feed(&mut second);
        assert_eq!(first, second);
    }
}
