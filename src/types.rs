//! Normalized records shared by the loader and every rendering surface.
//!
//! Every field is always populated. Blank spreadsheet cells are replaced by
//! defaults in [`crate::loader`] before a [`Post`] is built, so renderers never
//! have to deal with missing data.

use crate::images::ImageRef;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;

/// One spreadsheet row after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    /// 0-based position of the row in the sheet (header excluded).
    pub source_index: usize,
    pub post_id: String,
    pub author_username: String,
    pub author_name: String,
    pub author_avatar_ref: ImageRef,
    pub author_bio: String,
    pub author_followers: u64,
    pub author_following: u64,
    pub post_image_ref: ImageRef,
    pub caption: String,
    /// `None` when the cell was blank or could not be read as a date.
    pub posted_at: Option<NaiveDateTime>,
    pub likes: u64,
    pub comments_count: u64,
    pub shares_count: u64,
    /// Non-blank comments from the `comment_1..comment_10` slots, in slot order.
    pub comments: Vec<String>,
}

/// Per-author aggregate built by folding over posts in load order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub username: String,
    pub name: String,
    pub avatar_ref: ImageRef,
    pub bio: String,
    pub followers: u64,
    pub following: u64,
    pub total_posts: u64,
    pub total_likes: u64,
    pub total_shares: u64,
    /// Image of the last post seen for this author in load order.
    pub latest_post_image: ImageRef,
}

impl Profile {
    /// Start a profile from the first post seen for its author.
    fn seeded_from(post: &Post) -> Self {
        Self {
            username: post.author_username.clone(),
            name: post.author_name.clone(),
            avatar_ref: post.author_avatar_ref.clone(),
            bio: post.author_bio.clone(),
            followers: post.author_followers,
            following: post.author_following,
            total_posts: 0,
            total_likes: 0,
            total_shares: 0,
            latest_post_image: post.post_image_ref.clone(),
        }
    }

    fn absorb(&mut self, post: &Post) {
        self.total_posts += 1;
        self.total_likes = self.total_likes.saturating_add(post.likes);
        self.total_shares = self.total_shares.saturating_add(post.shares_count);
        self.latest_post_image = post.post_image_ref.clone();
    }
}

/// Username → profile mapping that remembers first-seen author order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Profiles {
    entries: Vec<Profile>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Profiles {
    /// Fold a post into the mapping. Identity fields come from the first post
    /// of each author and are never overwritten.
    pub fn record(&mut self, post: &Post) {
        let slot = match self.index.get(&post.author_username) {
            Some(&slot) => slot,
            None => {
                self.entries.push(Profile::seeded_from(post));
                let slot = self.entries.len() - 1;
                self.index.insert(post.author_username.clone(), slot);
                slot
            }
        };
        self.entries[slot].absorb(post);
    }

    pub fn get(&self, username: &str) -> Option<&Profile> {
        self.index.get(username).map(|&slot| &self.entries[slot])
    }

    /// Profiles in the order their authors first appeared.
    pub fn iter(&self) -> std::slice::Iter<'_, Profile> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Profiles {
    type Item = &'a Profile;
    type IntoIter = std::slice::Iter<'a, Profile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Everything one load of the spreadsheet produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    /// Posts in sheet order. Views apply [`crate::ordering`] themselves.
    pub posts: Vec<Post>,
    pub profiles: Profiles,
}

impl Dataset {
    pub fn from_posts(posts: Vec<Post>) -> Self {
        let mut profiles = Profiles::default();
        for post in &posts {
            profiles.record(post);
        }
        Self { posts, profiles }
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
