//! Assets embedded at compile time.
//!
//! - `static/style.css`: inlined into every page, so snapshots and PDFs need
//!   no stylesheet lookups.
//! - Placeholder images for missing avatars and post images. The asset root
//!   must contain them because [`crate::images`] points there; they are
//!   written on demand when absent.

use crate::images::{AVATAR_PLACEHOLDER, IMAGE_PLACEHOLDER};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const CSS: &str = include_str!("../static/style.css");

const AVATAR_SVG: &str = include_str!("../static/avatars/default.svg");
const IMAGE_SVG: &str = include_str!("../static/images/placeholder.svg");

/// Placeholder files as `(path under the asset root, contents)`.
pub const PLACEHOLDERS: &[(&str, &str)] = &[
    (AVATAR_PLACEHOLDER, AVATAR_SVG),
    (IMAGE_PLACEHOLDER, IMAGE_SVG),
];

/// Write any missing placeholder into `static_dir`. Existing files, which may
/// be customized, are left alone.
///
/// Returns the paths that were created.
pub fn ensure_placeholders(static_dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut created = Vec::new();
    for (rel, contents) in PLACEHOLDERS {
        let path = static_dir.join(rel);
        if path.exists() {
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        created.push(path);
    }
    Ok(created)
}
