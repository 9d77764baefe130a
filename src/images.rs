//! Image reference resolution.
//!
//! Spreadsheet image cells hold one of three things: nothing, an external URL,
//! or a path into the site's own `static/` directory. [`resolve`] turns any of
//! them into an [`ImageRef`] that can always be displayed:
//!
//! | Cell value                      | Result                                   |
//! |---------------------------------|------------------------------------------|
//! | blank                           | placeholder for the kind                 |
//! | `/static/images/x.jpg`          | `Local("images/x.jpg")`                  |
//! | `static/images/x.jpg`           | `Local("images/x.jpg")`                  |
//! | `https://cdn.example/y.jpg`     | `External(...)`, unchanged               |
//! | anything else                   | placeholder for the kind                 |
//!
//! Local references are relative to the asset root. Each surface decides
//! where that root lives (`/static/` on the live server, a relative `static/`
//! in snapshots) through [`ImageRef::href`].

use serde::Serialize;

/// Placeholder used for authors without a usable avatar.
pub const AVATAR_PLACEHOLDER: &str = "avatars/default.svg";
/// Placeholder used for posts without a usable image.
pub const IMAGE_PLACEHOLDER: &str = "images/placeholder.svg";

const STATIC_PREFIXES: &[&str] = &["/static/", "static/"];

/// A displayable image: a file under the asset root, or an external URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum ImageRef {
    Local(String),
    External(String),
}

impl ImageRef {
    pub fn placeholder(is_avatar: bool) -> Self {
        let path = if is_avatar {
            AVATAR_PLACEHOLDER
        } else {
            IMAGE_PLACEHOLDER
        };
        ImageRef::Local(path.to_string())
    }

    /// URL for this image, with local paths joined onto `static_prefix`.
    ///
    /// `static_prefix` must end with `/` (e.g. `"/static/"`, `"../static/"`).
    pub fn href(&self, static_prefix: &str) -> String {
        match self {
            ImageRef::Local(path) => format!("{static_prefix}{path}"),
            ImageRef::External(url) => url.clone(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ImageRef::Local(p) if p == AVATAR_PLACEHOLDER || p == IMAGE_PLACEHOLDER)
    }
}

/// Resolve a raw image cell. Total: every input yields a non-empty reference.
pub fn resolve(raw: Option<&str>, is_avatar: bool) -> ImageRef {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return ImageRef::placeholder(is_avatar);
    };

    if let Some(rest) = STATIC_PREFIXES
        .iter()
        .find_map(|prefix| value.strip_prefix(prefix))
    {
        let rest = rest.trim_start_matches('/');
        return if rest.is_empty() {
            ImageRef::placeholder(is_avatar)
        } else {
            ImageRef::Local(rest.to_string())
        };
    }

    if value.starts_with("http://") || value.starts_with("https://") {
        return ImageRef::External(value.to_string());
    }

    ImageRef::placeholder(is_avatar)
}
