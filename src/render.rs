//! HTML rendering for every view.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating:
//! templates are Rust code and all interpolation is auto-escaped, which
//! matters here because every string comes from a hand-edited spreadsheet.
//!
//! ## Pages
//!
//! - **Feed**: every post, newest first
//! - **Post**: a single post with its comments and author bio
//! - **Not found**: the outcome of a post lookup miss
//! - **Profiles**: one card per author with aggregate counts
//! - **Report**: cover with totals, then posts grouped into print pages
//! - **Clipping**: feed followed by profiles, for a single PDF
//!
//! ## Links
//!
//! The same templates serve the live server and the static snapshot. A
//! [`Links`] value decides what every href looks like: absolute routes
//! (`/post/p1`) live, relative file paths (`../post/p1.html`) in snapshots.
//! The stylesheet is inlined so pages render the same from `file://`.

use crate::assets;
use crate::config::{ReportConfig, SiteSection};
use crate::images::ImageRef;
use crate::types::{Dataset, Post, Profile};
use crate::views::{self, Summary};
use chrono::NaiveDateTime;
use maud::{DOCTYPE, Markup, html};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::fmt::Write as _;

/// Characters escaped when a post id is used as a URL path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// How hrefs are written for the surface being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Links {
    /// Absolute routes served by the live server.
    Live,
    /// Relative file paths, for a page `depth` directories below the snapshot root.
    Snapshot { depth: usize },
}

impl Links {
    fn root(&self) -> String {
        match self {
            Links::Live => "/".to_string(),
            Links::Snapshot { depth } => "../".repeat(*depth),
        }
    }

    /// Prefix local image paths are joined onto; always ends with `/`.
    pub fn static_prefix(&self) -> String {
        format!("{}static/", self.root())
    }

    pub fn home(&self) -> String {
        match self {
            Links::Live => "/".to_string(),
            Links::Snapshot { .. } => format!("{}index.html", self.root()),
        }
    }

    pub fn profiles(&self) -> String {
        self.section("profiles")
    }

    pub fn report(&self) -> String {
        self.section("report")
    }

    pub fn clipping(&self) -> String {
        self.section("clipping")
    }

    fn section(&self, name: &str) -> String {
        match self {
            Links::Live => format!("/{name}"),
            Links::Snapshot { .. } => format!("{}{name}/index.html", self.root()),
        }
    }

    pub fn post(&self, post_id: &str) -> String {
        match self {
            Links::Live => format!("/post/{}", utf8_percent_encode(post_id, PATH_SEGMENT)),
            Links::Snapshot { .. } => format!("{}post/{}.html", self.root(), post_slug(post_id)),
        }
    }

    pub fn image(&self, image: &ImageRef) -> String {
        image.href(&self.static_prefix())
    }
}

/// File-name-safe form of a post id, used for snapshot pages.
///
/// Anything outside `[A-Za-z0-9._-]` becomes `-`. Distinct ids can collide
/// (`a b` and `a/b`); the snapshot then keeps the first post's page.
pub fn post_slug(post_id: &str) -> String {
    let slug: String = post_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect();
    if slug.is_empty() || slug.chars().all(|c| c == '.') {
        format!("post-{}", slug.len())
    } else {
        slug
    }
}

/// Everything a template needs besides the data itself.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub site: &'a SiteSection,
    pub report: &'a ReportConfig,
    pub links: Links,
}

/// Top-level section, for highlighting the current nav entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Feed,
    Profiles,
    Report,
    None,
}

/// Format a count with `.` thousands separators, as pt-BR readers expect.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Format a timestamp with a user-supplied strftime string.
///
/// An unusable format string falls back to ISO 8601 instead of panicking.
pub fn format_timestamp(dt: &NaiveDateTime, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", dt.format(format)).is_err() {
        out.clear();
        let _ = write!(out, "{}", dt.format("%Y-%m-%d %H:%M"));
    }
    out
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(title: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (assets::CSS) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// Renders the site header with brand and section links
fn site_header(ctx: &Context, current: Section) -> Markup {
    let links = ctx.links;
    let entries = [
        (Section::Feed, "Feed", links.home()),
        (Section::Profiles, "Perfis", links.profiles()),
        (Section::Report, ctx.report.title.as_str(), links.report()),
    ];
    html! {
        header.site-header {
            a.brand href=(links.home()) { (ctx.site.title) }
            nav.site-nav {
                @for (section, label, href) in &entries {
                    a class=[(current == *section).then_some("current")] href=(href) { (label) }
                }
            }
        }
    }
}

fn stat_line(post: &Post) -> Markup {
    html! {
        div.post-stats {
            span.likes title="curtidas" { "♥ " (format_count(post.likes)) }
            span.comments-count title="comentários" { "💬 " (format_count(post.comments_count)) }
            span.shares title="compartilhamentos" { "↗ " (format_count(post.shares_count)) }
        }
    }
}

fn post_time(ctx: &Context, post: &Post) -> Markup {
    html! {
        @if let Some(dt) = &post.posted_at {
            time.post-time datetime=(dt.format("%Y-%m-%dT%H:%M:%S").to_string()) {
                (format_timestamp(dt, &ctx.site.date_format))
            }
        }
    }
}

fn author_block(ctx: &Context, post: &Post) -> Markup {
    let links = ctx.links;
    html! {
        div.post-author {
            img.avatar src=(links.image(&post.author_avatar_ref)) alt=(post.author_name) loading="lazy";
            div {
                div.author-name { (post.author_name) }
                a.author-handle href={ (links.profiles()) "#perfil-" (post.author_username) } {
                    "@" (post.author_username)
                }
            }
        }
    }
}

/// Renders a post as it appears in the feed: image links to the post page.
pub fn post_card(ctx: &Context, post: &Post) -> Markup {
    let links = ctx.links;
    let href = links.post(&post.post_id);
    html! {
        article.post-card id={ "post-" (post_slug(&post.post_id)) } {
            (author_block(ctx, post))
            a href=(href) {
                img.post-image src=(links.image(&post.post_image_ref)) alt=(post.caption) loading="lazy";
            }
            div.post-body {
                (stat_line(post))
                @if !post.caption.is_empty() {
                    p.post-caption {
                        strong { (post.author_username) } " " (post.caption)
                    }
                }
                @if !post.comments.is_empty() {
                    a.muted href=(href) { "Ver " (post.comments.len()) " comentários" }
                    br;
                }
                (post_time(ctx, post))
            }
        }
    }
}

/// Renders a profile card with aggregate counts and the latest image.
pub fn profile_card(ctx: &Context, profile: &Profile) -> Markup {
    let links = ctx.links;
    html! {
        article.profile-card id={ "perfil-" (profile.username) } {
            div.profile-head {
                img.avatar.large src=(links.image(&profile.avatar_ref)) alt=(profile.name) loading="lazy";
                div {
                    div.author-name { (profile.name) }
                    div.author-handle { "@" (profile.username) }
                    div.muted {
                        (format_count(profile.followers)) " seguidores · "
                        (format_count(profile.following)) " seguindo"
                    }
                }
            }
            @if !profile.bio.is_empty() {
                p.profile-bio { (profile.bio) }
            }
            div.profile-stats {
                div { strong { (format_count(profile.total_posts)) } span.muted { "posts" } }
                div { strong { (format_count(profile.total_likes)) } span.muted { "curtidas" } }
                div { strong { (format_count(profile.total_shares)) } span.muted { "compartilhamentos" } }
            }
            img.profile-preview src=(links.image(&profile.latest_post_image)) alt={ "Último post de " (profile.name) } loading="lazy";
        }
    }
}

fn empty_state() -> Markup {
    html! {
        p.empty-state { "Nenhum post encontrado." }
    }
}

fn summary_grid(summary: &Summary) -> Markup {
    html! {
        div.summary {
            div { strong { (summary.posts) } "posts" }
            div { strong { (summary.authors) } "perfis" }
            div { strong { (summary.dated) } "com data" }
            div { strong { (format_count(summary.likes)) } "curtidas" }
            div { strong { (format_count(summary.comments)) } "comentários" }
            div { strong { (format_count(summary.shares)) } "compartilhamentos" }
        }
    }
}

fn feed_section(ctx: &Context, dataset: &Dataset) -> Markup {
    let feed = views::feed(dataset);
    html! {
        @if feed.is_empty() {
            (empty_state())
        } @else {
            @for post in &feed {
                (post_card(ctx, post))
            }
        }
    }
}

fn profiles_section(ctx: &Context, dataset: &Dataset) -> Markup {
    html! {
        @if dataset.profiles.is_empty() {
            p.empty-state { "Nenhum perfil encontrado." }
        } @else {
            div.profile-grid {
                @for profile in &dataset.profiles {
                    (profile_card(ctx, profile))
                }
            }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the feed page
pub fn render_feed(ctx: &Context, dataset: &Dataset) -> Markup {
    let content = html! {
        (site_header(ctx, Section::Feed))
        main.feed-page {
            (feed_section(ctx, dataset))
        }
    };
    base_document(&format!("{} — Feed", ctx.site.title), None, content)
}

/// Renders a single post with its comments
pub fn render_post(ctx: &Context, post: &Post) -> Markup {
    let links = ctx.links;
    let content = html! {
        (site_header(ctx, Section::None))
        main.post-page {
            article.post-card {
                (author_block(ctx, post))
                img.post-image src=(links.image(&post.post_image_ref)) alt=(post.caption);
                div.post-body {
                    (stat_line(post))
                    @if !post.caption.is_empty() {
                        p.post-caption {
                            strong { (post.author_username) } " " (post.caption)
                        }
                    }
                    (post_time(ctx, post))
                    @if !post.comments.is_empty() {
                        ul.comments {
                            @for comment in &post.comments {
                                li { (comment) }
                            }
                        }
                    }
                }
            }
            @if !post.author_bio.is_empty() {
                section.author-bio {
                    h2 { "Sobre " (post.author_name) }
                    p { (post.author_bio) }
                    p.muted {
                        (format_count(post.author_followers)) " seguidores · "
                        (format_count(post.author_following)) " seguindo"
                    }
                }
            }
            p { a href=(links.home()) { "← Voltar ao feed" } }
        }
    };
    base_document(
        &format!("Post • {}", post.author_username),
        Some("post-view"),
        content,
    )
}

/// Renders the outcome of a lookup miss
pub fn render_not_found(ctx: &Context, post_id: &str) -> Markup {
    let content = html! {
        (site_header(ctx, Section::None))
        main.not-found-page {
            h1 { "Post não encontrado" }
            p { "Nenhum post com o identificador “" (post_id) "” existe na planilha." }
            p { a href=(ctx.links.home()) { "← Voltar ao feed" } }
        }
    };
    base_document("Post não encontrado", None, content)
}

/// Renders the profiles page
pub fn render_profiles(ctx: &Context, dataset: &Dataset) -> Markup {
    let content = html! {
        (site_header(ctx, Section::Profiles))
        main.profiles-page {
            h1 { "Perfis" }
            (profiles_section(ctx, dataset))
        }
    };
    base_document("Perfis", None, content)
}

/// Renders the paginated print report
pub fn render_report(ctx: &Context, dataset: &Dataset) -> Markup {
    let feed = views::feed(dataset);
    let pages = views::paginate(&feed, ctx.report.posts_per_page);
    let total = pages.len();
    let summary = views::summarize(dataset);

    let content = html! {
        (site_header(ctx, Section::Report))
        main.report {
            section.report-cover {
                h1 { (ctx.site.title) " — " (ctx.report.title) }
                (summary_grid(&summary))
            }
            @if pages.is_empty() {
                (empty_state())
            }
            @for page in &pages {
                section.report-page data-page=(page.number) {
                    @for post in page.posts {
                        (post_card(ctx, post))
                    }
                    div.page-number.muted { "Página " (page.number) " / " (total) }
                }
            }
        }
    };
    base_document(
        &format!("{} — {}", ctx.site.title, ctx.report.title),
        Some("report-view"),
        content,
    )
}

/// Renders the feed followed by the profiles in one printable document
pub fn render_clipping(ctx: &Context, dataset: &Dataset) -> Markup {
    let content = html! {
        (site_header(ctx, Section::None))
        main.clipping {
            section.clipping-section.clipping-feed {
                h1 { "Feed" }
                (feed_section(ctx, dataset))
            }
            section.clipping-section.clipping-profiles {
                h1 { "Perfis" }
                (profiles_section(ctx, dataset))
            }
        }
    };
    base_document(&ctx.site.title, Some("clipping-view"), content)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{find_post, post_at, sample_dataset};

    fn with_ctx<T>(links: Links, f: impl FnOnce(&Context) -> T) -> T {
        let site = SiteSection::default();
        let report = ReportConfig::default();
        let ctx = Context {
            site: &site,
            report: &report,
            links,
        };
        f(&ctx)
    }

    // =========================================================================
    // Links
    // =========================================================================

    #[test]
    fn live_links_are_absolute_routes() {
        let links = Links::Live;
        assert_eq!(links.home(), "/");
        assert_eq!(links.profiles(), "/profiles");
        assert_eq!(links.report(), "/report");
        assert_eq!(links.post("p1"), "/post/p1");
        assert_eq!(links.static_prefix(), "/static/");
    }

    #[test]
    fn live_post_links_are_percent_encoded() {
        assert_eq!(Links::Live.post("a b/c"), "/post/a%20b%2Fc");
    }

    #[test]
    fn snapshot_links_are_relative() {
        let root = Links::Snapshot { depth: 0 };
        assert_eq!(root.home(), "index.html");
        assert_eq!(root.profiles(), "profiles/index.html");
        assert_eq!(root.post("p1"), "post/p1.html");
        assert_eq!(root.static_prefix(), "static/");

        let nested = Links::Snapshot { depth: 1 };
        assert_eq!(nested.home(), "../index.html");
        assert_eq!(nested.report(), "../report/index.html");
        assert_eq!(nested.post("p1"), "../post/p1.html");
        assert_eq!(nested.static_prefix(), "../static/");
    }

    #[test]
    fn image_links_use_static_prefix() {
        let local = ImageRef::Local("images/x.jpg".into());
        assert_eq!(Links::Live.image(&local), "/static/images/x.jpg");
        assert_eq!(Links::Snapshot { depth: 1 }.image(&local), "../static/images/x.jpg");
    }

    #[test]
    fn post_slug_replaces_unsafe_characters() {
        assert_eq!(post_slug("p-1_a.b"), "p-1_a.b");
        assert_eq!(post_slug("a b/c"), "a-b-c");
        assert_eq!(post_slug("ação"), "a--o");
        assert_eq!(post_slug(".."), "post-2");
    }

    // =========================================================================
    // Formatting
    // =========================================================================

    #[test]
    fn format_count_groups_thousands() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1200), "1.200");
        assert_eq!(format_count(1234567), "1.234.567");
    }

    #[test]
    fn format_timestamp_uses_format_and_survives_bad_ones() {
        let dt = NaiveDateTime::parse_from_str("2024-03-01 18:05:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        assert_eq!(format_timestamp(&dt, "%d/%m/%Y %H:%M"), "01/03/2024 18:05");
        assert_eq!(format_timestamp(&dt, "%Q"), "2024-03-01 18:05");
    }

    // =========================================================================
    // Pages
    // =========================================================================

    #[test]
    fn base_document_includes_doctype_and_css() {
        let doc = base_document("Test", None, html! { p { "x" } }).into_string();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains(".post-card"));
    }

    #[test]
    fn feed_lists_posts_newest_first() {
        let dataset = sample_dataset();
        let html = with_ctx(Links::Live, |ctx| render_feed(ctx, &dataset)).into_string();
        let p3 = html.find("/post/p3").unwrap();
        let p1 = html.find("/post/p1").unwrap();
        let p2 = html.find("/post/p2").unwrap();
        assert!(p3 < p1 && p1 < p2);
    }

    #[test]
    fn feed_resolves_images_for_surface() {
        let dataset = sample_dataset();
        let html = with_ctx(Links::Snapshot { depth: 0 }, |ctx| render_feed(ctx, &dataset))
            .into_string();
        assert!(html.contains(r#"src="static/images/p2.jpg""#));
        assert!(html.contains(r#"src="https://cdn.example/p1.jpg""#));
        assert!(html.contains(r#"src="static/images/placeholder.svg""#));
        assert!(html.contains(r#"src="static/avatars/default.svg""#));
    }

    #[test]
    fn empty_feed_shows_empty_state() {
        let html = with_ctx(Links::Live, |ctx| render_feed(ctx, &Dataset::default())).into_string();
        assert!(html.contains("Nenhum post encontrado."));
    }

    #[test]
    fn feed_marks_current_section() {
        let html = with_ctx(Links::Live, |ctx| render_feed(ctx, &Dataset::default())).into_string();
        assert!(html.contains(r#"<a class="current" href="/">Feed</a>"#));
    }

    #[test]
    fn post_page_lists_comments() {
        let dataset = sample_dataset();
        let post = find_post(&dataset, "p3");
        let html = with_ctx(Links::Live, |ctx| render_post(ctx, post)).into_string();
        assert!(html.contains("<li>Uau</li>"));
        assert!(html.contains("<li>Quero ir</li>"));
        assert!(html.contains("<title>Post • ana</title>"));
        assert!(html.contains("10/05/2024 09:30"));
    }

    #[test]
    fn post_page_without_timestamp_has_no_time_element() {
        let post = post_at(0, None);
        let html = with_ctx(Links::Live, |ctx| render_post(ctx, &post)).into_string();
        assert!(!html.contains("<time"));
    }

    #[test]
    fn spreadsheet_text_is_escaped() {
        let dataset = sample_dataset();
        let post = find_post(&dataset, "p1");
        let html = with_ctx(Links::Live, |ctx| render_post(ctx, post)).into_string();
        assert!(html.contains("Pôr do sol &lt;3"));
        assert!(!html.contains("Pôr do sol <3"));
    }

    #[test]
    fn not_found_names_the_id() {
        let html = with_ctx(Links::Live, |ctx| render_not_found(ctx, "<x>")).into_string();
        assert!(html.contains("Post não encontrado"));
        assert!(html.contains("&lt;x&gt;"));
    }

    #[test]
    fn profiles_page_shows_aggregates() {
        let dataset = sample_dataset();
        let html = with_ctx(Links::Live, |ctx| render_profiles(ctx, &dataset)).into_string();
        assert!(html.contains(r#"id="perfil-ana""#));
        assert!(html.contains("Ana Souza"));
        assert!(html.contains("1.200 seguidores"));
        // ana: 120 + 300 likes
        assert!(html.contains("<strong>420</strong>"));
    }

    #[test]
    fn report_groups_posts_into_pages() {
        let dataset = sample_dataset();
        let html = with_ctx(Links::Live, |ctx| render_report(ctx, &dataset)).into_string();
        assert_eq!(html.matches(r#"class="report-page""#).count(), 3);
        assert!(html.contains("Página 1 / 3"));
        assert!(html.contains("Página 3 / 3"));
        assert!(html.contains("Relatório"));
    }

    #[test]
    fn clipping_has_feed_then_profiles() {
        let dataset = sample_dataset();
        let html = with_ctx(Links::Live, |ctx| render_clipping(ctx, &dataset)).into_string();
        let feed = html.find("clipping-feed").unwrap();
        let profiles = html.find("clipping-profiles").unwrap();
        assert!(feed < profiles);
        assert!(html.contains(r#"id="perfil-caio""#));
    }
}
