use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::{bail, Context};
use chrono::NaiveDate;
use fs_extra::dir::CopyOptions;
use log::warn;
use maud::{html, PreEscaped};
use pulldown_cmark::{html as cmark_html, Options, Parser};
use regex::Regex;

pub(super) const DEFAULT_PAGE_TITLE: &str = "Page";

static H1_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<h1[^>]*>(.*?)</h1>").expect("valid h1 pattern"));
static MARKDOWN_H1_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#[ \t]+(.+?)\r?$").expect("valid heading pattern"));

pub(super) fn render_markdown(body: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);

    let parser = Parser::new_ext(body, options);
    let mut out = String::with_capacity(body.len() * 3 / 2);
    cmark_html::push_html(&mut out, parser);
    out
}

/// Inner HTML of the first single-line `<h1>` element, or `"Page"`.
pub(super) fn title_from_html(fragment: &str) -> String {
    H1_PATTERN
        .captures(fragment)
        .map_or(DEFAULT_PAGE_TITLE, |caps| caps.get(1).map_or("", |m| m.as_str()))
        .to_string()
}

/// Text of the first `# heading` line of raw Markdown, or `fallback`.
pub(super) fn title_from_markdown(markdown: &str, fallback: &str) -> String {
    MARKDOWN_H1_PATTERN
        .captures(markdown)
        .and_then(|caps| caps.get(1))
        .map_or(fallback, |m| m.as_str())
        .to_string()
}

/// Reads `YYYY-MM-DD` as a plain calendar date, never as an instant, so the
/// result does not depend on the local time zone.
pub(crate) fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    let parts: Vec<&str> = raw.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        bail!("expected YYYY-MM-DD, got {raw:?}");
    };
    let year: i32 = year.parse().with_context(|| format!("invalid year in {raw:?}"))?;
    let month: u32 = month.parse().with_context(|| format!("invalid month in {raw:?}"))?;
    let day: u32 = day.parse().with_context(|| format!("invalid day in {raw:?}"))?;
    NaiveDate::from_ymd_opt(year, month, day).with_context(|| format!("no such date: {raw:?}"))
}

/// `2024-01-05` -> `January 5, 2024`.
pub(super) fn format_date(raw: &str) -> anyhow::Result<String> {
    Ok(parse_date(raw)?.format("%B %-d, %Y").to_string())
}

/// Date markup for templates and listings. Falls back to the raw text when the
/// value is not a valid date.
pub(super) fn render_date(raw: &str) -> String {
    match format_date(raw) {
        Ok(display) => html! {
            time.post-date datetime=(raw) { (display) }
        }
        .into_string(),
        Err(e) => {
            warn!("Could not format date {raw:?}: {e:#}. showing it as is.");
            html! {
                p.post-date { (raw) }
            }
            .into_string()
        }
    }
}

/// One entry of the blog listing. `title` is trusted HTML.
pub(super) fn render_listing_entry(href: &str, title: &str, date_html: Option<&str>) -> String {
    html! {
        article.blog-preview {
            h2 {
                a href=(href) { (PreEscaped(title)) }
            }
            @if let Some(date_html) = date_html {
                (PreEscaped(date_html))
            }
        }
    }
    .into_string()
}

/// File name without its `.md` suffix.
pub(super) fn slug_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Markdown documents directly inside `dir`, sorted by file name.
pub(super) fn markdown_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = vec![];
    for entry in std::fs::read_dir(dir).with_context(|| format!("while listing {dir:?}"))? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Copies the contents of `src` into `dest`, merging with whatever is there.
///
/// `dest` and every missing subdirectory are created; existing files are
/// overwritten and unrelated files are left alone.
pub(super) fn copy_tree(src: &Path, dest: &Path) -> anyhow::Result<u64> {
    fs_extra::dir::create_all(dest, false)
        .with_context(|| format!("while creating {dest:?}"))?;

    let mut cp_opts = CopyOptions::new();
    cp_opts.copy_inside = true;
    cp_opts.content_only = true;
    cp_opts.overwrite = true;
    fs_extra::dir::copy(src, dest, &cp_opts)
        .with_context(|| format!("while copying {src:?} to {dest:?}"))
}
