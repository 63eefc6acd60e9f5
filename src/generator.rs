use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use log::{debug, info};

use crate::{
    config::Config,
    feed,
    metadata::extract_front_matter,
    renderer::{Substitutions, Template},
};

mod data;
mod utils;

pub(crate) use data::BlogEntry;
pub(crate) use utils::parse_date;
use utils::{
    copy_tree, markdown_files, render_date, render_listing_entry, render_markdown, slug_of,
    title_from_html, title_from_markdown,
};

/// Pages with this name are maintained by hand and never regenerated.
const HAND_WRITTEN_INDEX: &str = "index.md";

/// Renders one Markdown document through `template_name` into `out_path`.
pub(crate) fn build_page(
    config: &Config,
    source: &Path,
    out_path: &Path,
    template_name: &str,
) -> anyhow::Result<()> {
    let content =
        std::fs::read_to_string(source).with_context(|| format!("while reading {source:?}"))?;
    let front_matter = extract_front_matter(&content);

    let body_html = render_markdown(&front_matter.body);
    let title = title_from_html(&body_html);
    let date_html = front_matter.date.as_deref().map(render_date);

    let template = Template::load(&config.template_dir, template_name)?;
    let page = template.compose(&Substitutions {
        title: &title,
        content: &body_html,
        date: date_html.as_deref(),
    });

    write_output(out_path, &page)
        .with_context(|| format!("while generating from {source:?}"))?;
    info!("Built: {}", out_path.display());
    Ok(())
}

/// Writes `<out>/blog/index.html` listing every post, newest file name first.
///
/// The order is the reversed lexicographic order of file names, which is only
/// chronological for date-prefixed names. Returns the listed entries; nothing is
/// written when there are no posts.
pub(crate) fn build_blog_index(config: &Config) -> anyhow::Result<Vec<BlogEntry>> {
    let entries = collect_blog_entries(config)?;
    if entries.is_empty() {
        debug!("No blog posts in {:?}. skipping blog index.", config.blog_dir);
        return Ok(entries);
    }

    let mut list_html = String::from("<div class=\"blog-list\">");
    for entry in entries.iter() {
        let date_html = entry.date.as_deref().map(render_date);
        list_html.push_str(&render_listing_entry(
            &entry.href(),
            &entry.title,
            date_html.as_deref(),
        ));
    }
    list_html.push_str("</div>");

    let template = Template::load(&config.template_dir, &config.blog_index_template)?;
    debug!("Composing blog index with {:?}", template.path());
    let page = template.compose(&Substitutions {
        title: "Blog",
        content: &list_html,
        date: None,
    });

    let out_path = config.blog_out_dir().join("index.html");
    write_output(&out_path, &page).context("while generating blog index")?;
    info!("Built: {}", out_path.display());
    Ok(entries)
}

fn collect_blog_entries(config: &Config) -> anyhow::Result<Vec<BlogEntry>> {
    if !config.blog_dir.is_dir() {
        debug!("Blog directory {:?} does not exist.", config.blog_dir);
        return Ok(vec![]);
    }

    let mut entries = vec![];
    for source in markdown_files(&config.blog_dir)?.into_iter().rev() {
        let content = std::fs::read_to_string(&source)
            .with_context(|| format!("while reading {source:?}"))?;
        let slug = slug_of(&source);
        entries.push(BlogEntry {
            title: title_from_markdown(&content, &slug),
            date: extract_front_matter(&content).date,
            slug,
            source,
        });
    }
    Ok(entries)
}

fn build_pages(config: &Config) -> anyhow::Result<()> {
    for source in markdown_files(&config.pages_dir)? {
        if source.file_name().is_some_and(|name| name == HAND_WRITTEN_INDEX) {
            debug!("Skipping hand-written {source:?}");
            continue;
        }
        let out_path = config.out_dir.join(format!("{}.html", slug_of(&source)));
        build_page(config, &source, &out_path, &config.page_template)?;
    }
    Ok(())
}

fn build_blog_posts(config: &Config, entries: &[BlogEntry]) -> anyhow::Result<()> {
    let blog_out_dir = config.blog_out_dir();
    for entry in entries {
        let out_path = blog_out_dir.join(format!("{}.html", entry.slug));
        build_page(config, &entry.source, &out_path, &config.blog_template)?;
    }
    Ok(())
}

fn copy_assets(config: &Config) -> anyhow::Result<()> {
    if !config.assets_dir.is_dir() {
        debug!("Assets directory {:?} does not exist.", config.assets_dir);
        return Ok(());
    }
    copy_tree(&config.assets_dir, &config.out_dir.join("assets"))?;
    info!("Copied assets");
    Ok(())
}

/// Creates the publish directory and makes sure mirroring cannot copy the
/// output onto itself. Both paths must already exist to be compared.
fn prepare_publish_dir(config: &Config) -> anyhow::Result<Option<PathBuf>> {
    let Some(publish_dir) = &config.publish_dir else {
        return Ok(None);
    };
    fs_extra::dir::create_all(publish_dir, false)
        .with_context(|| format!("while creating {publish_dir:?}"))?;

    let out_dir = config
        .out_dir
        .canonicalize()
        .with_context(|| format!("while resolving {:?}", config.out_dir))?;
    let resolved = publish_dir
        .canonicalize()
        .with_context(|| format!("while resolving {publish_dir:?}"))?;
    if resolved.starts_with(&out_dir) || out_dir.starts_with(&resolved) {
        bail!(
            "publish_dir({publish_dir:?}) and out_dir({:?}) must not be the same or nested.",
            config.out_dir
        );
    }
    Ok(Some(resolved))
}

fn publish(config: &Config, publish_dir: Option<&Path>) -> anyhow::Result<()> {
    let Some(publish_dir) = publish_dir else {
        return Ok(());
    };
    copy_tree(&config.out_dir, publish_dir)?;
    info!("Published to {}", publish_dir.display());
    Ok(())
}

fn write_output(out_path: &Path, html: &str) -> anyhow::Result<()> {
    if let Some(parent) = out_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("while creating {parent:?}"))?;
        }
    }
    std::fs::write(out_path, html).with_context(|| format!("while writing {out_path:?}"))
}

/// Runs the whole build. The first failure aborts it.
pub(crate) fn generate(config: &Config) -> anyhow::Result<()> {
    info!("Building site...");

    for dir in config.source_dirs() {
        fs_extra::dir::create_all(dir, false).with_context(|| format!("while creating {dir:?}"))?;
    }
    fs_extra::dir::create_all(&config.out_dir, false)
        .with_context(|| format!("while creating {:?}", config.out_dir))?;
    let publish_dir = prepare_publish_dir(config)?;

    build_pages(config)?;
    let entries = build_blog_index(config)?;
    build_blog_posts(config, &entries)?;
    feed::write_feed(config, &entries)?;
    copy_assets(config)?;
    publish(config, publish_dir.as_deref())?;

    info!("Build complete!");
    Ok(())
}
