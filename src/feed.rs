use anyhow::Context;
use atom_syndication::{Entry, EntryBuilder, Feed, FeedBuilder, FixedDateTime, LinkBuilder};
use chrono::{TimeZone, Utc};
use log::{debug, info};

use crate::{
    config::Config,
    generator::{parse_date, BlogEntry},
};

fn updated_at(date: &str) -> Option<FixedDateTime> {
    let midnight = parse_date(date).ok()?.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight).into())
}

fn build_feed(config: &Config, site_url: &str, entries: &[BlogEntry]) -> Option<Feed> {
    let base = site_url.trim_end_matches('/');

    let items: Vec<(FixedDateTime, Entry)> = entries
        .iter()
        .filter_map(|entry| {
            let Some(updated) = entry.date.as_deref().and_then(updated_at) else {
                debug!("{:?} has no usable date. leaving it out of the feed.", entry.source);
                return None;
            };
            let url = format!("{base}{}", entry.href());
            let item = EntryBuilder::default()
                .title(entry.title.as_str())
                .id(url.as_str())
                .updated(updated)
                .links(vec![LinkBuilder::default().href(url).build()])
                .build();
            Some((updated, item))
        })
        .collect();

    let newest = items.iter().map(|(updated, _)| *updated).max()?;
    let feed = FeedBuilder::default()
        .title(config.site_title.as_str())
        .id(format!("{base}/blog/"))
        .updated(newest)
        .links(vec![LinkBuilder::default()
            .href(format!("{base}/blog/"))
            .build()])
        .entries(items.into_iter().map(|(_, item)| item).collect::<Vec<_>>())
        .build();
    Some(feed)
}

/// Writes `<out>/blog/atom.xml` when a site URL is configured and at least one
/// post carries a valid date.
pub(crate) fn write_feed(config: &Config, entries: &[BlogEntry]) -> anyhow::Result<()> {
    let Some(site_url) = &config.site_url else {
        return Ok(());
    };
    let Some(feed) = build_feed(config, site_url, entries) else {
        debug!("No dated blog posts. skipping atom feed.");
        return Ok(());
    };

    let path = config.blog_out_dir().join("atom.xml");
    std::fs::write(&path, feed.to_string())
        .with_context(|| format!("while writing {path:?}"))?;
    info!("Built: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;

    fn entry(slug: &str, date: Option<&str>) -> BlogEntry {
        BlogEntry {
            slug: slug.to_string(),
            title: format!("Title {slug}"),
            date: date.map(str::to_string),
            source: PathBuf::from(format!("{slug}.md")),
        }
    }

    #[test]
    fn feed_skips_undated_posts() {
        let config = Config::rooted(Path::new("/site"));
        let entries = [
            entry("b", Some("2024-02-01")),
            entry("draft", None),
            entry("a", Some("2024-01-01")),
        ];

        let feed = build_feed(&config, "https://example.com/", &entries).unwrap();

        assert_eq!(feed.entries().len(), 2);
        assert_eq!(feed.entries()[0].id(), "https://example.com/blog/b.html");
        assert_eq!(feed.entries()[1].links()[0].href(), "https://example.com/blog/a.html");
        assert_eq!(feed.updated().to_rfc3339(), "2024-02-01T00:00:00+00:00");
    }

    #[test]
    fn accepts_the_same_dates_as_the_listing() {
        let mut config = Config::rooted(Path::new("/site"));
        config.site_title = "Notes".to_string();

        let feed = build_feed(&config, "https://example.com", &[entry("a", Some("2024-1-5"))]).unwrap();

        assert_eq!(feed.title().value, "Notes");
        assert_eq!(feed.updated().to_rfc3339(), "2024-01-05T00:00:00+00:00");
    }

    #[test]
    fn no_feed_without_dates() {
        let config = Config::rooted(Path::new("/site"));
        assert!(build_feed(&config, "https://example.com", &[entry("x", None)]).is_none());
    }

    #[test]
    fn written_only_with_site_url() {
        let root = tempfile::tempdir().unwrap();
        let mut config = Config::rooted(root.path());
        std::fs::create_dir_all(config.blog_out_dir()).unwrap();
        let entries = [entry("a", Some("2024-01-01"))];

        write_feed(&config, &entries).unwrap();
        assert!(!config.blog_out_dir().join("atom.xml").exists());

        config.site_url = Some("https://example.com".to_string());
        write_feed(&config, &entries).unwrap();
        let xml = std::fs::read_to_string(config.blog_out_dir().join("atom.xml")).unwrap();
        assert!(xml.contains("https://example.com/blog/a.html"));
        assert!(xml.contains("Title a"));
    }
}
