use std::path::PathBuf;

/// A blog post as seen by the index and the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BlogEntry {
    pub slug: String,
    /// Listing title, taken from the raw Markdown heading.
    pub title: String,
    /// Front-matter date, verbatim.
    pub date: Option<String>,
    pub source: PathBuf,
}

impl BlogEntry {
    pub fn href(&self) -> String {
        format!("/blog/{}.html", self.slug)
    }
}
