use std::path::{Path, PathBuf};

pub(crate) const PAGE_TEMPLATE: &str = "page";
pub(crate) const BLOG_TEMPLATE: &str = "blog";
pub(crate) const BLOG_INDEX_TEMPLATE: &str = "blog-index";

/// Everything the generator needs to know about where things live.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub content_dir: PathBuf,
    pub pages_dir: PathBuf,
    pub blog_dir: PathBuf,
    pub template_dir: PathBuf,
    pub out_dir: PathBuf,
    pub assets_dir: PathBuf,
    /// Output is mirrored here after a successful build. `None` disables it.
    pub publish_dir: Option<PathBuf>,

    pub page_template: String,
    pub blog_template: String,
    pub blog_index_template: String,

    /// Absolute base URL of the site. The atom feed is only written when set.
    pub site_url: Option<String>,
    pub site_title: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::rooted(Path::new("."))
    }
}

impl Config {
    /// Default layout resolved below `root`.
    pub fn rooted(root: &Path) -> Self {
        let content_dir = root.join("content");
        Self {
            pages_dir: content_dir.join("pages"),
            blog_dir: content_dir.join("blog"),
            content_dir,
            template_dir: root.join("templates"),
            out_dir: root.join("dist"),
            assets_dir: root.join("assets"),
            publish_dir: Some(root.join("docs")),
            page_template: PAGE_TEMPLATE.to_string(),
            blog_template: BLOG_TEMPLATE.to_string(),
            blog_index_template: BLOG_INDEX_TEMPLATE.to_string(),
            site_url: None,
            site_title: "Blog".to_string(),
        }
    }

    pub fn blog_out_dir(&self) -> PathBuf {
        self.out_dir.join("blog")
    }

    /// Source directories created on every build so a fresh checkout builds cleanly.
    pub fn source_dirs(&self) -> [&Path; 4] {
        [
            &self.content_dir,
            &self.pages_dir,
            &self.blog_dir,
            &self.template_dir,
        ]
    }
}
