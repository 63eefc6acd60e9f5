use std::path::PathBuf;

use anyhow::bail;
use clap::{command, Arg, ArgAction, ArgMatches, Command};
use config::Config;
use generator::generate;

mod config;
mod feed;
mod generator;
mod metadata;
mod renderer;

fn path_arg(name: &'static str, long: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(long)
        .help(help)
        .value_parser(clap::value_parser!(PathBuf))
}

fn config_from(matches: &ArgMatches) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let path = |name: &str| matches.get_one::<PathBuf>(name).cloned();

    if let Some(content_dir) = path("content_dir") {
        config.pages_dir = content_dir.join("pages");
        config.blog_dir = content_dir.join("blog");
        config.content_dir = content_dir;
    }
    if let Some(pages_dir) = path("pages_dir") {
        config.pages_dir = pages_dir;
    }
    if let Some(blog_dir) = path("blog_dir") {
        config.blog_dir = blog_dir;
    }
    if let Some(template_dir) = path("template_dir") {
        config.template_dir = template_dir;
    }
    if let Some(out_dir) = path("out_dir") {
        config.out_dir = out_dir;
    }
    if let Some(assets_dir) = path("assets_dir") {
        config.assets_dir = assets_dir;
    }
    if matches.get_flag("no_publish") {
        config.publish_dir = None;
    } else if let Some(publish_dir) = path("publish_dir") {
        config.publish_dir = Some(publish_dir);
    }
    if let Some(blog_template) = matches.get_one::<String>("blog_template") {
        config.blog_template = blog_template.clone();
    }
    config.site_url = matches.get_one::<String>("site_url").cloned();
    if let Some(site_title) = matches.get_one::<String>("site_title") {
        config.site_title = site_title.clone();
    }

    if config.out_dir.exists() && !config.out_dir.is_dir() {
        bail!("if out_dir exists, it must be directory.");
    }

    Ok(config)
}

fn cli() -> Command {
    command!().args(&[
        path_arg("content_dir", "content-dir", "Content root [default: content]"),
        path_arg(
            "pages_dir",
            "pages-dir",
            "Markdown pages [default: <content_dir>/pages]",
        ),
        path_arg(
            "blog_dir",
            "blog-dir",
            "Markdown blog posts [default: <content_dir>/blog]",
        ),
        path_arg(
            "template_dir",
            "template-dir",
            "Directory of templates [default: templates]",
        ),
        path_arg("out_dir", "out-dir", "Directory path of output [default: dist]"),
        path_arg(
            "assets_dir",
            "assets-dir",
            "Copied into <out_dir>/assets as it is [default: assets]",
        ),
        path_arg(
            "publish_dir",
            "publish-dir",
            "The output is mirrored here after the build [default: docs]",
        ),
        Arg::new("no_publish")
            .long("no-publish")
            .help("Do not mirror the output into publish_dir")
            .action(ArgAction::SetTrue),
        Arg::new("blog_template")
            .long("blog-template")
            .help("Template used for blog posts [default: blog]"),
        Arg::new("site_url")
            .long("site-url")
            .help("Absolute site URL. When given, blog/atom.xml is generated."),
        Arg::new("site_title")
            .long("site-title")
            .help("Title of the atom feed [default: Blog]"),
    ])
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config_from(&cli().get_matches())?;
    log::debug!("{config:?}");

    generate(&config)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Config> {
        let matches = cli().try_get_matches_from(std::iter::once("mdsite").chain(args.iter().copied()))?;
        config_from(&matches)
    }

    #[test]
    fn no_arguments_uses_fixed_layout() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.pages_dir, Path::new("./content/pages"));
        assert_eq!(config.out_dir, Path::new("./dist"));
        assert_eq!(config.publish_dir.as_deref(), Some(Path::new("./docs")));
        assert_eq!(config.blog_template, "blog");
        assert!(config.site_url.is_none());
        assert_eq!(config.site_title, "Blog");
    }

    #[test]
    fn content_dir_moves_pages_and_blog() {
        let config = parse(&["--content-dir", "src", "--blog-dir", "posts"]).unwrap();
        assert_eq!(config.pages_dir, Path::new("src/pages"));
        assert_eq!(config.blog_dir, Path::new("posts"));
    }

    #[test]
    fn publishing_can_be_disabled() {
        let config = parse(&["--no-publish", "--publish-dir", "site"]).unwrap();
        assert!(config.publish_dir.is_none());
    }

    #[test]
    fn overrides() {
        let config = parse(&[
            "--blog-template",
            "page",
            "--site-url",
            "https://example.com",
            "--template-dir",
            "tpl",
            "--site-title",
            "Notes",
        ])
        .unwrap();
        assert_eq!(config.blog_template, "page");
        assert_eq!(config.site_url.as_deref(), Some("https://example.com"));
        assert_eq!(config.template_dir, Path::new("tpl"));
        assert_eq!(config.site_title, "Notes");
    }
}
