use std::path::{Path, PathBuf};

use anyhow::Context;

const TITLE: &str = "{{TITLE}}";
const CONTENT: &str = "{{CONTENT}}";
const DATE: &str = "{{DATE}}";

/// Values spliced into a template. Nothing is escaped: callers pass HTML.
#[derive(Debug, Default)]
pub(crate) struct Substitutions<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub date: Option<&'a str>,
}

#[derive(Debug)]
pub(crate) struct Template {
    path: PathBuf,
    source: String,
}

impl Template {
    /// Reads `<template_dir>/<name>.html`. Templates are not cached.
    pub fn load(template_dir: &Path, name: &str) -> anyhow::Result<Self> {
        let path = template_dir.join(format!("{name}.html"));
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("while loading template {path:?}"))?;
        Ok(Self { path, source })
    }

    #[cfg(test)]
    pub fn from_source(source: &str) -> Self {
        Self {
            path: PathBuf::new(),
            source: source.to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replaces the first `{{TITLE}}`, `{{CONTENT}}` and `{{DATE}}` of the template.
    ///
    /// Placeholders are located in the template source only, so text inside the
    /// substituted values is never expanded again. A missing date clears
    /// `{{DATE}}`; any other missing placeholder is simply not substituted.
    pub fn compose(&self, subs: &Substitutions) -> String {
        let mut slots: Vec<(usize, &str, &str)> = [
            (TITLE, subs.title),
            (CONTENT, subs.content),
            (DATE, subs.date.unwrap_or_default()),
        ]
        .into_iter()
        .filter_map(|(token, value)| self.source.find(token).map(|at| (at, token, value)))
        .collect();
        slots.sort_by_key(|(at, _, _)| *at);

        let extra: usize = slots.iter().map(|(_, _, value)| value.len()).sum();
        let mut out = String::with_capacity(self.source.len() + extra);
        let mut cursor = 0;
        for (at, token, value) in slots {
            out.push_str(&self.source[cursor..at]);
            out.push_str(value);
            cursor = at + token.len();
        }
        out.push_str(&self.source[cursor..]);
        out
    }
}
