/// Result of splitting a source document into its front matter and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FrontMatter {
    pub body: String,
    pub date: Option<String>,
}

/// Pulls the first `date: <value>` line out of `content`.
///
/// The line must start with `date:` and carry a non-empty value. It is removed
/// together with any blank lines directly after it; everything else is kept
/// byte for byte. Without such a line the content is returned unchanged.
pub(crate) fn extract_front_matter(content: &str) -> FrontMatter {
    let mut offset = 0;
    let mut lines = content.split_inclusive('\n');

    while let Some(line) = lines.next() {
        let start = offset;
        offset += line.len();

        let Some(value) = date_value(line) else {
            continue;
        };

        // swallow the blank lines following the date line
        let mut end = offset;
        for next in lines.by_ref() {
            if !next.trim().is_empty() {
                break;
            }
            end += next.len();
        }

        let mut body = String::with_capacity(content.len() - (end - start));
        body.push_str(&content[..start]);
        body.push_str(&content[end..]);
        return FrontMatter {
            body,
            date: Some(value.to_string()),
        };
    }

    FrontMatter {
        body: content.to_string(),
        date: None,
    }
}

fn date_value(line: &str) -> Option<&str> {
    let line = line.trim_end_matches(['\n', '\r']);
    let value = line.strip_prefix("date:")?.trim();
    (!value.is_empty()).then_some(value)
}
