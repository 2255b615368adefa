//! On-disk layout of a saved article: file naming and Markdown rendering.

use chrono::NaiveDateTime;
use osn_core::Article;
use std::ffi::OsStr;
use std::path::Path;

pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
pub const EXTENSION: &str = "md";
pub const TITLE_MAX_CHARS: usize = 30;

const TIMESTAMP_LEN: usize = 15;
const UNTITLED: &str = "untitled";

/// `<YYYYMMDD_HHMMSS>_<title truncated to 30 chars>.md`
pub fn file_name(article: &Article) -> String {
    let title: String = article
        .title
        .chars()
        .take(TITLE_MAX_CHARS)
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let title = if title.trim().is_empty() { UNTITLED } else { title.as_str() };

    format!(
        "{}_{}.{}",
        article.created_at.format(TIMESTAMP_FORMAT),
        title,
        EXTENSION
    )
}

pub fn render(article: &Article) -> String {
    let mut doc = format!("# {}\n\n##### Related Projects\n", article.title);

    for project in &article.projects {
        doc.push_str(&format!(
            "- [{}]({}) - ⭐ {} | 🔄 {}\n",
            project.name,
            project.stats.url(),
            project.stats.stars_label(),
            project.stats.forks_label()
        ));
    }

    if !article.companies.is_empty() {
        doc.push_str("\n##### Related Companies\n");
        for company in &article.companies {
            doc.push_str(&format!("- {}\n", company));
        }
    }

    doc.push_str(&format!("\n{}\n", article.body));
    doc
}

/// Creation time encoded in the first 15 characters of a file name.
pub fn parse_timestamp(filename: &str) -> Option<NaiveDateTime> {
    let prefix = filename.get(..TIMESTAMP_LEN)?;
    NaiveDateTime::parse_from_str(prefix, TIMESTAMP_FORMAT).ok()
}

/// Display title taken from a document's first line.
pub fn title_from_content(content: &str) -> String {
    content
        .lines()
        .next()
        .unwrap_or_default()
        .trim_matches(|c| c == '#' || c == ' ' || c == '\r')
        .to_string()
}

/// Only bare `*.md` names inside the storage directory are addressable.
/// Dots inside a title (`Wait... what`) are fine; separators are not.
pub fn is_valid_file_name(filename: &str) -> bool {
    !filename.contains('\\')
        && Path::new(filename).file_name() == Some(OsStr::new(filename))
        && Path::new(filename).extension() == Some(OsStr::new(EXTENSION))
}
