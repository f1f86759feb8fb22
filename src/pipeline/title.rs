//! Title scraping and filename derivation.
//!
//! arXiv abstract pages carry the paper title in the document `<title>`,
//! usually as `[2301.01234] Example Paper`. Only the first `<title>` element
//! is consulted; nested markup (MathML, `<em>`, ...) is stripped and HTML
//! entities are decoded so the filename reads the way the page does.

use crate::config::FilenameStyle;
use crate::error::TitleError;
use crate::output::PaperId;
use once_cell::sync::Lazy;
use regex::Regex;

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title(?:\s[^>]*)?>(.*?)</title\s*>").unwrap());

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<("[^"]*"|'[^']*'|[^'">])*>"#).unwrap());

/// Extract the cleaned text of the first `<title>` element in `html`.
pub fn extract_title(html: &str) -> Result<String, TitleError> {
    let raw = TITLE_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or(TitleError::Missing)?;

    let cleaned = clean_title(raw);
    if cleaned.is_empty() {
        return Err(TitleError::Missing);
    }
    Ok(cleaned)
}

/// Strip markup, decode entities, drop control characters and collapse
/// whitespace.
pub fn clean_title(raw: &str) -> String {
    let without_tags = TAG_RE.replace_all(raw, "");
    let decoded = html_escape::decode_html_entities(&without_tags);
    decoded
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the Drive filename for `title`.
pub fn build_filename(title: &str, id: &PaperId, style: FilenameStyle) -> String {
    let title = title.trim();
    let title = title
        .strip_suffix(".pdf")
        .or_else(|| title.strip_suffix(".PDF"))
        .unwrap_or(title)
        .trim_end();

    match style {
        FilenameStyle::Title => format!("{title}.pdf"),
        FilenameStyle::IdPrefixed if title.contains(id.as_str()) => format!("{title}.pdf"),
        FilenameStyle::IdPrefixed => format!("{id} {title}.pdf"),
    }
}
