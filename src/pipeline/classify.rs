//! Page classification: is this URL an arXiv abstract page, a PDF page, or
//! neither?
//!
//! The URL is taken apart structurally. Only the first path segment decides
//! the page kind and everything after it is the identifier, so old-style ids
//! such as `cs.LG/0501001` (which contain a slash) and ids that happen to
//! contain the letters `abs` are never mis-split.

use crate::output::PaperId;
use reqwest::Url;

/// A supported arXiv page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    /// `<base>/abs/<id>`
    Abstract(PaperId),
    /// `<base>/pdf/<id>[.pdf]`
    Pdf(PaperId),
}

impl PageKind {
    pub fn paper_id(&self) -> &PaperId {
        match self {
            PageKind::Abstract(id) | PageKind::Pdf(id) => id,
        }
    }
}

/// Classify `page_url` against the abstract and PDF page patterns of `base`.
///
/// Returns `None` for anything that is not one of the two supported pages:
/// another host or scheme, another path such as `/list/`, or an empty id.
pub fn classify(page_url: &str, base: &Url) -> Option<PageKind> {
    let url = Url::parse(page_url.trim()).ok()?;
    if url.scheme() != base.scheme()
        || url.host_str() != base.host_str()
        || url.port_or_known_default() != base.port_or_known_default()
    {
        return None;
    }

    let base_path = base.path().trim_end_matches('/');
    let path = url.path().strip_prefix(base_path)?;
    let path = path.trim_start_matches('/').trim_end_matches('/');

    let (kind, rest) = path.split_once('/')?;
    let id = match kind {
        "abs" => rest,
        "pdf" => rest.strip_suffix(".pdf").unwrap_or(rest),
        _ => return None,
    };
    if id.is_empty() || id.split('/').any(str::is_empty) {
        return None;
    }

    let id = PaperId::new(id);
    Some(match kind {
        "abs" => PageKind::Abstract(id),
        _ => PageKind::Pdf(id),
    })
}

/// `<base>/abs/<id>`
pub fn abs_url(base: &Url, id: &PaperId) -> String {
    format!("{}/abs/{}", base.as_str().trim_end_matches('/'), id)
}

/// `<base>/pdf/<id>.pdf`
pub fn pdf_url(base: &Url, id: &PaperId) -> String {
    format!("{}/pdf/{}.pdf", base.as_str().trim_end_matches('/'), id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://arxiv.org").unwrap()
    }

    fn id_of(kind: Option<PageKind>) -> String {
        kind.expect("expected a supported page")
            .paper_id()
            .to_string()
    }

    #[test]
    fn abstract_new_style() {
        let k = classify("https://arxiv.org/abs/2301.01234", &base());
        assert_eq!(k, Some(PageKind::Abstract(PaperId::new("2301.01234"))));
    }

    #[test]
    fn abstract_with_version() {
        assert_eq!(
            id_of(classify("https://arxiv.org/abs/1706.03762v7", &base())),
            "1706.03762v7"
        );
    }

    #[test]
    fn abstract_old_style_keeps_archive() {
        assert_eq!(
            id_of(classify("https://arxiv.org/abs/cs.LG/0501001", &base())),
            "cs.LG/0501001"
        );
        assert_eq!(
            id_of(classify("https://arxiv.org/abs/hep-th/9901001v2", &base())),
            "hep-th/9901001v2"
        );
    }

    #[test]
    fn id_containing_abs_is_not_split() {
        assert_eq!(
            id_of(classify("https://arxiv.org/abs/math.abs/0101001", &base())),
            "math.abs/0101001"
        );
    }

    #[test]
    fn pdf_with_and_without_extension() {
        assert_eq!(
            classify("https://arxiv.org/pdf/2301.01234.pdf", &base()),
            Some(PageKind::Pdf(PaperId::new("2301.01234")))
        );
        assert_eq!(
            id_of(classify("https://arxiv.org/pdf/2301.01234v2", &base())),
            "2301.01234v2"
        );
        assert_eq!(
            id_of(classify("https://arxiv.org/pdf/cs.LG/0501001.pdf", &base())),
            "cs.LG/0501001"
        );
    }

    #[test]
    fn query_and_fragment_are_ignored() {
        assert_eq!(
            id_of(classify("https://arxiv.org/abs/2301.01234?context=cs#top", &base())),
            "2301.01234"
        );
    }

    #[test]
    fn unsupported_pages() {
        for url in [
            "https://example.com/abs/2301.01234",
            "http://arxiv.org/abs/2301.01234",
            "https://arxiv.org/list/cs.LG/recent",
            "https://arxiv.org/abs/",
            "https://arxiv.org/",
            "https://arxiv.org/abs",
            "chrome://newtab",
            "not a url",
            "",
        ] {
            assert_eq!(classify(url, &base()), None, "{url}");
        }
    }

    #[test]
    fn abs_to_pdf_is_segment_swap_plus_extension() {
        for id in ["2301.01234", "2301.01234v3", "cs.LG/0501001", "0704.0001"] {
            let abs = format!("https://arxiv.org/abs/{id}");
            let kind = classify(&abs, &base()).unwrap();
            let expected = format!("{}.pdf", abs.replacen("/abs/", "/pdf/", 1));
            assert_eq!(pdf_url(&base(), kind.paper_id()), expected);
        }
    }

    #[test]
    fn pdf_to_abs_uses_stripped_id() {
        let kind = classify("https://arxiv.org/pdf/2301.01234.pdf", &base()).unwrap();
        assert_eq!(
            abs_url(&base(), kind.paper_id()),
            "https://arxiv.org/abs/2301.01234"
        );
    }

    #[test]
    fn custom_base_with_port() {
        let base = Url::parse("http://127.0.0.1:9000").unwrap();
        assert_eq!(
            id_of(classify("http://127.0.0.1:9000/abs/2301.01234", &base)),
            "2301.01234"
        );
        assert_eq!(classify("http://127.0.0.1:9001/abs/2301.01234", &base), None);
    }
}
