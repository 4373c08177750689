use scraper::{ElementRef, Html};

/// Substring an anchor's `href` must contain to count as a job posting.
pub const DEFAULT_JOB_MARKER: &str = "job";

/// Collects job-posting links from a career page.
///
/// Every `<a href>` whose raw attribute value contains the marker
/// (case-sensitive) is returned as written in the page, in document order.
/// No resolution, normalization or de-duplication is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobLinkExtractor {
    marker: String,
}

impl JobLinkExtractor {
    pub fn new() -> Self {
        Self::with_marker(DEFAULT_JOB_MARKER)
    }

    pub fn with_marker(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn extract(&self, html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|element| element.value().name().eq_ignore_ascii_case("a"))
            .filter_map(|element| element.value().attr("href"))
            .filter(|href| href.contains(self.marker.as_str()))
            .map(ToOwned::to_owned)
            .collect()
    }
}

impl Default for JobLinkExtractor {
    fn default() -> Self {
        Self::new()
    }
}
