use std::sync::Arc;

use jobfinder_core::error::AppError;
use jobfinder_core::models::JobRecord;
use jobfinder_core::traits::Extractor;
use scraper::{Html, Selector};
use url::Url;

use crate::extractor::{DEFAULT_MARKER_CLASS, build_record};

/// [`Extractor`] that parses the document into a tree with `scraper` and
/// selects `a.<marker>` elements.
///
/// Slower than [`super::PatternExtractor`] but immune to attribute-order and
/// quoting quirks. Field rules are identical. The HTML parser decodes
/// attribute values, so they reach `build_record` already decoded.
#[derive(Clone)]
pub struct DomExtractor {
    selector: Arc<Selector>,
    base_url: Option<Url>,
}

impl DomExtractor {
    pub fn new(marker_class: &str) -> Result<Self, AppError> {
        let valid = !marker_class.is_empty()
            && marker_class
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(AppError::Config(format!(
                "Invalid marker class '{marker_class}'"
            )));
        }

        let selector = Selector::parse(&format!("a.{marker_class}"))
            .map_err(|e| AppError::Config(format!("Invalid selector: {e}")))?;

        Ok(Self {
            selector: Arc::new(selector),
            base_url: None,
        })
    }

    /// Resolve relative links against `base_url`.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }
}

impl Default for DomExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_CLASS).expect("default marker class is a valid selector")
    }
}

impl Extractor for DomExtractor {
    fn extract(&self, html: &str) -> Vec<JobRecord> {
        let document = Html::parse_document(html);

        document
            .select(&self.selector)
            .filter_map(|card| {
                let el = card.value();
                build_record(
                    el.attr("data-name"),
                    el.attr("data-office"),
                    el.attr("data-schedule"),
                    el.attr("data-salary"),
                    el.attr("href"),
                    self.base_url.as_ref(),
                )
            })
            .collect()
    }
}
