//! Structural pattern matching over raw listings markup.
//!
//! A job card is an `<a>` start tag whose `class` list contains the marker
//! class (matched case-sensitively, as HTML class names are). Its fields live
//! in attributes:
//!
//! | attribute       | field                          |
//! |-----------------|--------------------------------|
//! | `data-name`     | title                          |
//! | `data-office`   | location (first part)          |
//! | `data-schedule` | location (second part)         |
//! | `data-salary`   | salary                         |
//! | `href`          | link (`http`/`https` only)     |
//!
//! No DOM is built. Matching runs on the `regex` crate's linear-time engine,
//! so hostile input cannot make it hang.

use std::sync::LazyLock;

use jobfinder_core::models::JobRecord;
use jobfinder_core::traits::Extractor;
use regex::{Captures, Regex};
use url::Url;

/// Class name marking a job card on the listings page.
pub const DEFAULT_MARKER_CLASS: &str = "personio-job-card";

/// Separator between the office and schedule parts of a location.
const LOCATION_SEPARATOR: &str = " – ";

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// One `name=value` pair inside a start tag, quoted either way or unquoted.
/// Matches are consumed left to right, so text inside one attribute's value
/// is never read as another attribute.
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s([^\s"'=<>/]+)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("valid regex")
});

static ENTITY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:#[xX]([0-9a-fA-F]{1,6})|#([0-9]{1,7})|(amp|lt|gt|quot|apos|nbsp));")
        .expect("valid regex")
});

/// Regex-based [`Extractor`].
#[derive(Clone)]
pub struct PatternExtractor {
    card: Regex,
    base_url: Option<Url>,
}

impl PatternExtractor {
    /// Extractor for cards carrying `marker_class`.
    pub fn new(marker_class: &str) -> Self {
        let marker = regex::escape(marker_class);
        // `<a ... class="... marker ..." ...>`, with either quote style.
        let card = Regex::new(&format!(
            r#"(?i)<a\s(?:[^>]*?\s)?class\s*=\s*(?:"(?:[^"]*\s)?(?-i:{marker})(?:\s[^"]*)?"|'(?:[^']*\s)?(?-i:{marker})(?:\s[^']*)?')[^>]*>"#
        ))
        .expect("escaped marker forms a valid regex");

        Self {
            card,
            base_url: None,
        }
    }

    /// Resolve relative links against `base_url`.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    fn parse_card(&self, tag: &str) -> Option<JobRecord> {
        let attrs = attributes(tag);
        let get = |name: &str| {
            attrs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, value)| decode_entities(value))
        };

        build_record(
            get("data-name").as_deref(),
            get("data-office").as_deref(),
            get("data-schedule").as_deref(),
            get("data-salary").as_deref(),
            get("href").as_deref(),
            self.base_url.as_ref(),
        )
    }
}

impl Default for PatternExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_CLASS)
    }
}

impl Extractor for PatternExtractor {
    fn extract(&self, html: &str) -> Vec<JobRecord> {
        let mut cards = 0usize;
        let jobs: Vec<JobRecord> = self
            .card
            .find_iter(html)
            .filter_map(|m| {
                cards += 1;
                self.parse_card(m.as_str())
            })
            .collect();

        tracing::debug!(
            cards,
            kept = jobs.len(),
            dropped = cards - jobs.len(),
            "Matched job cards"
        );
        jobs
    }
}

/// Attributes of a start tag in source order, names lower-cased. When a name
/// repeats, the first occurrence wins.
fn attributes(tag: &str) -> Vec<(String, &str)> {
    let mut attrs: Vec<(String, &str)> = Vec::new();
    for caps in ATTRIBUTE.captures_iter(tag) {
        let name = caps[1].to_ascii_lowercase();
        if attrs.iter().any(|(n, _)| *n == name) {
            continue;
        }
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map_or("", |m| m.as_str());
        attrs.push((name, value));
    }
    attrs
}

/// Assemble a record from attribute values that are already entity-decoded.
///
/// Returns `None` when the title or link is missing or blank after cleaning,
/// or when the link is not an `http`/`https` URL.
pub(crate) fn build_record(
    title: Option<&str>,
    office: Option<&str>,
    schedule: Option<&str>,
    salary: Option<&str>,
    href: Option<&str>,
    base_url: Option<&Url>,
) -> Option<JobRecord> {
    let title = title.map(clean_text).filter(|t| !t.is_empty())?;
    let link = href
        .map(clean_text)
        .filter(|l| !l.is_empty())
        .and_then(|l| resolve_link(&l, base_url))?;

    let parts: Vec<String> = [office, schedule]
        .into_iter()
        .flatten()
        .map(clean_text)
        .filter(|p| !p.is_empty())
        .collect();
    let location = (!parts.is_empty()).then(|| parts.join(LOCATION_SEPARATOR));

    let salary = salary.map(clean_text).filter(|s| !s.is_empty());

    Some(JobRecord {
        title,
        location,
        salary,
        link,
    })
}

/// Strip markup tags, collapse whitespace, trim.
pub fn clean_text(raw: &str) -> String {
    let stripped = TAG.replace_all(raw, " ");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Decode numeric references and the basic named entities in one pass, so
/// `&amp;lt;` becomes `&lt;` and not `<`.
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    ENTITY
        .replace_all(raw, |caps: &Captures| {
            let code = match (caps.get(1), caps.get(2)) {
                (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
                (_, Some(dec)) => dec.as_str().parse().ok(),
                _ => None,
            };
            if let Some(code) = code {
                return char::from_u32(code)
                    .filter(|c| *c != '\0')
                    .unwrap_or(char::REPLACEMENT_CHARACTER)
                    .to_string();
            }
            match &caps[3] {
                "amp" => "&",
                "lt" => "<",
                "gt" => ">",
                "quot" => "\"",
                "apos" => "'",
                _ => " ",
            }
            .to_string()
        })
        .into_owned()
}

/// Resolve `link` and keep it only if it is a web URL. A relative link with
/// no base to resolve against is kept as written.
fn resolve_link(link: &str, base_url: Option<&Url>) -> Option<String> {
    let resolved = match base_url {
        Some(base) => base.join(link),
        None => Url::parse(link),
    };

    match resolved {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url.into()),
        Ok(url) => {
            tracing::debug!(scheme = url.scheme(), "Dropping card with non-web link");
            None
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => Some(link.to_string()),
        Err(_) => None,
    }
}
