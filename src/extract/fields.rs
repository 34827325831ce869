//! Field extractors.
//!
//! Each extractor resolves a field-specific candidate list (see
//! [`super::resolver`]) and then applies that field's fallback:
//!
//! | field | candidates tried | when unresolved |
//! |-------|------------------|-----------------|
//! | headline | `h1.article-title`, `h1.headline`, `h1`, ... `title` | record rejected |
//! | date | `time[datetime]`, `.date`, ... `[data-date]` | current time |
//! | location | `.location`, `.region`, `.dateline`, `.article-location` | category default |
//! | views / comments / likes / shares | `.view-count`, `.views`, `[data-views]`, ... | synthetic value |
//! | content length | `.article-content`, `.content`, ... | all `<p>` text |

use super::dates;
use super::resolver::{Locator, Lookup, Origin, resolve, resolve_with};
use crate::location::LocationNormalizer;
use crate::metrics::MetricFallback;
use crate::models::MetricField;
use once_cell::sync::Lazy;
use regex::Regex;

pub const HEADLINE: &[Locator] = &[
    Locator::text("h1.article-title"),
    Locator::text("h1.headline"),
    Locator::text("h1"),
    Locator::text(".title h1"),
    Locator::text(".article-headline"),
    Locator::text("title"),
];

pub const DATE: &[Locator] = &[
    Locator::attr("time[datetime]", &["datetime"]),
    Locator::attr(".date", &["datetime", "data-date"]),
    Locator::attr(".publish-date", &["datetime", "data-date"]),
    Locator::attr(".article-date", &["datetime", "data-date"]),
    Locator::attr("[data-date]", &["data-date"]),
];

pub const LOCATION: &[Locator] = &[
    Locator::text(".location"),
    Locator::text(".region"),
    Locator::text(".dateline"),
    Locator::text(".article-location"),
];

pub const VIEWS: &[Locator] = &[
    Locator::attr(".view-count", &["data-views"]),
    Locator::attr(".views", &["data-views"]),
    Locator::attr("[data-views]", &["data-views"]),
];

pub const COMMENTS: &[Locator] = &[
    Locator::attr(".comment-count", &["data-comments"]),
    Locator::attr(".comments-count", &["data-comments"]),
    Locator::attr("[data-comments]", &["data-comments"]),
];

pub const LIKES: &[Locator] = &[
    Locator::attr(".like-count", &["data-likes"]),
    Locator::attr(".likes", &["data-likes"]),
    Locator::attr("[data-likes]", &["data-likes"]),
];

pub const SHARES: &[Locator] = &[
    Locator::attr(".share-count", &["data-shares"]),
    Locator::attr(".shares", &["data-shares"]),
    Locator::attr("[data-shares]", &["data-shares"]),
];

pub const CONTENT: &[Locator] = &[
    Locator::text(".article-content"),
    Locator::text(".content"),
    Locator::text(".article-body"),
    Locator::text(".post-content"),
];

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

fn candidates_for(field: MetricField) -> &'static [Locator] {
    match field {
        MetricField::Views => VIEWS,
        MetricField::Comments => COMMENTS,
        MetricField::Likes => LIKES,
        MetricField::Shares => SHARES,
    }
}

/// Trimmed headline, or `None` when the page has none.
pub fn headline<D: Lookup + ?Sized>(doc: &D) -> Option<String> {
    resolve(doc, HEADLINE).map(|r| r.value)
}

/// Publication date in ISO-8601 form; the current time when unresolved.
pub fn date<D: Lookup + ?Sized>(doc: &D) -> String {
    match resolve(doc, DATE) {
        Some(resolved) => {
            dates::normalize_or_now(&resolved.value, matches!(resolved.origin, Origin::Attribute(_)))
        }
        None => dates::now_iso(),
    }
}

pub fn location<D: Lookup + ?Sized>(
    doc: &D,
    category: &str,
    normalizer: &LocationNormalizer,
) -> String {
    resolve_with(doc, LOCATION, |r| {
        normalizer.match_keyword(&r.value).map(str::to_string)
    })
    .unwrap_or_else(|| normalizer.default_for(category).to_string())
}

/// First run of digits after stripping thousands separators.
pub fn parse_count(text: &str) -> Option<u64> {
    let cleaned = text.replace(',', "");
    DIGITS.find(&cleaned).and_then(|m| m.as_str().parse().ok())
}

/// A count read from the page, or `None` when no candidate carries a number.
pub fn count<D: Lookup + ?Sized>(doc: &D, field: MetricField) -> Option<u64> {
    resolve_with(doc, candidates_for(field), |r| parse_count(&r.value))
}

/// A count for `field`, and whether it had to be synthesized.
pub fn count_or_synthesize<D, F>(doc: &D, field: MetricField, fallback: &F) -> (u64, bool)
where
    D: Lookup + ?Sized,
    F: MetricFallback + ?Sized,
{
    match count(doc, field) {
        Some(value) => (value, false),
        None => (fallback.synthesize(field), true),
    }
}

/// Whitespace-delimited word count of the main content.
///
/// The first content container present on the page is used even when later
/// ones exist. Every paragraph is counted instead when no container is
/// present or the one found holds no text.
pub fn content_length<D: Lookup + ?Sized>(doc: &D) -> u64 {
    let container = CONTENT.iter().find_map(|locator| doc.first(locator.css));
    let text = match container {
        Some(found) if !found.text.is_empty() => found.text,
        _ => doc.all_text("p").join(" "),
    };
    text.split_whitespace().count() as u64
}
