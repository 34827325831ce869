//! Ordered selector resolution.
//!
//! A field is described by a prioritized list of [`Locator`]s. Resolution walks
//! the list in order and stops at the first locator whose match yields a
//! non-empty value; later locators are never consulted once one succeeds.
//! Structured attributes listed on a locator are read before the element's
//! text, since attribute values are more reliable than scraped text.
//!
//! Document access goes through the [`Lookup`] trait so the resolution rules
//! can be exercised without parsing HTML.

use scraper::{Html, Selector};
use tracing::debug;

/// Where to look for a field: a CSS selector plus preferred attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locator {
    pub css: &'static str,
    /// Attributes tried in order before falling back to text content.
    pub attrs: &'static [&'static str],
}

impl Locator {
    /// Locator that reads only the element's text.
    pub const fn text(css: &'static str) -> Self {
        Locator { css, attrs: &[] }
    }

    /// Locator that prefers the given attributes, then the element's text.
    pub const fn attr(css: &'static str, attrs: &'static [&'static str]) -> Self {
        Locator { css, attrs }
    }

    /// Read this locator's value from a matched element.
    pub fn read(&self, found: &Found) -> Option<Resolved> {
        for name in self.attrs {
            if let Some(value) = found.attr(name) {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(Resolved {
                        value: value.to_string(),
                        origin: Origin::Attribute(*name),
                    });
                }
            }
        }

        let text = normalize_whitespace(&found.text);
        if text.is_empty() {
            None
        } else {
            Some(Resolved {
                value: text,
                origin: Origin::Text,
            })
        }
    }
}

/// Snapshot of a matched element: its attributes and its text content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Found {
    pub attrs: Vec<(String, String)>,
    pub text: String,
}

impl Found {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// How a resolved value was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Attribute(&'static str),
    Text,
}

/// A non-empty, trimmed value produced by a locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub value: String,
    pub origin: Origin,
}

/// Read access to a parsed document.
pub trait Lookup {
    /// The first element matching `css`, if any.
    fn first(&self, css: &str) -> Option<Found>;

    /// Text of every element matching `css`, in document order.
    fn all_text(&self, css: &str) -> Vec<String>;
}

impl Lookup for Html {
    fn first(&self, css: &str) -> Option<Found> {
        let selector = parse_selector(css)?;
        self.select(&selector).next().map(|element| Found {
            attrs: element
                .value()
                .attrs()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            text: element.text().collect::<String>(),
        })
    }

    fn all_text(&self, css: &str) -> Vec<String> {
        match parse_selector(css) {
            Some(selector) => self
                .select(&selector)
                .map(|element| element.text().collect::<String>())
                .collect(),
            None => Vec::new(),
        }
    }
}

fn parse_selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            debug!(css, error = %e, "Skipping unparseable selector");
            None
        }
    }
}

/// Trim and collapse internal runs of whitespace to single spaces.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First non-empty value across `candidates`, in priority order.
pub fn resolve<D: Lookup + ?Sized>(doc: &D, candidates: &[Locator]) -> Option<Resolved> {
    resolve_with(doc, candidates, Some)
}

/// Like [`resolve`], but a candidate only succeeds when `accept` maps its
/// value to `Some`. A rejected value moves resolution on to the next locator.
///
/// # Arguments
///
/// * `doc` - The document to search
/// * `candidates` - Locators in priority order
/// * `accept` - Converts a resolved value, or rejects it with `None`
///
/// # Returns
///
/// The first accepted value, or `None` when every candidate is missing, empty,
/// or rejected.
///
/// # Examples
///
/// ```ignore
/// let views = resolve_with(&doc, fields::VIEWS, |r| parse_count(&r.value));
/// ```
pub fn resolve_with<D, T, F>(doc: &D, candidates: &[Locator], mut accept: F) -> Option<T>
where
    D: Lookup + ?Sized,
    F: FnMut(Resolved) -> Option<T>,
{
    for locator in candidates {
        let Some(found) = doc.first(locator.css) else {
            continue;
        };
        if let Some(accepted) = locator.read(&found).and_then(&mut accept) {
            debug!(css = locator.css, "Locator matched");
            return Some(accepted);
        }
    }
    None
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;

    /// In-memory document keyed by selector string.
    #[derive(Default)]
    pub(crate) struct FakeDoc {
        pub nodes: HashMap<&'static str, Found>,
    }

    impl FakeDoc {
        pub(crate) fn with_text(mut self, css: &'static str, text: &str) -> Self {
            self.nodes.insert(
                css,
                Found {
                    attrs: vec![],
                    text: text.to_string(),
                },
            );
            self
        }

        pub(crate) fn with_attr(mut self, css: &'static str, name: &str, value: &str, text: &str) -> Self {
            self.nodes.insert(
                css,
                Found {
                    attrs: vec![(name.to_string(), value.to_string())],
                    text: text.to_string(),
                },
            );
            self
        }
    }

    impl Lookup for FakeDoc {
        fn first(&self, css: &str) -> Option<Found> {
            self.nodes.get(css).cloned()
        }

        fn all_text(&self, css: &str) -> Vec<String> {
            self.nodes.get(css).map(|f| vec![f.text.clone()]).unwrap_or_default()
        }
    }

    const A: Locator = Locator::text(".a");
    const B: Locator = Locator::text(".b");

    #[test]
    fn test_first_match_wins() {
        let doc = FakeDoc::default().with_text(".a", "alpha").with_text(".b", "beta");
        let resolved = resolve(&doc, &[A, B]).unwrap();
        assert_eq!(resolved.value, "alpha");

        let resolved = resolve(&doc, &[B, A]).unwrap();
        assert_eq!(resolved.value, "beta");
    }

    #[test]
    fn test_empty_match_falls_through() {
        let doc = FakeDoc::default().with_text(".a", "   \n ").with_text(".b", " beta ");
        let resolved = resolve(&doc, &[A, B]).unwrap();
        assert_eq!(resolved.value, "beta");
        assert_eq!(resolved.origin, Origin::Text);
    }

    #[test]
    fn test_no_match_is_none() {
        let doc = FakeDoc::default().with_text(".c", "gamma");
        assert!(resolve(&doc, &[A, B]).is_none());
        assert!(resolve(&doc, &[]).is_none());
    }

    #[test]
    fn test_attribute_preferred_over_text() {
        const TIME: Locator = Locator::attr("time", &["datetime"]);
        let doc = FakeDoc::default().with_attr("time", "datetime", "2025-06-01", "June 1");
        let resolved = resolve(&doc, &[TIME]).unwrap();
        assert_eq!(resolved.value, "2025-06-01");
        assert_eq!(resolved.origin, Origin::Attribute("datetime"));
    }

    #[test]
    fn test_blank_attribute_falls_back_to_text() {
        const TIME: Locator = Locator::attr("time", &["datetime"]);
        let doc = FakeDoc::default().with_attr("time", "datetime", "  ", "June 1");
        let resolved = resolve(&doc, &[TIME]).unwrap();
        assert_eq!(resolved.value, "June 1");
        assert_eq!(resolved.origin, Origin::Text);
    }

    #[test]
    fn test_rejected_value_moves_to_next_locator() {
        let doc = FakeDoc::default().with_text(".a", "no digits").with_text(".b", "42");
        let number = resolve_with(&doc, &[A, B], |r| r.value.parse::<u32>().ok());
        assert_eq!(number, Some(42));
    }

    #[test]
    fn test_whitespace_is_collapsed() {
        assert_eq!(normalize_whitespace("  Breaking:\n  rain \t alert "), "Breaking: rain alert");
    }

    #[test]
    fn test_html_lookup() {
        let html = Html::parse_document(
            r#"<html><head><title>Site</title></head><body>
            <h1 class="headline">  Rain <em>alert</em> </h1>
            <span data-views="1,200">views</span>
            <p>one</p><p>two three</p>
            </body></html>"#,
        );
        let found = html.first("h1.headline").unwrap();
        assert_eq!(normalize_whitespace(&found.text), "Rain alert");
        assert_eq!(html.first("[data-views]").unwrap().attr("data-views"), Some("1,200"));
        assert_eq!(html.all_text("p").len(), 2);
        assert!(html.first("[[invalid").is_none());
        assert!(html.all_text("[[invalid").is_empty());
    }
}
