//! Dateline to canonical location mapping.
//!
//! Rules are checked in their configured order and the first keyword found
//! anywhere in the lower-cased text wins, so more specific keywords (district
//! names) must come before broad ones (`kerala`, `india`).

use crate::config::LocationRule;

/// Location used when neither the text nor the category maps to anything.
pub const DEFAULT_LOCATION: &str = "Kerala/General";

#[derive(Debug, Clone)]
pub struct LocationNormalizer {
    rules: Vec<LocationRule>,
}

impl LocationNormalizer {
    pub fn new(rules: &[LocationRule]) -> Self {
        LocationNormalizer {
            rules: rules
                .iter()
                .map(|r| LocationRule {
                    keyword: r.keyword.to_lowercase(),
                    location: r.location.clone(),
                })
                .collect(),
        }
    }

    /// Canonical location for the first keyword contained in `text`.
    pub fn match_keyword(&self, text: &str) -> Option<&str> {
        let text = text.to_lowercase();
        self.rules
            .iter()
            .find(|r| text.contains(&r.keyword))
            .map(|r| r.location.as_str())
    }

    /// Location implied by a category key alone.
    pub fn default_for(&self, category: &str) -> &str {
        let category = category.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.keyword == category)
            .map(|r| r.location.as_str())
            .unwrap_or(DEFAULT_LOCATION)
    }

    pub fn normalize(&self, text: &str, category: &str) -> String {
        self.match_keyword(text)
            .unwrap_or_else(|| self.default_for(category))
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScraperConfig;

    fn normalizer() -> LocationNormalizer {
        LocationNormalizer::new(&ScraperConfig::default().location_rules)
    }

    #[test]
    fn test_city_keyword() {
        assert_eq!(normalizer().normalize("Kochi city report", "kerala"), "Kerala/Ernakulam");
        assert_eq!(normalizer().normalize("KOZHIKODE:", "india"), "Kerala/Kozhikode");
    }

    #[test]
    fn test_priority_order() {
        // District rules come before the state-wide rule.
        assert_eq!(normalizer().normalize("Thrissur, Kerala", "world"), "Kerala/Thrissur");
        assert_eq!(normalizer().normalize("Kerala and India", "world"), "Kerala/General");
    }

    #[test]
    fn test_category_fallback() {
        assert_eq!(normalizer().normalize("no-location-text", "world"), "International");
        assert_eq!(normalizer().normalize("", "india"), "India/National");
    }

    #[test]
    fn test_unknown_category() {
        assert_eq!(normalizer().normalize("nonsense", "unknown-category"), "Kerala/General");
        assert_eq!(normalizer().default_for("sports"), DEFAULT_LOCATION);
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let rules = vec![LocationRule {
            keyword: "Dubai".to_string(),
            location: "International/Gulf".to_string(),
        }];
        let normalizer = LocationNormalizer::new(&rules);
        assert_eq!(normalizer.match_keyword("DUBAI bureau"), Some("International/Gulf"));
        assert_eq!(normalizer.match_keyword("Riyadh"), None);
    }
}
