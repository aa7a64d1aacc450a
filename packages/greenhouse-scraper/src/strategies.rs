//! Ordered selector chains, one per field.
//!
//! Each chain runs specific to generic; the first selector whose first
//! match has non-empty trimmed text wins. Chains are data rather than
//! nested conditionals so each strategy can be exercised on its own.

use scraper::{Html, Selector};

/// Title: specific class, qualified heading, then any heading.
pub const TITLE_SELECTORS: &[&str] = &[".app-title", "h1.app-title", "h1"];

/// Company: specific class, class-substring match, qualified tag.
/// The URL-derived fallback lives with the caller.
pub const COMPANY_SELECTORS: &[&str] = &[
    ".company-name",
    r#"[class*="company-name"]"#,
    "span.company-name",
];

/// Location: specific class, class-substring match, alternate class.
pub const LOCATION_SELECTORS: &[&str] = &[
    ".location",
    r#"[class*="location"]"#,
    ".job-location",
];

/// Run a chain against the document.
///
/// Unparsable selectors are skipped rather than failing the field; a
/// selector that matches an element with only whitespace falls through
/// to the next strategy.
pub fn first_text(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors
        .iter()
        .filter_map(|raw| Selector::parse(raw).ok())
        .find_map(|selector| {
            document
                .select(&selector)
                .next()
                .map(|element| element.text().collect::<String>().trim().to_string())
                .filter(|text| !text.is_empty())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_selector_with_text_wins() {
        let html = r#"<html><body>
            <div class="app-title">Staff Engineer</div>
            <h1>Something generic</h1>
        </body></html>"#;
        let document = Html::parse_document(html);

        assert_eq!(
            first_text(&document, TITLE_SELECTORS),
            Some("Staff Engineer".to_string())
        );
    }

    #[test]
    fn empty_text_falls_through_to_the_next_strategy() {
        let html = r#"<html><body>
            <div class="app-title">   </div>
            <h1>Backend Engineer</h1>
        </body></html>"#;
        let document = Html::parse_document(html);

        assert_eq!(
            first_text(&document, TITLE_SELECTORS),
            Some("Backend Engineer".to_string())
        );
    }

    #[test]
    fn class_substring_strategy_matches_decorated_classes() {
        let html = r#"<html><body>
            <span class="header__company-name--large">Acme Corp</span>
        </body></html>"#;
        let document = Html::parse_document(html);

        assert_eq!(
            first_text(&document, COMPANY_SELECTORS),
            Some("Acme Corp".to_string())
        );
    }

    #[test]
    fn no_match_yields_none() {
        let html = "<html><body><p>nothing here</p></body></html>";
        let document = Html::parse_document(html);

        assert_eq!(first_text(&document, LOCATION_SELECTORS), None);
    }

    #[test]
    fn text_is_trimmed() {
        let html = r#"<html><body><div class="location">
            Remote - US
        </div></body></html>"#;
        let document = Html::parse_document(html);

        assert_eq!(
            first_text(&document, LOCATION_SELECTORS),
            Some("Remote - US".to_string())
        );
    }
}
