//! Element selectors.

use std::fmt;

/// Description of how to find zero-or-more elements in the current page.
///
/// Immutable once constructed; page objects declare these and hand them to
/// the wait and action layers, which serialize them to the W3C
/// `{using, value}` pair on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum By {
    Css(String),
    XPath(String),
    Id(String),
    Name(String),
    Tag(String),
    LinkText(String),
}

impl By {
    pub fn css(selector: impl Into<String>) -> Self {
        By::Css(selector.into())
    }

    pub fn xpath(selector: impl Into<String>) -> Self {
        By::XPath(selector.into())
    }

    /// The W3C location strategy and selector for this locator. Id and Name
    /// have no first-class strategy in the protocol and are expressed as CSS
    /// attribute selectors.
    pub fn w3c_selector(&self) -> (&'static str, String) {
        match self {
            By::Css(s) => ("css selector", s.clone()),
            By::XPath(s) => ("xpath", s.clone()),
            By::Id(s) => ("css selector", format!(r#"[id="{}"]"#, s)),
            By::Name(s) => ("css selector", format!(r#"[name="{}"]"#, s)),
            By::Tag(s) => ("tag name", s.clone()),
            By::LinkText(s) => ("link text", s.clone()),
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            By::Css(s) => write!(f, "css:{}", s),
            By::XPath(s) => write!(f, "xpath:{}", s),
            By::Id(s) => write!(f, "id:{}", s),
            By::Name(s) => write!(f, "name:{}", s),
            By::Tag(s) => write!(f, "tag:{}", s),
            By::LinkText(s) => write!(f, "link-text:{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_and_name_map_to_css_attribute_selectors() {
        assert_eq!(
            By::Id("search-field".to_string()).w3c_selector(),
            ("css selector", r#"[id="search-field"]"#.to_string())
        );
        assert_eq!(
            By::Name("q".to_string()).w3c_selector(),
            ("css selector", r#"[name="q"]"#.to_string())
        );
    }

    #[test]
    fn xpath_passes_through() {
        let by = By::xpath("//footer//h2");
        assert_eq!(by.w3c_selector(), ("xpath", "//footer//h2".to_string()));
        assert_eq!(by.to_string(), "xpath://footer//h2");
    }
}
