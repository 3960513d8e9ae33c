use serde::{Deserialize, Serialize};
use std::fmt;

/// Element location strategy understood by every renderer backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locator {
    Id(String),
    ClassName(String),
    Css(String),
    XPath(String),
}

impl Locator {
    pub fn id(value: impl Into<String>) -> Self {
        Locator::Id(value.into())
    }

    pub fn class_name(value: impl Into<String>) -> Self {
        Locator::ClassName(value.into())
    }

    pub fn css(value: impl Into<String>) -> Self {
        Locator::Css(value.into())
    }

    pub fn xpath(value: impl Into<String>) -> Self {
        Locator::XPath(value.into())
    }

    /// CSS form of `Id` and `ClassName`; `None` for XPath.
    pub fn to_css(&self) -> Option<String> {
        match self {
            Locator::Id(id) => Some(format!("#{}", id)),
            Locator::ClassName(class) => Some(format!(".{}", class)),
            Locator::Css(selector) => Some(selector.clone()),
            Locator::XPath(_) => None,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(id) => write!(f, "id={}", id),
            Locator::ClassName(class) => write!(f, "class={}", class),
            Locator::Css(selector) => write!(f, "css={}", selector),
            Locator::XPath(path) => write!(f, "xpath={}", path),
        }
    }
}

/// Every locator role the harvester and extractor rely on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorSet {
    pub search_box: Locator,
    pub result_item: Locator,
    pub results_panel: Locator,
    /// Marker the panel renders once no more results will load.
    pub end_of_list: Option<Locator>,
    /// Descendant of a result item carrying a stable per-item token.
    pub item_identity: Locator,
    pub title: Locator,
    pub address: Locator,
    pub phone: Locator,
    pub website: Locator,
}

impl LocatorSet {
    pub fn google_maps() -> Self {
        Self {
            search_box: Locator::id("searchboxinput"),
            result_item: Locator::class_name("Nv2PK"),
            results_panel: Locator::css("div[role='feed']"),
            end_of_list: Some(Locator::css("span.HlvSq")),
            item_identity: Locator::css("a.hfpxzc"),
            title: Locator::class_name("DUwDvf"),
            address: Locator::xpath(
                "//button[@data-item-id='address']//div[contains(@class, 'rogA2c')]",
            ),
            phone: Locator::xpath(
                "//button[starts-with(@data-item-id, 'phone')]//div[contains(@class, 'rogA2c')]",
            ),
            website: Locator::xpath(
                "//a[@data-item-id='authority']//div[contains(@class, 'rogA2c')]",
            ),
        }
    }
}

impl Default for LocatorSet {
    fn default() -> Self {
        Self::google_maps()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_css_translation() {
        assert_eq!(Locator::id("searchboxinput").to_css().as_deref(), Some("#searchboxinput"));
        assert_eq!(Locator::class_name("Nv2PK").to_css().as_deref(), Some(".Nv2PK"));
        assert_eq!(Locator::xpath("//div").to_css(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Locator::class_name("DUwDvf").to_string(), "class=DUwDvf");
    }
}
