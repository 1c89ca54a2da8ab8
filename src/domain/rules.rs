//! Keyword rules used to categorise imported transactions.

use serde::{Deserialize, Serialize};

/// Assigns `category` to transactions whose description contains `keyword`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeywordRule {
    pub keyword: String,
    #[serde(default)]
    pub category: String,
}

impl KeywordRule {
    pub fn new(keyword: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            category: category.into(),
        }
    }

    /// Case-insensitive substring match; empty keywords never match.
    pub fn matches(&self, description: &str) -> bool {
        !self.keyword.is_empty()
            && !description.is_empty()
            && description
                .to_lowercase()
                .contains(&self.keyword.to_lowercase())
    }
}

/// Ordered rule list; the first matching rule wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct RuleSet {
    pub rules: Vec<KeywordRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        Self { rules }
    }

    pub fn first_match(&self, description: &str) -> Option<&KeywordRule> {
        self.rules.iter().find(|rule| rule.matches(description))
    }

    pub fn contains_keyword(&self, keyword: &str) -> bool {
        let needle = keyword.trim().to_lowercase();
        self.rules
            .iter()
            .any(|rule| rule.keyword.to_lowercase() == needle)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
