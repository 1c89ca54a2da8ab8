//! Decides whether a category counts as income or expense.

use std::collections::{HashMap, HashSet};

use crate::domain::category::{Category, CategoryKind, Taxonomy, DEFAULT_INCOME_CATEGORIES};
use crate::domain::common::NamedEntity;

/// A category as callers hold it: either a typed taxonomy entry or a bare name.
#[derive(Debug, Clone, Copy)]
pub enum CategoryRef<'a> {
    Typed(&'a Category),
    Name(&'a str),
}

impl<'a> From<&'a Category> for CategoryRef<'a> {
    fn from(category: &'a Category) -> Self {
        CategoryRef::Typed(category)
    }
}

impl<'a> From<&'a str> for CategoryRef<'a> {
    fn from(name: &'a str) -> Self {
        CategoryRef::Name(name)
    }
}

impl<'a> From<&'a String> for CategoryRef<'a> {
    fn from(name: &'a String) -> Self {
        CategoryRef::Name(name.as_str())
    }
}

/// Stored kinds by exact name, then a case-insensitive lookup against known income names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryClassifier {
    income: HashSet<String>,
    typed: HashMap<String, CategoryKind>,
}

impl CategoryClassifier {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let income = names
            .into_iter()
            .map(|name| name.as_ref().to_lowercase())
            .collect();
        Self {
            income,
            typed: HashMap::new(),
        }
    }

    /// Names of `categories` resolve to their stored kind; other names use the income entries.
    pub fn from_categories<'a, I>(categories: I) -> Self
    where
        I: IntoIterator<Item = &'a Category>,
    {
        let categories: Vec<&Category> = categories.into_iter().collect();
        let mut classifier = Self::from_names(
            categories
                .iter()
                .filter(|category| category.is_income())
                .map(|category| category.name()),
        );
        classifier.typed = categories
            .iter()
            .map(|category| (category.name().to_string(), category.kind))
            .collect();
        classifier
    }

    pub fn from_taxonomy(taxonomy: &Taxonomy) -> Self {
        Self::from_categories(taxonomy.categories.iter())
    }

    /// Classifier over the default income category names.
    pub fn with_defaults() -> Self {
        Self::from_names(DEFAULT_INCOME_CATEGORIES)
    }

    /// Typed categories keep their stored kind; names fall back to expense unless known as income.
    pub fn classify<'a>(&self, category: impl Into<CategoryRef<'a>>) -> CategoryKind {
        match category.into() {
            CategoryRef::Typed(category) => category.kind,
            CategoryRef::Name(name) => {
                if let Some(kind) = self.typed.get(name) {
                    *kind
                } else if !name.is_empty() && self.income.contains(&name.to_lowercase()) {
                    CategoryKind::Income
                } else {
                    CategoryKind::Expense
                }
            }
        }
    }

    pub fn is_income<'a>(&self, category: impl Into<CategoryRef<'a>>) -> bool {
        self.classify(category) == CategoryKind::Income
    }
}

/// One-shot classification against a list of income category names.
pub fn classify_category<'a, S: AsRef<str>>(
    category: impl Into<CategoryRef<'a>>,
    income_categories: &[S],
) -> CategoryKind {
    CategoryClassifier::from_names(income_categories).classify(category)
}
