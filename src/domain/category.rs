//! Domain types representing income and expense categories.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::common::*;

/// Income categories offered to a fresh workspace.
pub const DEFAULT_INCOME_CATEGORIES: [&str; 5] = [
    "Salary",
    "Interest",
    "Sales Income",
    "Investment",
    "Other Income",
];

/// Expense categories offered to a fresh workspace.
pub const DEFAULT_EXPENSE_CATEGORIES: [&str; 9] = [
    "Groceries",
    "Rent",
    "Utilities",
    "Dining Out",
    "Transport",
    "Shopping",
    "Entertainment",
    "Medical",
    "Other Expense",
];

/// Categorises transactions for reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Category {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
}

impl Category {
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn income(name: impl Into<String>) -> Self {
        Self::new(name, CategoryKind::Income)
    }

    pub fn expense(name: impl Into<String>) -> Self {
        Self::new(name, CategoryKind::Expense)
    }

    pub fn is_income(&self) -> bool {
        self.kind == CategoryKind::Income
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Category {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.kind)
    }
}

/// Supported category types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    #[default]
    Expense,
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryKind::Income => "Income",
            CategoryKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

/// The user's category list. Order is the order categories were defined in.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Taxonomy {
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl Taxonomy {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Builds a taxonomy from the default income and expense lists.
    pub fn with_defaults() -> Self {
        let categories = DEFAULT_INCOME_CATEGORIES
            .iter()
            .map(|name| Category::income(*name))
            .chain(
                DEFAULT_EXPENSE_CATEGORIES
                    .iter()
                    .map(|name| Category::expense(*name)),
            )
            .collect();
        Self { categories }
    }

    pub fn find(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn income(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(|category| category.is_income())
    }

    pub fn expense(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(|category| !category.is_income())
    }

    pub fn income_names(&self) -> Vec<String> {
        self.income().map(|category| category.name.clone()).collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.categories
            .iter()
            .map(|category| category.name.clone())
            .collect()
    }

    /// Names with income categories first, then expenses, each in definition order.
    pub fn default_order(&self) -> Vec<String> {
        self.income()
            .chain(self.expense())
            .map(|category| category.name.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_kind_serializes_lowercase() {
        let json = serde_json::to_string(&Category::income("Salary")).unwrap();
        assert_eq!(json, r#"{"name":"Salary","type":"income"}"#);
    }

    #[test]
    fn default_order_puts_income_first() {
        let taxonomy = Taxonomy::new(vec![
            Category::expense("Rent"),
            Category::income("Salary"),
            Category::expense("Food"),
        ]);
        assert_eq!(taxonomy.default_order(), vec!["Salary", "Rent", "Food"]);
    }
}
