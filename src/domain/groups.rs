//! User-defined category groups and display orderings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::category::Category;

/// Reserved group whose members are reported outside the primary totals.
pub const CASHFLOW_GROUP: &str = "Cashflow items";
/// Pseudo-group collecting income categories without a valid group.
pub const OTHER_INCOME_GROUP: &str = "Other Income";
/// Pseudo-group collecting expense categories without a valid group.
pub const OTHER_EXPENSES_GROUP: &str = "Other Expenses";
/// Category used for transactions that carry no category.
pub const OTHER_CATEGORY: &str = "Other";

/// Group configuration as persisted by the application.
///
/// Groups and categories reference each other only by name: a category points at
/// its group through `assignments`, and each group keeps an ordered list of
/// category names in `category_orders`. The order lists are caches and may be
/// stale; `assignments` is authoritative.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupConfig {
    #[serde(default)]
    pub groups: Vec<String>,
    /// Category name to group name.
    #[serde(default)]
    pub assignments: BTreeMap<String, String>,
    #[serde(default)]
    pub group_order: Vec<String>,
    /// Group name to ordered category names.
    #[serde(default)]
    pub category_orders: BTreeMap<String, Vec<String>>,
    /// Global category display order.
    #[serde(default)]
    pub category_order: Vec<String>,
}

impl GroupConfig {
    pub fn new(groups: Vec<String>) -> Self {
        Self {
            groups,
            ..Self::default()
        }
    }

    /// Assigned group for a category; empty assignments count as none.
    pub fn group_of(&self, category: &str) -> Option<&str> {
        self.assignments
            .get(category)
            .map(String::as_str)
            .filter(|group| !group.is_empty())
    }

    pub fn order_for(&self, group: &str) -> &[String] {
        self.category_orders
            .get(group)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_group(&self, name: &str) -> bool {
        self.groups.iter().any(|group| group == name)
    }
}

/// Categories of one real group, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMembers {
    pub name: String,
    pub categories: Vec<Category>,
}

/// Every category placed in exactly one bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPartition {
    /// Real groups other than the cashflow group, in effective group order.
    pub groups: Vec<GroupMembers>,
    pub other_income: Vec<Category>,
    pub other_expense: Vec<Category>,
    pub cashflow: Vec<Category>,
}

impl GroupPartition {
    pub fn group(&self, name: &str) -> Option<&GroupMembers> {
        self.groups.iter().find(|members| members.name == name)
    }

    pub fn is_cashflow(&self, category: &str) -> bool {
        self.cashflow.iter().any(|member| member.name == category)
    }

    /// Every partitioned category except the cashflow ones.
    pub fn primary_categories(&self) -> impl Iterator<Item = &Category> {
        self.groups
            .iter()
            .flat_map(|members| members.categories.iter())
            .chain(self.other_income.iter())
            .chain(self.other_expense.iter())
    }
}

/// Returns `true` for the names synthesised by the resolver rather than stored.
pub fn is_pseudo_group(name: &str) -> bool {
    name == OTHER_INCOME_GROUP || name == OTHER_EXPENSES_GROUP
}
