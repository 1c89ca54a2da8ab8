use serde::{Deserialize, Serialize};

use crate::domain::{
    category::Taxonomy, groups::GroupConfig, rules::RuleSet, transaction::Transaction,
};

/// Everything the application persists for one user: the opaque state the
/// reporting core is fed from.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Workspace {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub taxonomy: Taxonomy,
    #[serde(default)]
    pub groups: GroupConfig,
    #[serde(default)]
    pub rules: RuleSet,
}

impl Workspace {
    pub fn new(transactions: Vec<Transaction>, taxonomy: Taxonomy) -> Self {
        Self {
            transactions,
            taxonomy,
            ..Self::default()
        }
    }

    pub fn with_groups(mut self, groups: GroupConfig) -> Self {
        self.groups = groups;
        self
    }
}
