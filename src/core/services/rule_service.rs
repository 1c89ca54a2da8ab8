//! Business logic helpers for keyword auto-categorisation rules.

use tracing::debug;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::rules::{KeywordRule, RuleSet};
use crate::domain::transaction::Transaction;

/// Provides validated operations for [`RuleSet`] values.
pub struct RuleService;

impl RuleService {
    /// Adds a rule; keywords must be non-empty and unique ignoring case.
    pub fn add(rules: &mut RuleSet, keyword: &str, category: &str) -> ServiceResult<()> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(ServiceError::Invalid("Please provide a keyword".into()));
        }
        if rules.contains_keyword(keyword) {
            return Err(ServiceError::Invalid(format!(
                "Keyword `{keyword}` already exists"
            )));
        }
        rules.rules.push(KeywordRule::new(keyword, category));
        Ok(())
    }

    /// Adds one uncategorised rule per non-empty line, skipping duplicates. Returns the number added.
    pub fn add_bulk(rules: &mut RuleSet, text: &str) -> usize {
        let mut added = 0;
        for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
            if rules.contains_keyword(line) {
                continue;
            }
            rules.rules.push(KeywordRule::new(line, ""));
            added += 1;
        }
        debug!(added, "bulk keyword import");
        added
    }

    /// Removes the rule at `index`; out of range indices are ignored.
    pub fn remove(rules: &mut RuleSet, index: usize) -> Option<KeywordRule> {
        (index < rules.rules.len()).then(|| rules.rules.remove(index))
    }

    pub fn set_category(rules: &mut RuleSet, index: usize, category: &str) -> ServiceResult<()> {
        let rule = rules
            .rules
            .get_mut(index)
            .ok_or_else(|| ServiceError::Invalid(format!("No rule at position {index}")))?;
        rule.category = category.to_string();
        Ok(())
    }

    /// Returns a copy of `transactions` with the first matching rule's category applied.
    pub fn apply(rules: &RuleSet, transactions: &[Transaction]) -> Vec<Transaction> {
        if rules.is_empty() {
            return transactions.to_vec();
        }
        let mut matched = 0usize;
        let categorised = transactions
            .iter()
            .map(|txn| {
                let mut txn = txn.clone();
                if let Some(rule) = rules.first_match(&txn.description) {
                    txn.category = rule.category.clone();
                    matched += 1;
                }
                txn
            })
            .collect();
        debug!(rules = rules.len(), matched, "applied keyword rules");
        categorised
    }
}
