//! Category group resolution and group configuration edits.

use std::collections::HashMap;

use tracing::debug;

use crate::core::services::ordering::{move_in_place, reorder};
use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::category::{Category, Taxonomy};
use crate::domain::common::Direction;
use crate::domain::groups::{
    is_pseudo_group, GroupConfig, GroupMembers, GroupPartition, CASHFLOW_GROUP,
};

/// Resolves and edits [`GroupConfig`] state.
///
/// Assignments are authoritative; the per-group order lists only decide display
/// sequence and are repaired on every edit.
pub struct GroupService;

impl GroupService {
    /// Stored groups in group order, with the cashflow group appended when missing.
    pub fn effective_groups(config: &GroupConfig) -> Vec<String> {
        let mut groups = reorder(&config.groups, &config.group_order);
        if !groups.iter().any(|group| group == CASHFLOW_GROUP) {
            groups.push(CASHFLOW_GROUP.to_string());
        }
        groups
    }

    /// Places every category in exactly one bucket.
    ///
    /// `categories` is expected in display order; the unassigned buckets keep it.
    pub fn resolve(categories: &[Category], config: &GroupConfig) -> GroupPartition {
        let effective = Self::effective_groups(config);
        let by_name: HashMap<&str, &Category> = categories
            .iter()
            .map(|category| (category.name.as_str(), category))
            .collect();

        let members_of = |group: &str| -> Vec<Category> {
            member_order(categories, config, group)
                .iter()
                .filter_map(|name| by_name.get(name.as_str()).map(|category| (*category).clone()))
                .collect()
        };

        let mut partition = GroupPartition::default();
        for group in &effective {
            if group == CASHFLOW_GROUP {
                partition.cashflow = members_of(group);
            } else {
                partition.groups.push(GroupMembers {
                    name: group.clone(),
                    categories: members_of(group),
                });
            }
        }

        for category in categories {
            let grouped = config
                .group_of(&category.name)
                .is_some_and(|group| effective.iter().any(|name| name == group));
            if grouped {
                continue;
            }
            if category.is_income() {
                partition.other_income.push(category.clone());
            } else {
                partition.other_expense.push(category.clone());
            }
        }

        debug!(
            groups = partition.groups.len(),
            other_income = partition.other_income.len(),
            other_expense = partition.other_expense.len(),
            cashflow = partition.cashflow.len(),
            "resolved category groups"
        );
        partition
    }

    /// Adds a new group after trimming its name.
    pub fn add_group(config: &mut GroupConfig, name: &str) -> ServiceResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Invalid("Group name cannot be empty".into()));
        }
        if is_pseudo_group(name) {
            return Err(ServiceError::Invalid(format!(
                "`{name}` is reserved for unassigned categories"
            )));
        }
        if config.has_group(name) {
            return Err(ServiceError::Invalid(format!("Group `{name}` already exists")));
        }
        config.groups.push(name.to_string());
        if !config.group_order.is_empty() {
            config.group_order.push(name.to_string());
        }
        Ok(())
    }

    /// Removes a group with its assignments and orderings. The cashflow group and unknown names are ignored.
    pub fn delete_group(config: &mut GroupConfig, name: &str) {
        if name == CASHFLOW_GROUP || !config.has_group(name) {
            return;
        }
        config.groups.retain(|group| group != name);
        config.assignments.retain(|_, group| group != name);
        config.category_orders.remove(name);
        config.group_order.retain(|group| group != name);
    }

    /// Assigns `category` to `group`; an empty or pseudo-group target unassigns it.
    pub fn assign(config: &mut GroupConfig, category: &str, group: &str) {
        if group.is_empty() || is_pseudo_group(group) {
            Self::unassign(config, category);
            return;
        }
        for order in config.category_orders.values_mut() {
            order.retain(|name| name != category);
        }
        config
            .category_orders
            .entry(group.to_string())
            .or_default()
            .push(category.to_string());
        config
            .assignments
            .insert(category.to_string(), group.to_string());
    }

    pub fn unassign(config: &mut GroupConfig, category: &str) {
        config.assignments.remove(category);
        for order in config.category_orders.values_mut() {
            order.retain(|name| name != category);
        }
    }

    /// Moves a group within the effective group order.
    pub fn move_group(config: &mut GroupConfig, index: usize, direction: Direction) -> bool {
        let mut order = Self::effective_groups(config);
        let moved = move_in_place(&mut order, index, direction);
        if moved {
            if !config.has_group(CASHFLOW_GROUP) {
                config.groups.push(CASHFLOW_GROUP.to_string());
            }
            config.group_order = order;
        }
        moved
    }

    /// Moves a category within its group's displayed order.
    ///
    /// `categories` is the display-ordered list also given to [`GroupService::resolve`],
    /// so `index` refers to the same row the user sees.
    pub fn move_category_in_group(
        config: &mut GroupConfig,
        categories: &[Category],
        group: &str,
        index: usize,
        direction: Direction,
    ) -> bool {
        let mut order = member_order(categories, config, group);
        let moved = move_in_place(&mut order, index, direction);
        if moved {
            config.category_orders.insert(group.to_string(), order);
        }
        moved
    }

    /// Moves a category in the global display order; unknown names are ignored.
    pub fn move_category(config: &mut GroupConfig, name: &str, direction: Direction) -> bool {
        let Some(index) = config.category_order.iter().position(|entry| entry == name) else {
            return false;
        };
        move_in_place(&mut config.category_order, index, direction)
    }

    /// Drops stale names from the global order and appends new ones, income first.
    pub fn sync_category_order(config: &mut GroupConfig, taxonomy: &Taxonomy) {
        let defaults = taxonomy.default_order();
        let kept: Vec<String> = config
            .category_order
            .iter()
            .filter(|name| taxonomy.contains(name))
            .cloned()
            .collect();
        config.category_order = reorder(&defaults, &kept);
    }

    /// Drops stale names from the group order and appends groups missing from it.
    pub fn sync_group_order(config: &mut GroupConfig) {
        config.group_order = reorder(&config.groups, &config.group_order);
    }
}

/// Names assigned to `group`, stored per-group order first, then display order.
fn member_order(categories: &[Category], config: &GroupConfig, group: &str) -> Vec<String> {
    let assigned: Vec<&str> = categories
        .iter()
        .filter(|category| config.group_of(&category.name) == Some(group))
        .map(|category| category.name.as_str())
        .collect();
    reorder(&assigned, config.order_for(group))
}
