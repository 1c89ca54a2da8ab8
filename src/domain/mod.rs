pub mod category;
pub mod common;
pub mod groups;
pub mod report;
pub mod rules;
pub mod transaction;
pub mod workspace;

pub use category::{Category, CategoryKind, Taxonomy};
pub use common::{Direction, Displayable, NamedEntity};
pub use groups::{GroupConfig, GroupMembers, GroupPartition};
pub use report::{CategoryPeriodTotals, Series, TableModel, Totals};
pub use rules::{KeywordRule, RuleSet};
pub use transaction::{RawTransaction, Transaction};
pub use workspace::Workspace;
