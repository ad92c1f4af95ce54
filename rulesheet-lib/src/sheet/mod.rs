//! Locating, creating and deleting rules inside one host sheet.

pub mod locator;
pub mod mutator;
pub mod record;

pub use locator::{find_all_selectors, find_rules};
pub use mutator::{PseudoSyntax, RuleMutator};
pub use record::RuleRecord;
