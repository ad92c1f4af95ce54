//! The contract the rule layer expects from whatever owns the live stylesheets.
//!
//! Rules are addressed positionally as `(SheetId, index)`. Indices shift on
//! every insertion or deletion in the same sheet, so callers re-locate rules
//! after mutating instead of holding on to positions.

use std::fmt;
use thiserror::Error;

pub mod memory;

/// Opaque handle to one host stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SheetId(pub u32);

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sheet#{}", self.0)
    }
}

/// Descriptive data about a sheet: where it came from and which node owns it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetInfo {
    pub url: Option<String>,
    pub owner_id: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("Unknown stylesheet {0}")]
    UnknownSheet(SheetId),

    #[error("Rule index {index} out of range for {sheet}")]
    IndexOutOfRange { sheet: SheetId, index: usize },

    /// The host has no such primitive at all, e.g. `insert` or `delete`.
    #[error("Operation not supported by host: {0}")]
    Unsupported(&'static str),

    /// The host refused the input, e.g. a selector it cannot parse.
    #[error("Host rejected `{0}`")]
    Rejected(String),
}

/// Live stylesheet storage and mutation primitives.
pub trait StyleHost {
    /// Every sheet the host exposes, in host order.
    fn sheets(&self) -> Vec<SheetId>;

    fn sheet_info(&self, sheet: SheetId) -> Option<SheetInfo>;

    /// Looks up the sheet owned by the node with the given stable identifier.
    fn owned_sheet(&self, owner_id: &str) -> Option<SheetId>;

    /// Creates an owning node with the given identifier and an empty sheet.
    fn create_owned_sheet(&mut self, owner_id: &str) -> Result<SheetId, HostError>;

    /// Detaches the sheet's owning node from the document.
    fn detach_sheet(&mut self, sheet: SheetId) -> Result<(), HostError>;

    fn rule_count(&self, sheet: SheetId) -> usize;

    /// The selector the host reports for a rule, `None` for non-style rules.
    fn rule_selector(&self, sheet: SheetId, index: usize) -> Option<String>;

    /// Inserts `selector {}` at `index`. A host may accept the call without
    /// growing the sheet when it does not understand the selector.
    fn insert_rule(&mut self, sheet: SheetId, index: usize, selector: &str)
        -> Result<(), HostError>;

    fn delete_rule(&mut self, sheet: SheetId, index: usize) -> Result<(), HostError>;

    /// Explicitly declared property names of a rule, in declaration order.
    fn declared_properties(&self, sheet: SheetId, index: usize) -> Vec<String>;

    /// Declared value without any importance marker.
    fn property_value(&self, sheet: SheetId, index: usize, name: &str) -> Option<String>;

    fn property_important(&self, sheet: SheetId, index: usize, name: &str) -> bool;

    fn set_property(
        &mut self,
        sheet: SheetId,
        index: usize,
        name: &str,
        value: &str,
        important: bool,
    ) -> Result<(), HostError>;

    fn remove_property(&mut self, sheet: SheetId, index: usize, name: &str)
        -> Result<(), HostError>;

    /// Serialized CSS text of a sheet.
    fn sheet_text(&self, sheet: SheetId) -> Option<String>;
}
