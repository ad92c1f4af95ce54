use crate::host::{SheetId, StyleHost};

/// One style rule inside one sheet, as seen at the moment it was located.
///
/// Positions shift whenever a rule is inserted or deleted in the same sheet,
/// so a record is only trustworthy right after the call that produced it.
/// [`RuleRecord::is_current`] checks that the host still reports the same
/// selector at the same position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleRecord {
    pub sheet: SheetId,
    pub index: usize,
    /// Selector as the host reported it.
    pub selector: String,
}

impl RuleRecord {
    pub fn new(sheet: SheetId, index: usize, selector: impl Into<String>) -> Self {
        RuleRecord {
            sheet,
            index,
            selector: selector.into(),
        }
    }

    pub fn is_current<H: StyleHost + ?Sized>(&self, host: &H) -> bool {
        host.rule_selector(self.sheet, self.index).as_deref() == Some(self.selector.as_str())
    }
}
