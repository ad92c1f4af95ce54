//! A [`StyleHost`] over owned stylesheets.
//!
//! Besides backing the CLI, it can reproduce the selector quirks of older
//! hosts through [`HostQuirks`].

use crate::error::Result;
use crate::host::{HostError, SheetId, SheetInfo, StyleHost};
use crate::style::css_text::parse_and_own_css;
use crate::style::owned_css::{OwnedRule, OwnedStyleRule, OwnedStylesheet};
use crate::style::selector::{has_double_colon_pseudo, swap_adjacent_compound_order};
use log::debug;

/// Host behaviours observed in the wild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostQuirks {
    /// Double-colon pseudo-element insertions are silently dropped.
    pub legacy_pseudo_only: bool,
    /// Adjacent class/id fragments are reported in swapped order.
    pub swap_compound_order: bool,
    /// Reported selectors are lowercased.
    pub lowercase_selectors: bool,
    /// No rule insertion or deletion primitives.
    pub read_only: bool,
}

#[derive(Debug)]
struct MemorySheet {
    id: SheetId,
    info: SheetInfo,
    sheet: OwnedStylesheet,
}

#[derive(Debug, Default)]
pub struct MemoryHost {
    sheets: Vec<MemorySheet>,
    next_id: u32,
    quirks: HostQuirks,
    insert_attempts: usize,
    mutations: usize,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quirks(quirks: HostQuirks) -> Self {
        MemoryHost {
            quirks,
            ..Self::default()
        }
    }

    /// Parses `css` and appends it as a new sheet.
    pub fn add_sheet_from_css(
        &mut self,
        css: &str,
        url: Option<&str>,
        owner_id: Option<&str>,
    ) -> Result<SheetId> {
        let sheet = parse_and_own_css(css)?;
        let info = SheetInfo {
            url: url.map(str::to_string),
            owner_id: owner_id.map(str::to_string),
        };
        Ok(self.push_sheet(info, sheet))
    }

    /// Number of `insert_rule` calls, accepted or not.
    pub fn insert_attempts(&self) -> usize {
        self.insert_attempts
    }

    /// Number of calls that changed host state.
    pub fn mutations(&self) -> usize {
        self.mutations
    }

    fn push_sheet(&mut self, info: SheetInfo, sheet: OwnedStylesheet) -> SheetId {
        let id = SheetId(self.next_id);
        self.next_id += 1;
        debug!("attached {} (url {:?}, owner {:?})", id, info.url, info.owner_id);
        self.sheets.push(MemorySheet { id, info, sheet });
        id
    }

    fn sheet(&self, id: SheetId) -> Option<&MemorySheet> {
        self.sheets.iter().find(|s| s.id == id)
    }

    fn sheet_mut(&mut self, id: SheetId) -> std::result::Result<&mut MemorySheet, HostError> {
        self.sheets
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(HostError::UnknownSheet(id))
    }

    fn style_rule(&self, sheet: SheetId, index: usize) -> Option<&OwnedStyleRule> {
        self.sheet(sheet)?.sheet.rules.get(index)?.as_style()
    }

    fn style_rule_mut(
        &mut self,
        sheet: SheetId,
        index: usize,
    ) -> std::result::Result<&mut OwnedStyleRule, HostError> {
        self.sheet_mut(sheet)?
            .sheet
            .rules
            .get_mut(index)
            .and_then(OwnedRule::as_style_mut)
            .ok_or(HostError::IndexOutOfRange { sheet, index })
    }

    fn report(&self, selector: String) -> String {
        let selector = if self.quirks.swap_compound_order {
            swap_adjacent_compound_order(&selector)
        } else {
            selector
        };
        if self.quirks.lowercase_selectors {
            selector.to_lowercase()
        } else {
            selector
        }
    }
}

impl StyleHost for MemoryHost {
    fn sheets(&self) -> Vec<SheetId> {
        self.sheets.iter().map(|s| s.id).collect()
    }

    fn sheet_info(&self, sheet: SheetId) -> Option<SheetInfo> {
        self.sheet(sheet).map(|s| s.info.clone())
    }

    fn owned_sheet(&self, owner_id: &str) -> Option<SheetId> {
        self.sheets
            .iter()
            .find(|s| s.info.owner_id.as_deref() == Some(owner_id))
            .map(|s| s.id)
    }

    fn create_owned_sheet(&mut self, owner_id: &str) -> std::result::Result<SheetId, HostError> {
        self.mutations += 1;
        let info = SheetInfo {
            url: None,
            owner_id: Some(owner_id.to_string()),
        };
        Ok(self.push_sheet(info, OwnedStylesheet::default()))
    }

    fn detach_sheet(&mut self, sheet: SheetId) -> std::result::Result<(), HostError> {
        let position = self
            .sheets
            .iter()
            .position(|s| s.id == sheet)
            .ok_or(HostError::UnknownSheet(sheet))?;
        self.sheets.remove(position);
        self.mutations += 1;
        debug!("detached {}", sheet);
        Ok(())
    }

    fn rule_count(&self, sheet: SheetId) -> usize {
        self.sheet(sheet).map_or(0, |s| s.sheet.rules.len())
    }

    fn rule_selector(&self, sheet: SheetId, index: usize) -> Option<String> {
        let rule = self.style_rule(sheet, index)?;
        Some(self.report(rule.selector_text()))
    }

    fn insert_rule(
        &mut self,
        sheet: SheetId,
        index: usize,
        selector: &str,
    ) -> std::result::Result<(), HostError> {
        self.insert_attempts += 1;
        if self.quirks.read_only {
            return Err(HostError::Unsupported("insert"));
        }
        let selector = selector.trim();
        if selector.is_empty() || selector.contains(['{', '}']) {
            return Err(HostError::Rejected(selector.to_string()));
        }
        if self.quirks.legacy_pseudo_only && has_double_colon_pseudo(selector) {
            debug!("ignoring double-colon insertion {:?}", selector);
            return Ok(());
        }

        let target = self.sheet_mut(sheet)?;
        if index > target.sheet.rules.len() {
            return Err(HostError::IndexOutOfRange { sheet, index });
        }
        target
            .sheet
            .rules
            .insert(index, OwnedRule::Style(OwnedStyleRule::new(selector)));
        self.mutations += 1;
        Ok(())
    }

    fn delete_rule(&mut self, sheet: SheetId, index: usize) -> std::result::Result<(), HostError> {
        if self.quirks.read_only {
            return Err(HostError::Unsupported("delete"));
        }
        let target = self.sheet_mut(sheet)?;
        if index >= target.sheet.rules.len() {
            return Err(HostError::IndexOutOfRange { sheet, index });
        }
        target.sheet.rules.remove(index);
        self.mutations += 1;
        Ok(())
    }

    fn declared_properties(&self, sheet: SheetId, index: usize) -> Vec<String> {
        self.style_rule(sheet, index)
            .map(|rule| rule.declarations.iter().map(|d| d.property.clone()).collect())
            .unwrap_or_default()
    }

    fn property_value(&self, sheet: SheetId, index: usize, name: &str) -> Option<String> {
        self.style_rule(sheet, index)?
            .declaration(name)
            .map(|d| d.value.clone())
    }

    fn property_important(&self, sheet: SheetId, index: usize, name: &str) -> bool {
        self.style_rule(sheet, index)
            .and_then(|rule| rule.declaration(name))
            .is_some_and(|d| d.important)
    }

    fn set_property(
        &mut self,
        sheet: SheetId,
        index: usize,
        name: &str,
        value: &str,
        important: bool,
    ) -> std::result::Result<(), HostError> {
        self.style_rule_mut(sheet, index)?.set(name, value, important);
        self.mutations += 1;
        Ok(())
    }

    fn remove_property(
        &mut self,
        sheet: SheetId,
        index: usize,
        name: &str,
    ) -> std::result::Result<(), HostError> {
        if self.style_rule_mut(sheet, index)?.remove(name) {
            self.mutations += 1;
        }
        Ok(())
    }

    fn sheet_text(&self, sheet: SheetId) -> Option<String> {
        self.sheet(sheet).map(|s| s.sheet.to_string())
    }
}
