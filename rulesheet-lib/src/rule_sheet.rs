use crate::error::Result;
use crate::host::{SheetId, StyleHost};
use crate::sheet::{find_all_selectors, find_rules, RuleMutator, RuleRecord};
use crate::style::aggregate::{aggregate, PropertyMap};
use crate::style::property_names::{split_importance, to_hyphenated};
use crate::style::shorthand::{self, Resolved};
use log::{debug, info};
use std::collections::BTreeMap;

pub const DEFAULT_OWNER_ID: &str = "rulesheet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSheetOptions {
    /// Stable identifier of the node that owns the managed sheet.
    pub owner_id: String,
}

impl Default for RuleSheetOptions {
    fn default() -> Self {
        RuleSheetOptions {
            owner_id: DEFAULT_OWNER_ID.to_string(),
        }
    }
}

/// One sheet as returned by [`RuleSheet::export_sheets`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedSheet {
    pub url: Option<String>,
    pub owner_id: Option<String>,
    pub text: String,
}

/// Read, write and remove declarations by selector.
///
/// Writes go to a single managed sheet, created on first write and owned by
/// a node with [`RuleSheetOptions::owner_id`]. Reads can target the managed
/// sheet or every sheet the host exposes.
pub struct RuleSheet<H: StyleHost> {
    host: H,
    options: RuleSheetOptions,
    sheet: Option<SheetId>,
    mutator: RuleMutator,
}

impl<H: StyleHost> RuleSheet<H> {
    pub fn new(host: H) -> Self {
        Self::with_options(host, RuleSheetOptions::default())
    }

    pub fn with_options(host: H, options: RuleSheetOptions) -> Self {
        RuleSheet {
            host,
            options,
            sheet: None,
            mutator: RuleMutator::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The managed sheet, if it exists.
    ///
    /// A cached handle is only trusted while the host still reports it as
    /// owned by our owner id; otherwise it is looked up again.
    pub fn managed_sheet(&mut self) -> Option<SheetId> {
        let owner_id = self.options.owner_id.as_str();
        let cached = self.sheet.filter(|sheet| {
            self.host
                .sheet_info(*sheet)
                .is_some_and(|info| info.owner_id.as_deref() == Some(owner_id))
        });
        self.sheet = cached.or_else(|| self.host.owned_sheet(owner_id));
        self.sheet
    }

    fn managed_sheet_or_create(&mut self) -> Result<SheetId> {
        if let Some(sheet) = self.managed_sheet() {
            return Ok(sheet);
        }
        let sheet = self.host.create_owned_sheet(&self.options.owner_id)?;
        info!("created managed sheet {} ({})", sheet, self.options.owner_id);
        self.sheet = Some(sheet);
        Ok(sheet)
    }

    /// Declarations for `selector` in the managed sheet.
    pub fn get(&mut self, selector: &str) -> PropertyMap {
        match self.managed_sheet() {
            Some(sheet) => aggregate(&self.host, &find_rules(&self.host, sheet, selector)),
            None => PropertyMap::new(),
        }
    }

    /// Every selector of the managed sheet with its declarations.
    pub fn get_selectors(&mut self) -> BTreeMap<String, PropertyMap> {
        let Some(sheet) = self.managed_sheet() else {
            return BTreeMap::new();
        };
        find_all_selectors(&self.host, sheet)
            .into_iter()
            .map(|(selector, rules)| (selector, aggregate(&self.host, &rules)))
            .collect()
    }

    /// Declarations for `selector` across every sheet, in host order.
    pub fn get_all(&self, selector: &str) -> PropertyMap {
        let rules: Vec<RuleRecord> = self
            .host
            .sheets()
            .into_iter()
            .flat_map(|sheet| find_rules(&self.host, sheet, selector))
            .collect();
        aggregate(&self.host, &rules)
    }

    /// One property across every sheet, with margin, padding and border
    /// shorthands rebuilt from their longhands.
    pub fn get_property(&self, selector: &str, name: &str) -> Resolved {
        let name = to_hyphenated(name);
        shorthand::resolve(&self.get_all(selector), &name)
    }

    /// Writes declarations to every rule for `selector` in the managed sheet,
    /// creating the rule when there is none.
    ///
    /// Names may be camelCase. A trailing `!important` is passed to the host
    /// as the importance flag. Shorthand values are written as given.
    pub fn set<I, K, V>(&mut self, selector: &str, properties: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let sheet = self.managed_sheet_or_create()?;
        let mut rules = find_rules(&self.host, sheet, selector);
        if rules.is_empty() {
            rules.push(self.mutator.create_rule(&mut self.host, sheet, selector)?);
        }

        for (name, value) in properties {
            let name = to_hyphenated(name.as_ref());
            let (value, important) = split_importance(value.as_ref());
            for rule in &rules {
                debug!("{}[{}] {}: {} (important: {})", rule.sheet, rule.index, name, value, important);
                // clear first, some hosts keep the old value otherwise
                self.host.remove_property(rule.sheet, rule.index, &name)?;
                self.host
                    .set_property(rule.sheet, rule.index, &name, value, important)?;
            }
        }
        Ok(())
    }

    pub fn set_property(&mut self, selector: &str, name: &str, value: &str) -> Result<()> {
        self.set(selector, [(name, value)])
    }

    /// With a selector, deletes every matching rule of the managed sheet.
    /// Without one, detaches the managed sheet itself.
    ///
    /// Returns the number of rules removed.
    pub fn remove(&mut self, selector: Option<&str>) -> Result<usize> {
        let Some(sheet) = self.managed_sheet() else {
            return Ok(0);
        };
        match selector {
            Some(selector) => {
                let rules = find_rules(&self.host, sheet, selector);
                if rules.is_empty() {
                    return Ok(0);
                }
                self.mutator.delete_rules(&mut self.host, &rules)
            }
            None => {
                let count = self.host.rule_count(sheet);
                self.host.detach_sheet(sheet)?;
                self.sheet = None;
                info!("detached managed sheet {} ({} rules)", sheet, count);
                Ok(count)
            }
        }
    }

    /// Clears `name` (and every longhand of it, for a shorthand) on each rule
    /// for `selector`, in every sheet the host reports.
    ///
    /// Returns the number of declarations that were present.
    pub fn remove_property(&mut self, selector: &str, name: &str) -> Result<usize> {
        let name = to_hyphenated(name);
        let mut names = vec![name.clone()];
        names.extend(shorthand::longhands(&name));

        let rules: Vec<RuleRecord> = self
            .host
            .sheets()
            .into_iter()
            .flat_map(|sheet| find_rules(&self.host, sheet, selector))
            .collect();

        let mut cleared = 0;
        for rule in rules {
            for name in &names {
                if self.host.property_value(rule.sheet, rule.index, name).is_some() {
                    self.host.remove_property(rule.sheet, rule.index, name)?;
                    cleared += 1;
                }
            }
        }
        debug!("remove_property({:?}, {:?}): {} cleared", selector, name, cleared);
        Ok(cleared)
    }

    /// Serialized text of every sheet, in host order.
    pub fn export_sheets(&self) -> Vec<ExportedSheet> {
        self.host
            .sheets()
            .into_iter()
            .map(|sheet| {
                let info = self.host.sheet_info(sheet).unwrap_or_default();
                ExportedSheet {
                    url: info.url,
                    owner_id: info.owner_id,
                    text: self.host.sheet_text(sheet).unwrap_or_default(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::MemoryHost;

    #[test]
    fn test_get_without_managed_sheet_is_empty() {
        let mut sheet = RuleSheet::new(MemoryHost::new());
        assert!(sheet.get(".a").is_empty());
        assert!(sheet.get_selectors().is_empty());
        assert_eq!(sheet.remove(Some(".a")).unwrap(), 0);
        assert_eq!(sheet.remove(None).unwrap(), 0);
        assert!(sheet.host().sheets().is_empty());
    }

    #[test]
    fn test_set_creates_managed_sheet_once() {
        let mut sheet = RuleSheet::new(MemoryHost::new());
        sheet.set_property(".a", "color", "red").unwrap();
        sheet.set_property(".b", "color", "blue").unwrap();
        sheet.set_property(".a", "fontSize", "12px").unwrap();
        assert_eq!(sheet.host().sheets().len(), 1);
        let managed = sheet.managed_sheet().unwrap();
        assert_eq!(sheet.host().rule_count(managed), 2);
        assert_eq!(sheet.get(".a").get("font-size"), Some(&"12px".to_string()));
    }

    #[test]
    fn test_custom_owner_id() {
        let options = RuleSheetOptions {
            owner_id: "theme".to_string(),
        };
        let mut sheet = RuleSheet::with_options(MemoryHost::new(), options);
        sheet.set_property("p", "color", "red").unwrap();
        assert!(sheet.host().owned_sheet("theme").is_some());
        assert!(sheet.host().owned_sheet(DEFAULT_OWNER_ID).is_none());
    }

    #[test]
    fn test_stale_cached_sheet_is_resolved_again() {
        let mut sheet = RuleSheet::new(MemoryHost::new());
        sheet.set_property(".a", "color", "red").unwrap();
        let first = sheet.managed_sheet().unwrap();

        // someone else detaches the owning node behind our back
        sheet.host_mut().detach_sheet(first).unwrap();
        assert_eq!(sheet.managed_sheet(), None);

        sheet.set_property(".a", "color", "blue").unwrap();
        let second = sheet.managed_sheet().unwrap();
        assert_ne!(first, second);
        assert_eq!(sheet.get(".a").get("color"), Some(&"blue".to_string()));
    }

    #[test]
    fn test_remove_property_clears_longhands() {
        let mut sheet = RuleSheet::new(MemoryHost::new());
        sheet
            .set(
                ".a",
                [
                    ("marginTop", "1px"),
                    ("marginLeft", "2px"),
                    ("color", "red"),
                ],
            )
            .unwrap();
        assert_eq!(sheet.remove_property(".a", "margin").unwrap(), 2);
        let style = sheet.get(".a");
        assert_eq!(style.len(), 1);
        assert_eq!(style.get("color"), Some(&"red".to_string()));
    }

    #[test]
    fn test_remove_property_without_managed_sheet() {
        let mut host = MemoryHost::new();
        host.add_sheet_from_css(".a { width: 1px; }", None, None)
            .unwrap();
        let mut sheet = RuleSheet::new(host);
        assert_eq!(sheet.remove_property(".a", "width").unwrap(), 1);
        assert_eq!(sheet.get_property(".a", "width"), Resolved::Absent);
        assert_eq!(sheet.managed_sheet(), None);
    }
}
