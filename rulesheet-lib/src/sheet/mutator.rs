use crate::error::{Result, SheetError};
use crate::host::{HostError, SheetId, StyleHost};
use crate::sheet::record::RuleRecord;
use crate::style::selector::{has_pseudo_element, to_canonical_pseudo_form, to_legacy_pseudo_form};
use log::{debug, info, warn};

/// Which pseudo-element spelling the host accepts on insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoSyntax {
    /// `::before`
    Modern,
    /// `:before` only
    Legacy,
}

/// Creates and deletes rules, remembering what the host turned out to support.
///
/// The pseudo-element syntax is probed on the first pseudo-element insertion
/// and cached for the lifetime of the mutator. A missing insert or delete
/// primitive is cached as well, so it is reported without calling the host again.
#[derive(Debug, Default)]
pub struct RuleMutator {
    pseudo_syntax: Option<PseudoSyntax>,
    missing: Option<&'static str>,
}

impl RuleMutator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pseudo_syntax(&self) -> Option<PseudoSyntax> {
        self.pseudo_syntax
    }

    /// Forgets every discovered capability.
    pub fn reset_capabilities(&mut self) {
        self.pseudo_syntax = None;
        self.missing = None;
    }

    /// Appends an empty rule for `selector` to `sheet`.
    ///
    /// The returned record is valid until the next mutation of `sheet`.
    pub fn create_rule<H: StyleHost + ?Sized>(
        &mut self,
        host: &mut H,
        sheet: SheetId,
        selector: &str,
    ) -> Result<RuleRecord> {
        self.ensure_capable()?;
        let index = host.rule_count(sheet);

        if has_pseudo_element(selector) {
            let modern = to_canonical_pseudo_form(selector);
            let legacy = to_legacy_pseudo_form(selector);
            match self.pseudo_syntax {
                Some(PseudoSyntax::Modern) => {
                    self.insert(host, sheet, index, &modern)?;
                }
                Some(PseudoSyntax::Legacy) => {
                    self.insert(host, sheet, index, &legacy)?;
                }
                None => {
                    let accepted = self.insert(host, sheet, index, &modern)?
                        && host.rule_count(sheet) > index;
                    if accepted {
                        info!("host accepts double-colon pseudo-elements");
                        self.pseudo_syntax = Some(PseudoSyntax::Modern);
                    } else {
                        info!("host only accepts single-colon pseudo-elements");
                        self.pseudo_syntax = Some(PseudoSyntax::Legacy);
                        self.insert(host, sheet, index, &legacy)?;
                    }
                }
            }
        } else {
            self.insert(host, sheet, index, selector)?;
        }

        if host.rule_count(sheet) <= index {
            return Err(SheetError::InsertRejected(selector.to_string()));
        }
        let reported = host
            .rule_selector(sheet, index)
            .ok_or_else(|| SheetError::InsertRejected(selector.to_string()))?;
        debug!("created {}[{}] for {:?} (reported {:?})", sheet, index, selector, reported);
        Ok(RuleRecord::new(sheet, index, reported))
    }

    /// Deletes the rule a freshly located record points at.
    pub fn delete_rule<H: StyleHost + ?Sized>(&mut self, host: &mut H, record: &RuleRecord) -> Result<()> {
        self.ensure_capable()?;
        if !record.is_current(&*host) {
            let found = host.rule_selector(record.sheet, record.index);
            warn!("refusing to delete through stale record {:?} (found {:?})", record, found);
            return Err(SheetError::StaleRecord {
                sheet: record.sheet,
                index: record.index,
                expected: record.selector.clone(),
                found,
            });
        }
        match host.delete_rule(record.sheet, record.index) {
            Ok(()) => Ok(()),
            Err(HostError::Unsupported(op)) => Err(self.mark_missing(op)),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes every record, highest position first so the rest stay valid.
    pub fn delete_rules<H: StyleHost + ?Sized>(
        &mut self,
        host: &mut H,
        records: &[RuleRecord],
    ) -> Result<usize> {
        let mut ordered: Vec<&RuleRecord> = records.iter().collect();
        ordered.sort_by(|a, b| b.sheet.cmp(&a.sheet).then(b.index.cmp(&a.index)));
        for record in &ordered {
            self.delete_rule(host, record)?;
        }
        Ok(ordered.len())
    }

    /// Returns `Ok(false)` when the host refused the selector outright.
    fn insert<H: StyleHost + ?Sized>(
        &mut self,
        host: &mut H,
        sheet: SheetId,
        index: usize,
        selector: &str,
    ) -> Result<bool> {
        match host.insert_rule(sheet, index, selector) {
            Ok(()) => Ok(true),
            Err(HostError::Rejected(rejected)) => {
                debug!("host rejected selector {:?}", rejected);
                Ok(false)
            }
            Err(HostError::Unsupported(op)) => Err(self.mark_missing(op)),
            Err(e) => Err(e.into()),
        }
    }

    fn mark_missing(&mut self, op: &'static str) -> SheetError {
        warn!("host has no `{}` primitive; rule mutation disabled", op);
        self.missing = Some(op);
        SheetError::MissingCapability(op)
    }

    fn ensure_capable(&self) -> Result<()> {
        match self.missing {
            Some(op) => Err(SheetError::MissingCapability(op)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::{HostQuirks, MemoryHost};

    fn managed(quirks: HostQuirks) -> (MemoryHost, SheetId) {
        let mut host = MemoryHost::with_quirks(quirks);
        let sheet = host.create_owned_sheet("managed").unwrap();
        (host, sheet)
    }

    #[test]
    fn test_plain_selector_appends() {
        let (mut host, sheet) = managed(HostQuirks::default());
        let mut mutator = RuleMutator::new();
        let first = mutator.create_rule(&mut host, sheet, ".a").unwrap();
        let second = mutator.create_rule(&mut host, sheet, ".b").unwrap();
        assert_eq!((first.index, second.index), (0, 1));
        assert_eq!(second.selector, ".b");
        assert_eq!(mutator.pseudo_syntax(), None);
    }

    #[test]
    fn test_probe_detects_modern_syntax() {
        let (mut host, sheet) = managed(HostQuirks::default());
        let mut mutator = RuleMutator::new();
        let record = mutator.create_rule(&mut host, sheet, ".a:before").unwrap();
        assert_eq!(record.selector, ".a::before");
        assert_eq!(mutator.pseudo_syntax(), Some(PseudoSyntax::Modern));
        assert_eq!(host.rule_count(sheet), 1);
    }

    #[test]
    fn test_probe_falls_back_to_legacy_syntax() {
        let (mut host, sheet) = managed(HostQuirks {
            legacy_pseudo_only: true,
            ..HostQuirks::default()
        });
        let mut mutator = RuleMutator::new();
        let record = mutator.create_rule(&mut host, sheet, ".a::after").unwrap();
        assert_eq!(record.selector, ".a:after");
        assert_eq!(mutator.pseudo_syntax(), Some(PseudoSyntax::Legacy));

        // known capability: no second probe, exactly one more rule
        mutator.create_rule(&mut host, sheet, ".b::after").unwrap();
        assert_eq!(host.rule_count(sheet), 2);
        assert_eq!(host.insert_attempts(), 3);
    }

    #[test]
    fn test_reset_forgets_capability() {
        let (mut host, sheet) = managed(HostQuirks::default());
        let mut mutator = RuleMutator::new();
        mutator.create_rule(&mut host, sheet, "p::first-line").unwrap();
        mutator.reset_capabilities();
        assert_eq!(mutator.pseudo_syntax(), None);
    }

    #[test]
    fn test_delete_rejects_stale_record() {
        let (mut host, sheet) = managed(HostQuirks::default());
        let mut mutator = RuleMutator::new();
        let a = mutator.create_rule(&mut host, sheet, ".a").unwrap();
        let b = mutator.create_rule(&mut host, sheet, ".b").unwrap();
        mutator.delete_rule(&mut host, &a).unwrap();
        let err = mutator.delete_rule(&mut host, &b).unwrap_err();
        assert!(matches!(err, SheetError::StaleRecord { index: 1, .. }));
        assert_eq!(host.rule_count(sheet), 1);
    }

    #[test]
    fn test_delete_rules_highest_first() {
        let (mut host, sheet) = managed(HostQuirks::default());
        let mut mutator = RuleMutator::new();
        let records: Vec<_> = [".a", ".b", ".a"]
            .iter()
            .map(|s| mutator.create_rule(&mut host, sheet, s).unwrap())
            .filter(|r| r.selector == ".a")
            .collect();
        assert_eq!(mutator.delete_rules(&mut host, &records).unwrap(), 2);
        assert_eq!(host.rule_selector(sheet, 0).as_deref(), Some(".b"));
    }

    #[test]
    fn test_missing_capability_is_cached() {
        let (mut host, sheet) = managed(HostQuirks {
            read_only: true,
            ..HostQuirks::default()
        });
        let mut mutator = RuleMutator::new();
        let err = mutator.create_rule(&mut host, sheet, ".a").unwrap_err();
        assert_eq!(err, SheetError::MissingCapability("insert"));
        let attempts = host.insert_attempts();
        assert!(mutator.create_rule(&mut host, sheet, ".b").is_err());
        assert_eq!(host.insert_attempts(), attempts);
    }
}
