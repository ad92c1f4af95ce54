use crate::host::{SheetId, StyleHost};
use crate::sheet::record::RuleRecord;
use crate::style::selector::{swap_adjacent_compound_order, to_canonical_pseudo_form, SelectorKey};
use log::{debug, trace};
use std::collections::BTreeMap;

/// Every rule in `sheet` whose reported selector denotes `selector`, in
/// positional (cascade) order.
///
/// A rule matches when the host reports the input itself, its
/// fragment-swapped form, or its single-colon pseudo-element form. Rules
/// without a selector are skipped.
pub fn find_rules<H: StyleHost + ?Sized>(host: &H, sheet: SheetId, selector: &str) -> Vec<RuleRecord> {
    let key = SelectorKey::new(selector);
    let mut found = Vec::new();

    for index in 0..host.rule_count(sheet) {
        let Some(reported) = host.rule_selector(sheet, index) else {
            trace!("{}[{}]: no selector, skipped", sheet, index);
            continue;
        };
        if key.matches(&reported) {
            found.push(RuleRecord::new(sheet, index, reported));
        }
    }

    debug!("find_rules({:?}) in {}: {} match(es)", key.selector, sheet, found.len());
    found
}

/// Groups every style rule of `sheet` under a canonical selector.
///
/// The key is the double-colon form of the first-seen spelling; later rules
/// reported under the swapped or single-colon spelling join that key.
pub fn find_all_selectors<H: StyleHost + ?Sized>(
    host: &H,
    sheet: SheetId,
) -> BTreeMap<String, Vec<RuleRecord>> {
    let mut groups: BTreeMap<String, Vec<RuleRecord>> = BTreeMap::new();

    for index in 0..host.rule_count(sheet) {
        let Some(reported) = host.rule_selector(sheet, index) else {
            continue;
        };
        let canonical = to_canonical_pseudo_form(reported.trim());
        let swapped = swap_adjacent_compound_order(&canonical);
        let key = if groups.contains_key(&canonical) || !groups.contains_key(&swapped) {
            canonical
        } else {
            swapped
        };
        groups
            .entry(key)
            .or_default()
            .push(RuleRecord::new(sheet, index, reported));
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::{HostQuirks, MemoryHost};

    fn host_with(css: &str) -> (MemoryHost, SheetId) {
        let mut host = MemoryHost::new();
        let sheet = host.add_sheet_from_css(css, None, None).unwrap();
        (host, sheet)
    }

    #[test]
    fn test_matches_in_positional_order() {
        let (host, sheet) = host_with(".a { color: red; } .b { color: blue; } .a { margin-top: 1px; }");
        let found = find_rules(&host, sheet, ".a");
        assert_eq!(found.iter().map(|r| r.index).collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_matches_swapped_fragments() {
        let mut host = MemoryHost::new();
        let sheet = host.create_owned_sheet("managed").unwrap();
        host.insert_rule(sheet, 0, ".a.b").unwrap();
        assert_eq!(find_rules(&host, sheet, ".b.a").len(), 1);
        assert_eq!(find_rules(&host, sheet, ".a.b").len(), 1);
    }

    #[test]
    fn test_matches_legacy_pseudo() {
        let mut host = MemoryHost::with_quirks(HostQuirks {
            legacy_pseudo_only: true,
            ..HostQuirks::default()
        });
        let sheet = host.create_owned_sheet("managed").unwrap();
        host.insert_rule(sheet, 0, ".a:before").unwrap();
        assert_eq!(find_rules(&host, sheet, ".a::before").len(), 1);
    }

    #[test]
    fn test_skips_rules_without_selector() {
        let (host, sheet) = host_with("@media print { .a { color: red; } } .a { color: blue; }");
        let found = find_rules(&host, sheet, ".a");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].index, 1);
    }

    #[test]
    fn test_all_selectors_groups_variants() {
        let mut host = MemoryHost::new();
        let sheet = host.create_owned_sheet("managed").unwrap();
        for selector in [".a.b", "#x:after", ".b.a", "#x::after", "p"] {
            let index = host.rule_count(sheet);
            host.insert_rule(sheet, index, selector).unwrap();
        }
        let groups = find_all_selectors(&host, sheet);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[".a.b"].len(), 2);
        assert_eq!(groups["#x::after"].len(), 2);
        assert_eq!(groups["p"].len(), 1);
    }
}
