use crate::host::StyleHost;
use crate::sheet::record::RuleRecord;
use log::trace;
use std::collections::BTreeMap;

/// Hyphenated property name -> declared value.
pub type PropertyMap = BTreeMap<String, String>;

/// Merge declaration blocks in order; a later block overrides an earlier one
/// property by property.
pub fn merge_blocks<I, B, K, V>(blocks: I) -> PropertyMap
where
    I: IntoIterator<Item = B>,
    B: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let mut merged = PropertyMap::new();
    for block in blocks {
        for (prop, value) in block {
            merged.insert(prop.into(), value.into());
        }
    }
    merged
}

/// Merge the explicitly declared properties of `rules`, in the given order.
///
/// Specificity and media scoping are not modeled: within one sheet the later
/// rule wins, which matches the cascade for equal selectors. Values are kept
/// exactly as the host reports them.
pub fn aggregate<H: StyleHost + ?Sized>(host: &H, rules: &[RuleRecord]) -> PropertyMap {
    merge_blocks(rules.iter().map(|rule| {
        let names = host.declared_properties(rule.sheet, rule.index);
        trace!("{}[{}]: {} declaration(s)", rule.sheet, rule.index, names.len());
        names
            .into_iter()
            .filter_map(|name| {
                let value = host.property_value(rule.sheet, rule.index, &name)?;
                Some((name, value))
            })
            .collect::<Vec<_>>()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::MemoryHost;
    use crate::sheet::locator::find_rules;

    #[test]
    fn test_merge_later_wins() {
        let merged = merge_blocks(vec![
            vec![("color", "red"), ("margin-top", "1px")],
            vec![("color", "blue")],
        ]);
        assert_eq!(merged.get("color"), Some(&"blue".to_string()));
        assert_eq!(merged.get("margin-top"), Some(&"1px".to_string()));
    }

    #[test]
    fn test_aggregate_follows_sheet_order() {
        let mut host = MemoryHost::new();
        let sheet = host
            .add_sheet_from_css(
                ".a { width: 1px; font-size: 12px; } .b { width: 2px; } .a { width: 3px; }",
                None,
                None,
            )
            .unwrap();
        let rules = find_rules(&host, sheet, ".a");
        let style = aggregate(&host, &rules);
        assert_eq!(style.get("width"), Some(&"3px".to_string()));
        assert_eq!(style.get("font-size"), Some(&"12px".to_string()));
        assert_eq!(style.len(), 2);
    }

    #[test]
    fn test_aggregate_keeps_bare_value_of_important() {
        let mut host = MemoryHost::new();
        let sheet = host
            .add_sheet_from_css(".a { width: 5px !important; }", None, None)
            .unwrap();
        let rules = find_rules(&host, sheet, ".a");
        assert_eq!(aggregate(&host, &rules).get("width"), Some(&"5px".to_string()));
    }
}
