use crate::error::{Result, SheetError};
use crate::style::owned_css::{OwnedDeclaration, OwnedRule, OwnedStyleRule, OwnedStylesheet};
use lightningcss::declaration::DeclarationBlock;
use lightningcss::printer::PrinterOptions;
use lightningcss::rules::{style::StyleRule, CssRule};
use lightningcss::stylesheet::{ParserOptions, StyleSheet as LightningStyleSheet};
use lightningcss::traits::ToCss;
use log::debug;

/// Parse a raw CSS string (LightningCSS) and convert it to a fully-owned stylesheet.
///
/// Style rules keep their selector list and declarations (normal and
/// `!important`). Every other rule is kept as serialized text so positional
/// indices match what a live host would report.
pub fn parse_and_own_css(css_text: &str) -> Result<OwnedStylesheet> {
    let sheet = LightningStyleSheet::parse(css_text, ParserOptions::default())
        .map_err(|e| SheetError::Css(e.to_string()))?;

    let mut owned_rules = Vec::new();
    for rule in &sheet.rules.0 {
        match rule {
            CssRule::Style(style_rule) => {
                owned_rules.push(OwnedRule::Style(convert_style_rule(style_rule)?));
            }
            other => {
                let text = other
                    .to_css_string(PrinterOptions::default())
                    .map_err(|e| SheetError::Css(e.to_string()))?;
                owned_rules.push(OwnedRule::Other(text));
            }
        }
    }

    debug!("parsed {} rules from css text", owned_rules.len());
    Ok(OwnedStylesheet { rules: owned_rules })
}

/// Helper to copy a single StyleRule's selectors + declarations into an owned rule.
fn convert_style_rule(style_rule: &StyleRule<'_>) -> Result<OwnedStyleRule> {
    let mut selectors = Vec::new();
    for selector in &style_rule.selectors.0 {
        let sel_str = selector
            .to_css_string(PrinterOptions::default())
            .map_err(|e| SheetError::Css(e.to_string()))?;
        selectors.push(sel_str);
    }

    let mut declarations = Vec::new();
    collect_declarations(&style_rule.declarations, &mut declarations)?;

    Ok(OwnedStyleRule {
        selectors,
        declarations,
    })
}

fn collect_declarations(
    block: &DeclarationBlock<'_>,
    out: &mut Vec<OwnedDeclaration>,
) -> Result<()> {
    let tagged = block
        .declarations
        .iter()
        .map(|p| (p, false))
        .chain(block.important_declarations.iter().map(|p| (p, true)));

    for (property, important) in tagged {
        let value = property
            .value_to_css_string(PrinterOptions::default())
            .map_err(|e| SheetError::Css(e.to_string()))?;
        out.push(OwnedDeclaration {
            property: property.property_id().name().to_string(),
            value,
            important,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_style_rules() {
        let sheet = parse_and_own_css(".red { width: 10px; } #blue { margin-top: 1px; }").unwrap();
        assert_eq!(sheet.rules.len(), 2);
        let first = sheet.rules[0].as_style().unwrap();
        assert_eq!(first.selector_text(), ".red");
        assert_eq!(first.declarations[0].property, "width");
        assert_eq!(first.declarations[0].value, "10px");
        let second = sheet.rules[1].as_style().unwrap();
        assert_eq!(second.selector_text(), "#blue");
        assert_eq!(second.declarations[0].value, "1px");
    }

    #[test]
    fn test_important_declarations_are_tagged() {
        let sheet = parse_and_own_css(".a { display: block !important; }").unwrap();
        let rule = sheet.rules[0].as_style().unwrap();
        assert_eq!(rule.declarations.len(), 1);
        assert!(rule.declarations[0].important);
        assert_eq!(rule.declarations[0].value, "block");
    }

    #[test]
    fn test_non_style_rules_keep_position() {
        let css = ".a { width: 1px; } @media print { .a { width: 2px; } } .b { width: 3px; }";
        let sheet = parse_and_own_css(css).unwrap();
        assert_eq!(sheet.rules.len(), 3);
        assert!(sheet.rules[1].as_style().is_none());
        assert_eq!(sheet.rules[2].as_style().unwrap().selector_text(), ".b");
    }
}
