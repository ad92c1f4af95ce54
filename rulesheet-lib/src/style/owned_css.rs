// Fully-owned stylesheet data, the storage behind the in-memory host.
use std::fmt;

/// A list of rules in positional order.
#[derive(Debug, Clone, Default)]
pub struct OwnedStylesheet {
    pub rules: Vec<OwnedRule>,
}

#[derive(Debug, Clone)]
pub enum OwnedRule {
    Style(OwnedStyleRule),
    /// Any rule without a selector (@media, @font-face, ...), kept as serialized text.
    Other(String),
}

#[derive(Debug, Clone, Default)]
pub struct OwnedStyleRule {
    /// e.g. "div", ".red", "#header"
    pub selectors: Vec<String>,
    pub declarations: Vec<OwnedDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedDeclaration {
    pub property: String,
    pub value: String,
    pub important: bool,
}

impl OwnedStyleRule {
    pub fn new(selector: &str) -> Self {
        OwnedStyleRule {
            selectors: vec![selector.to_string()],
            declarations: Vec::new(),
        }
    }

    /// Selector text as a host would report it for the whole list.
    pub fn selector_text(&self) -> String {
        self.selectors.join(", ")
    }

    pub fn declaration(&self, property: &str) -> Option<&OwnedDeclaration> {
        self.declarations.iter().find(|d| d.property == property)
    }

    /// Replaces an existing declaration in place, or appends a new one.
    pub fn set(&mut self, property: &str, value: &str, important: bool) {
        match self.declarations.iter_mut().find(|d| d.property == property) {
            Some(decl) => {
                decl.value = value.to_string();
                decl.important = important;
            }
            None => self.declarations.push(OwnedDeclaration {
                property: property.to_string(),
                value: value.to_string(),
                important,
            }),
        }
    }

    pub fn remove(&mut self, property: &str) -> bool {
        let before = self.declarations.len();
        self.declarations.retain(|d| d.property != property);
        before != self.declarations.len()
    }
}

impl OwnedRule {
    pub fn as_style(&self) -> Option<&OwnedStyleRule> {
        match self {
            OwnedRule::Style(rule) => Some(rule),
            OwnedRule::Other(_) => None,
        }
    }

    pub fn as_style_mut(&mut self) -> Option<&mut OwnedStyleRule> {
        match self {
            OwnedRule::Style(rule) => Some(rule),
            OwnedRule::Other(_) => None,
        }
    }
}

impl fmt::Display for OwnedDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.property, self.value)?;
        if self.important {
            write!(f, " !important")?;
        }
        Ok(())
    }
}

impl fmt::Display for OwnedStyleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {{", self.selector_text())?;
        for decl in &self.declarations {
            write!(f, " {};", decl)?;
        }
        write!(f, " }}")
    }
}

impl fmt::Display for OwnedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnedRule::Style(rule) => rule.fmt(f),
            OwnedRule::Other(text) => f.write_str(text),
        }
    }
}

impl fmt::Display for OwnedStylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            writeln!(f, "{}", rule)?;
        }
        Ok(())
    }
}
