//! Selector normalization across host quirks.
//!
//! Hosts disagree on two points when they report a rule's selector:
//!
//! 1. pseudo-elements may come back with one colon (`:before`) or two
//!    (`::before`), and some hosts only accept the single-colon form;
//! 2. adjacent `.class` / `#id` fragments of one compound selector may be
//!    reported in swapped order (`.a.b` reported as `.b.a`).
//!
//! Everything here is a pure string transform. Anything outside the fixed
//! pseudo-element set and simple class/id fragments passes through unchanged.

/// Pseudo-elements that have both a legacy single-colon and a double-colon spelling.
pub const PSEUDO_ELEMENTS: [&str; 5] = [
    "before",
    "after",
    "first-line",
    "first-letter",
    "selection",
];

fn is_ident_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii()
}

/// Length of the pseudo-element name starting at `rest`, if it is one of
/// [`PSEUDO_ELEMENTS`] and ends on an identifier boundary.
fn pseudo_element_at(rest: &str) -> Option<usize> {
    PSEUDO_ELEMENTS.iter().find_map(|name| {
        let head = rest.get(..name.len())?;
        if !head.eq_ignore_ascii_case(name) {
            return None;
        }
        match rest[name.len()..].chars().next() {
            Some(ch) if is_ident_char(ch) => None,
            _ => Some(name.len()),
        }
    })
}

/// Rewrites `:before`, `:after`, `:first-line`, `:first-letter` and
/// `:selection` to their double-colon spelling.
pub fn to_canonical_pseudo_form(selector: &str) -> String {
    let mut out = String::with_capacity(selector.len() + 2);
    let mut prev: Option<char> = None;
    for (i, ch) in selector.char_indices() {
        if ch == ':' && prev != Some(':') {
            let rest = &selector[i + 1..];
            if !rest.starts_with(':') && pseudo_element_at(rest).is_some() {
                out.push(':');
            }
        }
        out.push(ch);
        prev = Some(ch);
    }
    out
}

/// The inverse of [`to_canonical_pseudo_form`].
pub fn to_legacy_pseudo_form(selector: &str) -> String {
    let mut out = String::with_capacity(selector.len());
    let mut skip_next = false;
    for (i, ch) in selector.char_indices() {
        if skip_next {
            skip_next = false;
            continue;
        }
        if ch == ':' && selector[i + 1..].starts_with(':') {
            if pseudo_element_at(&selector[i + 2..]).is_some() {
                // drop one of the two colons
                out.push(':');
                skip_next = true;
                continue;
            }
        }
        out.push(ch);
    }
    out
}

/// True if the selector names one of [`PSEUDO_ELEMENTS`] in either spelling.
pub fn has_pseudo_element(selector: &str) -> bool {
    selector
        .char_indices()
        .filter(|&(_, ch)| ch == ':')
        .any(|(i, _)| pseudo_element_at(&selector[i + 1..]).is_some())
}

/// True if the selector uses the double-colon spelling of a known pseudo-element.
pub fn has_double_colon_pseudo(selector: &str) -> bool {
    selector
        .match_indices("::")
        .any(|(i, _)| pseudo_element_at(&selector[i + 2..]).is_some())
}

/// Reads one `.name` / `#name` fragment starting at `start`, returning its end.
fn read_fragment(chars: &[char], start: usize) -> Option<usize> {
    if start >= chars.len() || !matches!(chars[start], '.' | '#') {
        return None;
    }
    let mut end = start + 1;
    while end < chars.len() {
        match chars[end] {
            '\\' if end + 1 < chars.len() => end += 2,
            ch if is_ident_char(ch) => end += 1,
            _ => break,
        }
    }
    if end == start + 1 {
        None
    } else {
        Some(end)
    }
}

/// Index just past the group opened at `start` (`[...]`, `(...)` or a quoted string).
fn skip_group(chars: &[char], start: usize) -> usize {
    let open = chars[start];
    if open == '"' || open == '\'' {
        let mut i = start + 1;
        while i < chars.len() {
            match chars[i] {
                '\\' => i += 2,
                ch if ch == open => return i + 1,
                _ => i += 1,
            }
        }
        return chars.len();
    }

    let close = if open == '[' { ']' } else { ')' };
    let mut depth = 0usize;
    let mut i = start;
    while i < chars.len() {
        match chars[i] {
            '\\' => {
                i += 2;
                continue;
            }
            '"' | '\'' => {
                i = skip_group(chars, i);
                continue;
            }
            ch if ch == open => depth += 1,
            ch if ch == close => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    chars.len()
}

/// Swaps each adjacent pair of `.class` / `#id` fragments within every run
/// of such fragments, left to right and without overlap:
/// `.a.b` becomes `.b.a`, `.a.b.c` becomes `.b.a.c`.
///
/// Bracketed attribute selectors, parenthesised arguments and quoted strings
/// are copied through untouched.
pub fn swap_adjacent_compound_order(selector: &str) -> String {
    let chars: Vec<char> = selector.chars().collect();
    let mut out = String::with_capacity(selector.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '[' | '(' | '"' | '\'' => {
                let end = skip_group(&chars, i);
                out.extend(&chars[i..end]);
                i = end;
            }
            '\\' => {
                let end = (i + 2).min(chars.len());
                out.extend(&chars[i..end]);
                i = end;
            }
            '.' | '#' => {
                let mut fragments = Vec::new();
                let mut pos = i;
                while let Some(end) = read_fragment(&chars, pos) {
                    fragments.push(&chars[pos..end]);
                    pos = end;
                }
                if fragments.is_empty() {
                    out.push(chars[i]);
                    i += 1;
                    continue;
                }
                for pair in fragments.chunks(2) {
                    for fragment in pair.iter().rev() {
                        out.extend(*fragment);
                    }
                }
                i = pos;
            }
            ch if is_ident_char(ch) => {
                // an identifier (tag name, pseudo-class name) never starts a fragment run
                let start = i;
                while i < chars.len() && is_ident_char(chars[i]) {
                    i += 1;
                }
                out.extend(&chars[start..i]);
            }
            ch => {
                out.push(ch);
                i += 1;
            }
        }
    }
    out
}

/// A selector together with the spellings a host may report it under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorKey {
    /// Trimmed, lowercased input in canonical double-colon form.
    pub selector: String,
    /// Fragment-swapped form, only when it differs from `selector`.
    pub swapped: Option<String>,
    /// Single-colon pseudo-element form, only when `selector` has a pseudo-element.
    pub legacy: Option<String>,
    /// Both of the above at once.
    pub swapped_legacy: Option<String>,
}

impl SelectorKey {
    pub fn new(selector: &str) -> Self {
        let selector = to_canonical_pseudo_form(&selector.trim().to_lowercase());
        let swapped = Some(swap_adjacent_compound_order(&selector)).filter(|s| *s != selector);
        let (legacy, swapped_legacy) = if has_double_colon_pseudo(&selector) {
            (
                Some(to_legacy_pseudo_form(&selector)),
                swapped.as_deref().map(to_legacy_pseudo_form),
            )
        } else {
            (None, None)
        };
        SelectorKey {
            selector,
            swapped,
            legacy,
            swapped_legacy,
        }
    }

    /// Every spelling this key accepts, canonical input first.
    pub fn forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.selector.as_str())
            .chain(self.swapped.as_deref())
            .chain(self.legacy.as_deref())
            .chain(self.swapped_legacy.as_deref())
    }

    /// True if a host-reported selector denotes this key.
    pub fn matches(&self, reported: &str) -> bool {
        let reported = reported.trim();
        self.forms().any(|form| form.eq_ignore_ascii_case(reported))
    }
}
