//! Property-name and value translation at the public API boundary.

/// `marginTop` -> `margin-top`, `WebkitTransition` -> `-webkit-transition`,
/// `msTransform` -> `-ms-transform`, `cssFloat` -> `float`.
///
/// Names that are already hyphenated come back lowercased but otherwise unchanged.
pub fn to_hyphenated(name: &str) -> String {
    let name = name.trim();
    if name == "cssFloat" {
        return "float".to_string();
    }
    if name.starts_with("--") {
        // custom properties are case-sensitive
        return name.to_string();
    }

    if name.contains('-') {
        return name.to_ascii_lowercase();
    }

    let mut out = String::with_capacity(name.len() + 4);
    if name.starts_with("ms") && name[2..].starts_with(|c: char| c.is_ascii_uppercase()) {
        out.push('-');
    }
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// `margin-top` -> `marginTop`, `-webkit-transition` -> `WebkitTransition`,
/// `-ms-transform` -> `msTransform`, `float` -> `cssFloat`.
pub fn to_camel_case(name: &str) -> String {
    let name = name.trim();
    if name == "float" {
        return "cssFloat".to_string();
    }
    if name.starts_with("--") {
        return name.to_string();
    }

    if let Some(rest) = name.strip_prefix("-ms-") {
        return camelize(&format!("ms-{}", rest), false);
    }
    match name.strip_prefix('-') {
        Some(rest) => camelize(rest, true),
        None => camelize(name, false),
    }
}

fn camelize(name: &str, upper_first: bool) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = upper_first;
    for ch in name.chars() {
        if ch == '-' {
            upper_next = true;
        } else if upper_next {
            out.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Splits a trailing `!important` marker off a value.
///
/// Returns the bare value and whether the marker was present.
pub fn split_importance(value: &str) -> (&str, bool) {
    let trimmed = value.trim_end();
    if let Some(bang) = trimmed.rfind('!') {
        let marker = trimmed[bang + 1..].trim_start();
        if marker.eq_ignore_ascii_case("important") {
            return (trimmed[..bang].trim_end(), true);
        }
    }
    (value, false)
}
