use crate::style::aggregate::PropertyMap;

pub const SIDES: [&str; 4] = ["top", "right", "bottom", "left"];
pub const BORDER_ASPECTS: [&str; 3] = ["width", "style", "color"];

/// Shorthands that are deliberately left unexpanded.
pub const UNSUPPORTED_SHORTHANDS: [&str; 4] = ["background", "font", "transition", "border-radius"];

/// A shorthand property and the longhands it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShorthandGroup {
    /// `margin`, `padding`: `<name>-<side>`
    Box(&'static str),
    /// `border-width`, `border-style`, `border-color`: `border-<side>-<aspect>`
    BorderAspect(&'static str),
    /// `border-top`, ...: `border-<side>-<aspect>`
    BorderSide(&'static str),
    /// `border`: the three aspect groups
    Border,
}

impl ShorthandGroup {
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "margin" => return Some(ShorthandGroup::Box("margin")),
            "padding" => return Some(ShorthandGroup::Box("padding")),
            "border" => return Some(ShorthandGroup::Border),
            _ => {}
        }
        let rest = name.strip_prefix("border-")?;
        if let Some(aspect) = BORDER_ASPECTS.iter().find(|a| **a == rest) {
            return Some(ShorthandGroup::BorderAspect(*aspect));
        }
        SIDES
            .iter()
            .find(|s| **s == rest)
            .map(|side| ShorthandGroup::BorderSide(*side))
    }

    /// Direct constituents, in serialization order.
    pub fn longhands(&self) -> Vec<String> {
        match self {
            ShorthandGroup::Box(name) => SIDES.iter().map(|s| format!("{}-{}", name, s)).collect(),
            ShorthandGroup::BorderAspect(aspect) => SIDES
                .iter()
                .map(|s| format!("border-{}-{}", s, aspect))
                .collect(),
            ShorthandGroup::BorderSide(side) => BORDER_ASPECTS
                .iter()
                .map(|a| format!("border-{}-{}", side, a))
                .collect(),
            ShorthandGroup::Border => BORDER_ASPECTS
                .iter()
                .map(|a| format!("border-{}", a))
                .collect(),
        }
    }

    /// Every property this shorthand sets, including intermediate shorthands.
    pub fn covered(&self) -> Vec<String> {
        match self {
            ShorthandGroup::Border => {
                let mut all = self.longhands();
                all.extend(SIDES.iter().map(|s| format!("border-{}", s)));
                for side in SIDES {
                    all.extend(ShorthandGroup::BorderSide(side).longhands());
                }
                all
            }
            _ => self.longhands(),
        }
    }
}

/// Every property cleared along with `name`; empty for non-shorthands.
pub fn longhands(name: &str) -> Vec<String> {
    ShorthandGroup::lookup(name)
        .map(|group| group.covered())
        .unwrap_or_default()
}

/// Outcome of reading a property through the shorthand rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// A shorthand rebuilt from its longhands.
    Collapsed(String),
    /// A shorthand rebuilt from some of its longhands; the listed
    /// constituents were declared but could not be represented.
    Partial {
        value: String,
        dropped: Vec<&'static str>,
    },
    /// A plain property's declared value.
    Declared(String),
    /// A shorthand whose longhands do not collapse, with its raw declared value.
    Unresolved(Option<String>),
    /// A shorthand this layer does not expand, with its raw declared value.
    Unsupported(Option<String>),
    Absent,
}

impl Resolved {
    /// The value a caller would see, falling back to raw declared values.
    pub fn value(&self) -> Option<&str> {
        match self {
            Resolved::Collapsed(v) | Resolved::Declared(v) => Some(v),
            Resolved::Partial { value, .. } => Some(value),
            Resolved::Unresolved(raw) | Resolved::Unsupported(raw) => raw.as_deref(),
            Resolved::Absent => None,
        }
    }
}

/// Four side values collapsed with the CSS serialization rule.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Collapse {
    value: String,
    /// Number of values in the serialized form, 1 to 4.
    arity: usize,
}

fn collapse_sides(top: &str, right: &str, bottom: &str, left: &str) -> Collapse {
    if top == right && right == bottom && bottom == left {
        Collapse {
            value: top.to_string(),
            arity: 1,
        }
    } else if top == bottom && left == right {
        Collapse {
            value: format!("{} {}", top, right),
            arity: 2,
        }
    } else if left == right {
        Collapse {
            value: format!("{} {} {}", top, right, bottom),
            arity: 3,
        }
    } else {
        Collapse {
            value: format!("{} {} {} {}", top, right, bottom, left),
            arity: 4,
        }
    }
}

/// Collapse a four-sided group; every side must be declared.
fn directional(map: &PropertyMap, group: ShorthandGroup) -> Option<Collapse> {
    let names = group.longhands();
    let values: Vec<&str> = names
        .iter()
        .map(|n| map.get(n).map(String::as_str))
        .collect::<Option<_>>()?;
    match values.as_slice() {
        [top, right, bottom, left] => Some(collapse_sides(top, right, bottom, left)),
        _ => None,
    }
}

fn any_declared(map: &PropertyMap, names: &[String]) -> bool {
    names.iter().any(|n| map.contains_key(n))
}

fn unresolved(map: &PropertyMap, name: &str, constituents: &[String]) -> Resolved {
    match map.get(name) {
        Some(raw) => Resolved::Unresolved(Some(raw.clone())),
        None if any_declared(map, constituents) => Resolved::Unresolved(None),
        None => Resolved::Absent,
    }
}

/// `value` stands for `border`; any declared aspect in `missing` is reported
/// as dropped.
fn lossy_border(map: &PropertyMap, value: String, missing: &[&'static str]) -> Resolved {
    let dropped: Vec<&'static str> = BORDER_ASPECTS
        .into_iter()
        .zip(["border-width", "border-style", "border-color"])
        .filter(|(aspect, _)| missing.contains(aspect))
        .filter(|(aspect, _)| any_declared(map, &ShorthandGroup::BorderAspect(*aspect).longhands()))
        .map(|(_, name)| name)
        .collect();
    if dropped.is_empty() {
        Resolved::Collapsed(value)
    } else {
        Resolved::Partial { value, dropped }
    }
}

fn resolve_border(map: &PropertyMap) -> Resolved {
    let aspect = |a: &'static str| directional(map, ShorthandGroup::BorderAspect(a));
    let uniform = |c: Option<Collapse>| c.filter(|c| c.arity == 1).map(|c| c.value);

    let width = uniform(aspect("width"));
    let style = uniform(aspect("style"));
    let color = uniform(aspect("color"));

    match (width, style, color) {
        (Some(w), Some(s), Some(c)) => Resolved::Collapsed(format!("{} {} {}", w, s, c)),
        (Some(w), Some(s), None) => lossy_border(map, format!("{} {}", w, s), &["color"]),
        (Some(w), None, _) => lossy_border(map, w, &["style", "color"]),
        _ => unresolved(map, "border", &ShorthandGroup::Border.covered()),
    }
}

/// Reads `name` from an aggregated property map, rebuilding margin, padding
/// and border shorthands from their longhands.
pub fn resolve(map: &PropertyMap, name: &str) -> Resolved {
    if UNSUPPORTED_SHORTHANDS.iter().any(|s| *s == name) {
        return Resolved::Unsupported(map.get(name).cloned());
    }

    let Some(group) = ShorthandGroup::lookup(name) else {
        return match map.get(name) {
            Some(value) => Resolved::Declared(value.clone()),
            None => Resolved::Absent,
        };
    };

    match group {
        ShorthandGroup::Box(_) | ShorthandGroup::BorderAspect(_) => match directional(map, group) {
            Some(collapse) => Resolved::Collapsed(collapse.value),
            None => unresolved(map, name, &group.longhands()),
        },
        ShorthandGroup::BorderSide(_) => {
            let longhands = group.longhands();
            let present: Vec<&str> = longhands
                .iter()
                .filter_map(|n| map.get(n).map(String::as_str))
                .collect();
            if present.is_empty() {
                unresolved(map, name, &longhands)
            } else {
                Resolved::Collapsed(present.join(" "))
            }
        }
        ShorthandGroup::Border => resolve_border(map),
    }
}
