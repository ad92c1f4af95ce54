pub mod aggregate;
pub mod css_text;
pub mod owned_css;
pub mod property_names;
pub mod selector;
pub mod shorthand;
