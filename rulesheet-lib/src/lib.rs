//! Read, write and remove CSS declarations by selector against a live
//! stylesheet host, smoothing over how different hosts report selectors and
//! pseudo-elements.
//!
//! The host is anything implementing [`host::StyleHost`];
//! [`host::memory::MemoryHost`] keeps sheets in memory.

pub mod error;
pub mod host;
pub mod rule_sheet;
pub mod sheet;
pub mod style;

pub use error::{Result, SheetError};
pub use rule_sheet::{ExportedSheet, RuleSheet, RuleSheetOptions, DEFAULT_OWNER_ID};
pub use style::aggregate::PropertyMap;
pub use style::shorthand::Resolved;
