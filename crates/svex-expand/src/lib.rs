//! AUTO-expansion engine: rewrites `/*AUTO…*/` directives into
//! concrete SystemVerilog using the module declarations visible
//! across a project.
//!
//! The engine is pure per call: it borrows a [`svex_project::Project`]
//! snapshot, computes replacement text for every directive in one
//! buffer, and returns non-overlapping byte-range edits against that
//! buffer. Anomalies (unresolved modules, directives in the wrong
//! context, malformed templates) degrade to "no edit".

mod expand;
mod fmt;
mod template;

pub use expand::{
    SourceEdit, apply_edits, expand_file, expand_kind_in_range, expand_range, kinds_in_range,
};
pub use template::{TemplateRule, active_rule, parse_templates};
