//! Module-surface model for AUTO expansion: the ports, declarations,
//! instances, directives and template comments of each module in a
//! buffer, with byte-accurate spans.

mod directive;
mod module;
mod port;
mod scan;

pub use directive::{Directive, DirectiveContext, DirectiveKind, END_SENTINEL};
pub use module::{Connection, DeclKinds, Instance, ModuleSurface, TemplateComment};
pub use port::{Port, PortDir, PortOrigin};
pub use scan::scan_source;
