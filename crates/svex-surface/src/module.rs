use std::collections::HashMap;

use smol_str::SmolStr;
use svex_source::{TextRange, TextSize};

use crate::directive::Directive;
use crate::port::{Port, PortDir};

/// Declaration kinds a name can carry inside a module body.
///
/// A name may carry several (e.g. `output o; reg o;`). Only
/// user-written declarations are recorded here; declarations inside
/// previously generated blocks are tracked on the ports themselves.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeclKinds {
    pub port: bool,
    pub net: bool,
    pub reg: bool,
    pub var: bool,
}

impl DeclKinds {
    pub fn any(self) -> bool {
        self.port || self.net || self.reg || self.var
    }
}

/// A named connection in an instance's argument list: `.port(expr)`
/// or the `.port` shorthand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub port: SmolStr,
    pub range: TextRange,
}

/// A module instantiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub module_name: SmolStr,
    pub name: SmolStr,
    pub name_range: TextRange,
    /// Argument-list parens, from `(` through `)` inclusive.
    pub paren_range: TextRange,
    /// Named connections in source order, including any inside a
    /// previously generated region. The expanders treat connections
    /// before the AUTOINST comment as user-written.
    pub connections: Vec<Connection>,
    /// Index into the owning module's directive list, when the
    /// argument list carries `/*AUTOINST*/`.
    pub autoinst: Option<usize>,
}

/// An `AUTO_TEMPLATE` comment block, unparsed. Rule parsing belongs to
/// the template engine; the scanner records position only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateComment {
    pub range: TextRange,
}

/// The surface of one module declaration: everything the expansion
/// engine needs, with byte-accurate spans, nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSurface {
    pub name: SmolStr,
    pub name_range: TextRange,
    /// `module` keyword through `endmodule`.
    pub range: TextRange,
    /// Header port-list parens, `(` through `)` inclusive.
    pub header_paren: Option<TextRange>,
    /// Declared ports, header and body, first occurrence order.
    pub ports: Vec<Port>,
    /// Identifier tokens inside the header parens, with their
    /// offsets. Used for the AUTOARG pre-declared exclusion.
    pub header_tokens: Vec<(SmolStr, TextSize)>,
    /// User-written declarations by name.
    pub locals: HashMap<SmolStr, DeclKinds>,
    pub instances: Vec<Instance>,
    pub directives: Vec<Directive>,
    pub templates: Vec<TemplateComment>,
}

impl ModuleSurface {
    /// Declared port by name.
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }

    /// Declared ports with the given direction, in declaration order.
    pub fn ports_with_dir(&self, dir: PortDir) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(move |p| p.dir == dir)
    }

    /// User-written declaration kinds for a name.
    pub fn decl_kinds(&self, name: &str) -> DeclKinds {
        self.locals.get(name).copied().unwrap_or_default()
    }

    /// Whether the user declared `name` in any form (port, net,
    /// variable, or reg). Generated declarations do not count.
    pub fn declares(&self, name: &str) -> bool {
        self.decl_kinds(name).any()
    }
}
