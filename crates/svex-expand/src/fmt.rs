//! Output grammar shared by the expanders: connection expressions,
//! declaration lines, group labels, provenance comments.
//!
//! The emitted shapes are fixed so the result round-trips through the
//! project formatter with net-variable and named-port alignment set to
//! preserve.

use svex_surface::{Port, PortDir, PortOrigin};

/// Group labels, in emission order.
pub const GROUP_LABELS: [(PortDir, &str); 3] = [
    (PortDir::Input, "// Inputs"),
    (PortDir::Inout, "// Inouts"),
    (PortDir::Output, "// Outputs"),
];

/// Connection expression for a stem with a port's dimensions.
///
/// A single packed dimension becomes a real slice; any other non-empty
/// dimension shape is carried in a comment, with a `.` separating the
/// packed part from the unpacked part.
pub fn conn_expr(stem: &str, port: &Port, apply_dims: bool) -> String {
    if !apply_dims || !port.has_dims() {
        return stem.to_string();
    }
    if port.packed.len() == 1 && port.unpacked.is_empty() {
        return format!("{stem}{}", port.packed[0]);
    }
    let packed: String = port.packed.iter().map(|d| d.as_str()).collect();
    let unpacked: String = port.unpacked.iter().map(|d| d.as_str()).collect();
    if unpacked.is_empty() {
        format!("{stem}  /*{packed}*/")
    } else {
        format!("{stem}  /*{packed}.{unpacked}*/")
    }
}

/// Declaration text without terminator: `kw [packed] name[unpacked]`.
pub fn decl_text(kw: &str, port: &Port) -> String {
    let mut s = String::from(kw);
    if !port.packed.is_empty() {
        s.push(' ');
        for d in &port.packed {
            s.push_str(d);
        }
    }
    s.push(' ');
    s.push_str(&port.name);
    for d in &port.unpacked {
        s.push_str(d);
    }
    s
}

/// Provenance comment for a declaration pulled through an instance:
/// `// To b of bar` (inputs), `// From b of bar` (outputs),
/// `// To/From b of bar` (inouts). Empty for declared-origin ports.
pub fn provenance(port: &Port) -> Option<String> {
    let PortOrigin::Instance { instance, module } = &port.origin else {
        return None;
    };
    let how = match port.dir {
        PortDir::Input => "To",
        PortDir::Output => "From",
        PortDir::Inout => "To/From",
    };
    Some(format!("// {how} {instance} of {module}"))
}
