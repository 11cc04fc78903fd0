//! The directive expanders and the bounded fixed-point driver.

use std::collections::HashSet;

use smol_str::SmolStr;
use svex_project::Project;
use svex_source::{FileId, TextRange};
use svex_surface::{
    Directive, DirectiveContext, DirectiveKind, END_SENTINEL, ModuleSurface, Port, PortDir,
    PortOrigin,
};

use crate::fmt::{GROUP_LABELS, conn_expr, decl_text, provenance};
use crate::template::{TemplateRule, active_rule, conn_stem, is_identifier, parse_templates};

/// A replacement in byte coordinates, anchored to the buffer the
/// expansion was requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEdit {
    pub range: TextRange,
    pub replacement: String,
}

fn slice(text: &str, range: TextRange) -> &str {
    &text[usize::from(range.start())..usize::from(range.end())]
}

/// Apply non-overlapping edits to a text, back to front.
pub fn apply_edits(text: &str, edits: &[SourceEdit]) -> String {
    let mut sorted: Vec<&SourceEdit> = edits.iter().collect();
    sorted.sort_by_key(|e| std::cmp::Reverse(e.range.start()));
    let mut out = text.to_string();
    for e in sorted {
        out.replace_range(std::ops::Range::<usize>::from(e.range), &e.replacement);
    }
    out
}

/// Expand every directive in `file`, running the bounded fixed point
/// so that directives whose input is another directive's output settle
/// within one call.
pub fn expand_file(project: &Project, file: FileId) -> Vec<SourceEdit> {
    expand_impl(project, file, None, PASS_LIMIT)
}

/// Expand the directives whose replacement span intersects `range`.
/// Single pass: ranges cannot be carried across a pass boundary once
/// text has moved.
pub fn expand_range(project: &Project, file: FileId, range: TextRange) -> Vec<SourceEdit> {
    expand_impl(
        project,
        file,
        Some(Filter { range, kind: None }),
        1,
    )
}

/// Expand only directives of `kind` intersecting `range`. Single pass.
pub fn expand_kind_in_range(
    project: &Project,
    file: FileId,
    range: TextRange,
    kind: DirectiveKind,
) -> Vec<SourceEdit> {
    expand_impl(
        project,
        file,
        Some(Filter {
            range,
            kind: Some(kind),
        }),
        1,
    )
}

/// Directive kinds present in `file` whose span intersects `range`,
/// in fixed kind order. Drives the per-kind code actions.
pub fn kinds_in_range(project: &Project, file: FileId, range: TextRange) -> Vec<DirectiveKind> {
    let mut present = HashSet::new();
    for module in project.modules_in_file(file) {
        for d in &module.directives {
            if d.replace_range.intersect(range).is_some() {
                present.insert(d.kind);
            }
        }
    }
    DirectiveKind::ALL
        .into_iter()
        .filter(|k| present.contains(k))
        .collect()
}

/// Cross-module dependencies settle in two passes: the first expands
/// every module from the snapshot, the second re-reads declared ports
/// that the first pass introduced.
const PASS_LIMIT: usize = 2;

struct Filter {
    range: TextRange,
    kind: Option<DirectiveKind>,
}

impl Filter {
    fn matches(&self, d: &Directive) -> bool {
        if let Some(k) = self.kind
            && d.kind != k
        {
            return false;
        }
        d.replace_range.intersect(self.range).is_some()
    }
}

fn expand_impl(
    project: &Project,
    file: FileId,
    filter: Option<Filter>,
    passes: usize,
) -> Vec<SourceEdit> {
    let Some(orig) = project.file(file) else {
        return Vec::new();
    };
    let orig_text = orig.text.clone();
    let orig_spans: Vec<TextRange> = orig
        .modules
        .iter()
        .flat_map(|m| m.directives.iter().map(|d| d.replace_range))
        .collect();
    let mut final_replacement: Vec<Option<String>> = vec![None; orig_spans.len()];

    let mut work = project.clone();
    for pass in 0..passes {
        let pass_edits = run_pass(&work, file, filter.as_ref());
        if pass_edits.is_empty() {
            break;
        }
        for (idx, _, replacement) in &pass_edits {
            if let Some(slot) = final_replacement.get_mut(*idx) {
                *slot = Some(replacement.clone());
            }
        }
        if pass + 1 < passes {
            let Some(pf) = work.file(file) else {
                break;
            };
            let text = &pf.text;
            let edits: Vec<SourceEdit> = pass_edits
                .iter()
                .map(|(_, range, replacement)| SourceEdit {
                    range: *range,
                    replacement: replacement.clone(),
                })
                .collect();
            let next = apply_edits(text, &edits);
            work.update_file(file, next);
        }
    }

    let mut out: Vec<SourceEdit> = final_replacement
        .into_iter()
        .enumerate()
        .filter_map(|(i, r)| {
            r.map(|replacement| SourceEdit {
                range: orig_spans[i],
                replacement,
            })
        })
        .filter(|e| slice(&orig_text, e.range) != e.replacement)
        .collect();
    out.sort_by(|a, b| {
        b.range
            .end()
            .cmp(&a.range.end())
            .then(b.range.start().cmp(&a.range.start()))
    });
    out
}

/// One pass over the buffer: `(directive index, current span, new
/// text)` for every directive whose regenerated text differs.
fn run_pass(
    project: &Project,
    file: FileId,
    filter: Option<&Filter>,
) -> Vec<(usize, TextRange, String)> {
    let Some(pf) = project.file(file) else {
        return Vec::new();
    };
    let text = pf.text.as_str();
    let mut out = Vec::new();
    let mut idx = 0usize;

    for module in &pf.modules {
        let rules = parse_templates(text, module);
        let plan = PortPlan::compute(project, file, module, &rules);
        for d in &module.directives {
            let this = idx;
            idx += 1;
            if let Some(f) = filter
                && !f.matches(d)
            {
                continue;
            }
            let Some(replacement) = expand_directive(project, file, text, module, &rules, &plan, d)
            else {
                continue;
            };
            if slice(text, d.replace_range) != replacement {
                out.push((this, d.replace_range, replacement));
            }
        }
    }
    out
}

/// Candidate declarations this module's port-propagation directives
/// produce in the current pass. AUTOARG folds these in so a module
/// whose whole port surface is generated settles without an extra
/// pass; AUTOWIRE excludes them as already-spoken-for names.
struct PortPlan {
    inputs: Vec<Port>,
    outputs: Vec<Port>,
    inouts: Vec<Port>,
}

impl PortPlan {
    fn compute(
        project: &Project,
        file: FileId,
        module: &ModuleSurface,
        rules: &[TemplateRule],
    ) -> Self {
        let wants = |kind: DirectiveKind| {
            module
                .directives
                .iter()
                .any(|d| d.kind == kind && d.context != DirectiveContext::InstanceArgs)
        };
        let want = [
            (PortDir::Input, wants(DirectiveKind::Autoinput)),
            (PortDir::Output, wants(DirectiveKind::Autooutput)),
            (PortDir::Inout, wants(DirectiveKind::Autoinout)),
        ];

        let mut plan = Self {
            inputs: Vec::new(),
            outputs: Vec::new(),
            inouts: Vec::new(),
        };
        for inst in &module.instances {
            let Some(target) = project.resolve(file, &inst.module_name) else {
                continue;
            };
            let rule = active_rule(rules, &inst.module_name);
            for port in &target.ports {
                if !want.iter().any(|(d, w)| *d == port.dir && *w) {
                    continue;
                }
                let stem = conn_stem(rule, &port.name);
                if !is_identifier(&stem.stem) {
                    continue;
                }
                if module.declares(&stem.stem) {
                    continue;
                }
                let bucket = plan.bucket_mut(port.dir);
                if bucket.iter().any(|p| p.name == stem.stem) {
                    continue;
                }
                bucket.push(Port {
                    name: stem.stem,
                    dir: port.dir,
                    packed: port.packed.clone(),
                    unpacked: port.unpacked.clone(),
                    origin: PortOrigin::Instance {
                        instance: inst.name.clone(),
                        module: inst.module_name.clone(),
                    },
                    generated: false,
                });
            }
        }
        plan
    }

    fn bucket(&self, dir: PortDir) -> &[Port] {
        match dir {
            PortDir::Input => &self.inputs,
            PortDir::Output => &self.outputs,
            PortDir::Inout => &self.inouts,
        }
    }

    fn bucket_mut(&mut self, dir: PortDir) -> &mut Vec<Port> {
        match dir {
            PortDir::Input => &mut self.inputs,
            PortDir::Output => &mut self.outputs,
            PortDir::Inout => &mut self.inouts,
        }
    }

    fn names(&self) -> HashSet<SmolStr> {
        self.inputs
            .iter()
            .chain(&self.outputs)
            .chain(&self.inouts)
            .map(|p| p.name.clone())
            .collect()
    }
}

/// Regenerate one directive's replacement text (comment included), or
/// `None` when the directive produces no edit (wrong context,
/// unresolved module, nothing to do).
fn expand_directive(
    project: &Project,
    file: FileId,
    text: &str,
    module: &ModuleSurface,
    rules: &[TemplateRule],
    plan: &PortPlan,
    d: &Directive,
) -> Option<String> {
    match d.kind {
        DirectiveKind::Autoarg => expand_autoarg(text, module, plan, d),
        DirectiveKind::Autoinst => expand_autoinst(project, file, text, module, rules, d),
        DirectiveKind::Autoinput => expand_port_decls(text, plan.bucket(PortDir::Input), "input", d),
        DirectiveKind::Autooutput => {
            expand_port_decls(text, plan.bucket(PortDir::Output), "output", d)
        }
        DirectiveKind::Autoinout => expand_port_decls(text, plan.bucket(PortDir::Inout), "inout", d),
        DirectiveKind::Autowire => expand_autowire(project, file, text, module, rules, plan, d),
        DirectiveKind::Autoreg => expand_autoreg(project, file, text, module, rules, d),
    }
}

fn expand_autoarg(
    text: &str,
    module: &ModuleSurface,
    plan: &PortPlan,
    d: &Directive,
) -> Option<String> {
    if d.context != DirectiveContext::HeaderParen {
        return None;
    }
    // Declared ports first, then the ports this pass will declare.
    let mut ports: Vec<&Port> = module.ports.iter().collect();
    for bucket in [&plan.inputs, &plan.outputs, &plan.inouts] {
        for p in bucket {
            if !ports.iter().any(|q| q.name == p.name) {
                ports.push(p);
            }
        }
    }
    let excluded: HashSet<&str> = module
        .header_tokens
        .iter()
        .filter(|(_, pos)| *pos < d.comment_range.start())
        .map(|(name, _)| name.as_str())
        .collect();

    let groups: Vec<(&str, Vec<&&Port>)> = GROUP_LABELS
        .iter()
        .map(|(dir, label)| {
            let members: Vec<&&Port> = ports
                .iter()
                .filter(|p| p.dir == *dir && !excluded.contains(p.name.as_str()))
                .collect();
            (*label, members)
        })
        .filter(|(_, members)| !members.is_empty())
        .collect();
    let total: usize = groups.iter().map(|(_, m)| m.len()).sum();

    let mut s = String::from(slice(text, d.comment_range));
    if total == 0 {
        return Some(s);
    }
    if d.needs_leading_comma {
        s.push(',');
    }
    s.push('\n');
    let mut emitted = 0usize;
    for (label, members) in &groups {
        s.push_str("    ");
        s.push_str(label);
        s.push('\n');
        for p in members {
            emitted += 1;
            s.push_str("    ");
            s.push_str(&p.name);
            if emitted < total {
                s.push(',');
            }
            s.push('\n');
        }
    }
    Some(s)
}

fn expand_autoinst(
    project: &Project,
    file: FileId,
    text: &str,
    module: &ModuleSurface,
    rules: &[TemplateRule],
    d: &Directive,
) -> Option<String> {
    if d.context != DirectiveContext::InstanceArgs {
        return None;
    }
    let inst = module.instances.get(d.instance?)?;
    let target = project.resolve(file, &inst.module_name)?;
    let rule = active_rule(rules, &inst.module_name);
    let pre: HashSet<&str> = inst
        .connections
        .iter()
        .filter(|c| c.range.start() < d.comment_range.start())
        .map(|c| c.port.as_str())
        .collect();

    let groups: Vec<(&str, Vec<&Port>)> = GROUP_LABELS
        .iter()
        .map(|(dir, label)| {
            let members: Vec<&Port> = target
                .ports
                .iter()
                .filter(|p| p.dir == *dir && !pre.contains(p.name.as_str()))
                .collect();
            (*label, members)
        })
        .filter(|(_, members)| !members.is_empty())
        .collect();
    let total: usize = groups.iter().map(|(_, m)| m.len()).sum();

    let mut s = String::from(slice(text, d.comment_range));
    if total == 0 {
        return Some(s);
    }
    if d.needs_leading_comma {
        s.push(',');
    }
    s.push('\n');
    let mut emitted = 0usize;
    for (label, members) in &groups {
        s.push_str("      ");
        s.push_str(label);
        s.push('\n');
        for p in members {
            emitted += 1;
            let stem = conn_stem(rule, &p.name);
            let expr = conn_expr(&stem.stem, p, stem.apply_dims);
            s.push_str("      .");
            s.push_str(&p.name);
            s.push('(');
            s.push_str(&expr);
            s.push(')');
            if emitted < total {
                s.push(',');
            }
            s.push('\n');
        }
    }
    s.push_str("  ");
    Some(s)
}

/// AUTOINPUT / AUTOOUTPUT / AUTOINOUT: a sentinel-delimited block of
/// declarations, `;`-terminated in the body, `,`-separated inside the
/// header parens.
fn expand_port_decls(text: &str, bucket: &[Port], kw: &str, d: &Directive) -> Option<String> {
    if d.context == DirectiveContext::InstanceArgs {
        return None;
    }
    let comment = slice(text, d.comment_range);
    if bucket.is_empty() {
        if d.replace_range == d.comment_range {
            return None;
        }
        // Stale block with no remaining candidates: drop the block.
        return Some(comment.to_string());
    }
    let indent = match d.context {
        DirectiveContext::HeaderParen => "    ",
        _ => "  ",
    };
    let sentinel = d.kind.begin_sentinel()?;

    let mut s = String::from(comment);
    s.push('\n');
    s.push_str(indent);
    s.push_str(sentinel);
    s.push('\n');
    for (i, p) in bucket.iter().enumerate() {
        s.push_str(indent);
        s.push_str(&decl_text(kw, p));
        let last = i + 1 == bucket.len();
        match d.context {
            DirectiveContext::HeaderParen => {
                if !last || d.has_trailing_content {
                    s.push(',');
                }
            }
            _ => s.push(';'),
        }
        if let Some(prov) = provenance(p) {
            s.push_str("  ");
            s.push_str(&prov);
        }
        s.push('\n');
    }
    s.push_str(indent);
    s.push_str(END_SENTINEL);
    Some(s)
}

fn expand_autowire(
    project: &Project,
    file: FileId,
    text: &str,
    module: &ModuleSurface,
    rules: &[TemplateRule],
    plan: &PortPlan,
    d: &Directive,
) -> Option<String> {
    if d.context != DirectiveContext::Body {
        return None;
    }
    let spoken_for = plan.names();
    let mut wires: Vec<Port> = Vec::new();
    for inst in &module.instances {
        let Some(target) = project.resolve(file, &inst.module_name) else {
            continue;
        };
        let rule = active_rule(rules, &inst.module_name);
        for port in &target.ports {
            if port.dir == PortDir::Input {
                continue;
            }
            let stem = conn_stem(rule, &port.name);
            if !is_identifier(&stem.stem)
                || module.declares(&stem.stem)
                || spoken_for.contains(&stem.stem)
                || wires.iter().any(|w| w.name == stem.stem)
            {
                continue;
            }
            wires.push(Port {
                name: stem.stem,
                dir: port.dir,
                packed: port.packed.clone(),
                unpacked: port.unpacked.clone(),
                origin: PortOrigin::Instance {
                    instance: inst.name.clone(),
                    module: inst.module_name.clone(),
                },
                generated: false,
            });
        }
    }
    expand_var_decls(text, &wires, "wire", d, true)
}

fn expand_autoreg(
    project: &Project,
    file: FileId,
    text: &str,
    module: &ModuleSurface,
    rules: &[TemplateRule],
    d: &Directive,
) -> Option<String> {
    if d.context != DirectiveContext::Body {
        return None;
    }
    let driven = instance_driven_nets(project, file, module, rules);
    let regs: Vec<Port> = module
        .ports_with_dir(PortDir::Output)
        .filter(|p| !module.decl_kinds(&p.name).reg && !driven.contains(&p.name))
        .cloned()
        .collect();
    expand_var_decls(text, &regs, "reg", d, false)
}

/// Nets an AUTOINST expansion in this module will connect to an
/// instantiated module's output or inout: their declarations are
/// wires, never this module's regs.
fn instance_driven_nets(
    project: &Project,
    file: FileId,
    module: &ModuleSurface,
    rules: &[TemplateRule],
) -> HashSet<SmolStr> {
    let mut driven = HashSet::new();
    for inst in &module.instances {
        let Some(dir_idx) = inst.autoinst else {
            continue;
        };
        let Some(d) = module.directives.get(dir_idx) else {
            continue;
        };
        let Some(target) = project.resolve(file, &inst.module_name) else {
            continue;
        };
        let rule = active_rule(rules, &inst.module_name);
        let pre: HashSet<&str> = inst
            .connections
            .iter()
            .filter(|c| c.range.start() < d.comment_range.start())
            .map(|c| c.port.as_str())
            .collect();
        for port in &target.ports {
            if port.dir == PortDir::Input || pre.contains(port.name.as_str()) {
                continue;
            }
            let stem = conn_stem(rule, &port.name);
            if is_identifier(&stem.stem) {
                driven.insert(stem.stem);
            }
        }
    }
    driven
}

/// AUTOWIRE / AUTOREG block emission. Body context only; wires carry
/// provenance comments, regs do not.
fn expand_var_decls(
    text: &str,
    ports: &[Port],
    kw: &str,
    d: &Directive,
    with_provenance: bool,
) -> Option<String> {
    let comment = slice(text, d.comment_range);
    if ports.is_empty() {
        if d.replace_range == d.comment_range {
            return None;
        }
        return Some(comment.to_string());
    }
    let sentinel = d.kind.begin_sentinel()?;
    let mut s = String::from(comment);
    s.push('\n');
    s.push_str("  ");
    s.push_str(sentinel);
    s.push('\n');
    for p in ports {
        s.push_str("  ");
        s.push_str(&decl_text(kw, p));
        s.push(';');
        if with_provenance
            && let Some(prov) = provenance(p)
        {
            s.push_str("  ");
            s.push_str(&prov);
        }
        s.push('\n');
    }
    s.push_str("  ");
    s.push_str(END_SENTINEL);
    Some(s)
}
