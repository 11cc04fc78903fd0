//! AUTO_TEMPLATE parsing, rule selection, and connection rewriting.
//!
//! A template comment holds one or more rule groups:
//!
//! ```text
//! /* qux AUTO_TEMPLATE
//!    bar AUTO_TEMPLATE "regex" (
//!        .i1(in_a[]),
//!        .o2(out_b)); */
//! ```
//!
//! Consecutive `name AUTO_TEMPLATE` headers share the next connection
//! list, producing one rule per name. The quoted pattern after a
//! header is accepted and ignored: every rule applies to every
//! instance of its named module.

use smol_str::SmolStr;
use svex_surface::ModuleSurface;

/// One parsed rule: a module name and its connection rewrites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRule {
    pub module: SmolStr,
    pub connections: Vec<(SmolStr, SmolStr)>,
}

impl TemplateRule {
    /// The template expression for a port, if the rule has one.
    pub fn entry(&self, port: &str) -> Option<&str> {
        self.connections
            .iter()
            .find(|(p, _)| p == port)
            .map(|(_, t)| t.as_str())
    }
}

/// Parse all template blocks of a module, flattened in source order.
/// A malformed comment contributes nothing; the others still apply.
pub fn parse_templates(text: &str, module: &ModuleSurface) -> Vec<TemplateRule> {
    let mut rules = Vec::new();
    for t in &module.templates {
        let comment = &text[usize::from(t.range.start())..usize::from(t.range.end())];
        if let Some(parsed) = parse_comment(comment) {
            rules.extend(parsed);
        }
    }
    rules
}

/// The rule applied to an instance of `module`: the last matching rule
/// in source order, if any.
pub fn active_rule<'a>(rules: &'a [TemplateRule], module: &str) -> Option<&'a TemplateRule> {
    rules.iter().rev().find(|r| r.module == module)
}

/// How a port's connection expression is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnStem {
    /// The expression stem (port name, or the template's rewrite).
    pub stem: SmolStr,
    /// Whether the port's dimension decoration is applied to the stem.
    /// False for verbatim template entries.
    pub apply_dims: bool,
    pub from_template: bool,
}

/// Resolve the stem for a port under an optional active rule.
///
/// A template ending in `[]` keeps dimension decoration; any other
/// template is verbatim.
pub fn conn_stem(rule: Option<&TemplateRule>, port: &str) -> ConnStem {
    if let Some(rule) = rule
        && let Some(template) = rule.entry(port)
    {
        return match template.strip_suffix("[]") {
            Some(stem) => ConnStem {
                stem: SmolStr::new(stem),
                apply_dims: true,
                from_template: true,
            },
            None => ConnStem {
                stem: SmolStr::new(template),
                apply_dims: false,
                from_template: true,
            },
        };
    }
    ConnStem {
        stem: SmolStr::new(port),
        apply_dims: true,
        from_template: false,
    }
}

/// Whether a stem is a plain identifier, i.e. usable as a declared
/// name by the declaration directives.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

// Comment parsing

struct P<'a> {
    s: &'a [u8],
    i: usize,
}

impl<'a> P<'a> {
    fn ws(&mut self) {
        while self.i < self.s.len() && self.s[self.i].is_ascii_whitespace() {
            self.i += 1;
        }
    }

    fn eat(&mut self, c: u8) -> bool {
        self.ws();
        if self.i < self.s.len() && self.s[self.i] == c {
            self.i += 1;
            return true;
        }
        false
    }

    fn ident(&mut self) -> Option<&'a str> {
        self.ws();
        let start = self.i;
        while self.i < self.s.len()
            && (self.s[self.i].is_ascii_alphanumeric()
                || self.s[self.i] == b'_'
                || self.s[self.i] == b'$')
        {
            self.i += 1;
        }
        if self.i == start || self.s[start].is_ascii_digit() {
            return None;
        }
        std::str::from_utf8(&self.s[start..self.i]).ok()
    }

    fn quoted(&mut self) -> bool {
        self.ws();
        if self.i >= self.s.len() || self.s[self.i] != b'"' {
            return false;
        }
        self.i += 1;
        while self.i < self.s.len() {
            match self.s[self.i] {
                b'\\' => self.i += 2,
                b'"' => {
                    self.i += 1;
                    return true;
                }
                _ => self.i += 1,
            }
        }
        false
    }

    /// Balanced text up to the matching close paren; cursor starts
    /// just after the open paren.
    fn balanced(&mut self) -> Option<&'a str> {
        let start = self.i;
        let mut depth = 1i32;
        while self.i < self.s.len() {
            match self.s[self.i] {
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        let inner = std::str::from_utf8(&self.s[start..self.i]).ok()?;
                        self.i += 1;
                        return Some(inner.trim());
                    }
                }
                _ => {}
            }
            self.i += 1;
        }
        None
    }
}

fn parse_comment(comment: &str) -> Option<Vec<TemplateRule>> {
    let inner = comment.strip_prefix("/*")?.strip_suffix("*/")?;
    let mut p = P {
        s: inner.as_bytes(),
        i: 0,
    };
    let mut rules = Vec::new();
    let mut pending: Vec<SmolStr> = Vec::new();

    loop {
        p.ws();
        if p.i >= p.s.len() {
            break;
        }
        let name = p.ident()?;
        p.ws();
        let kw = p.ident()?;
        if kw != "AUTO_TEMPLATE" {
            return None;
        }
        pending.push(SmolStr::new(name));
        // Optional pattern, accepted and ignored.
        p.quoted();
        p.ws();
        if p.i < p.s.len() && p.s[p.i] == b'(' {
            p.i += 1;
            let connections = parse_connection_list(&mut p)?;
            p.eat(b';');
            for module in pending.drain(..) {
                rules.push(TemplateRule {
                    module,
                    connections: connections.clone(),
                });
            }
        }
        // Otherwise the header joins the next group's connection list.
    }
    // Headers with no following connection list produce no rules.
    Some(rules)
}

fn parse_connection_list(p: &mut P) -> Option<Vec<(SmolStr, SmolStr)>> {
    let mut out = Vec::new();
    loop {
        p.ws();
        if p.i >= p.s.len() {
            return None;
        }
        match p.s[p.i] {
            b')' => {
                p.i += 1;
                return Some(out);
            }
            b',' => {
                p.i += 1;
            }
            b'.' => {
                p.i += 1;
                let port = p.ident()?;
                if !p.eat(b'(') {
                    return None;
                }
                let expr = p.balanced()?;
                out.push((SmolStr::new(port), SmolStr::new(expr)));
            }
            _ => return None,
        }
    }
}
