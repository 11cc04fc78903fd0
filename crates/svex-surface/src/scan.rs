use smallvec::SmallVec;
use smol_str::SmolStr;
use svex_lexer::{SyntaxKind, lex};
use svex_source::{TextRange, TextSize};

use crate::directive::{Directive, DirectiveContext, DirectiveKind, END_SENTINEL};
use crate::module::{Connection, DeclKinds, Instance, ModuleSurface, TemplateComment};
use crate::port::{Port, PortDir, PortOrigin};

/// Scan source text into module surfaces.
///
/// Fault-tolerant: constructs the scanner does not understand are
/// skipped to the next synchronisation point and simply contribute no
/// facts. Never fails.
pub fn scan_source(text: &str) -> Vec<ModuleSurface> {
    Scanner::new(text).run()
}

#[derive(Debug, Clone, Copy)]
struct Tok {
    kind: SyntaxKind,
    range: TextRange,
}

/// What a body declaration introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclIntro {
    Port(PortDir),
    Net,
    Reg,
    Var,
}

struct Scanner<'t> {
    text: &'t str,
    toks: Vec<Tok>,
    pos: usize,
    /// Last significant token kind inside the paren group currently
    /// being scanned. Read when a directive is recorded to decide
    /// whether its generated list must open with a comma.
    last_sig: Option<SyntaxKind>,
}

/// Accumulates one module while its extent is scanned.
struct ModuleBuild {
    name: SmolStr,
    name_range: TextRange,
    start: TextSize,
    header_paren: Option<TextRange>,
    ports: Vec<Port>,
    header_tokens: Vec<(SmolStr, TextSize)>,
    locals: std::collections::HashMap<SmolStr, DeclKinds>,
    instances: Vec<Instance>,
    directives: Vec<Directive>,
    templates: Vec<TemplateComment>,
    /// Declarations starting before this offset sit inside a
    /// previously generated block.
    gen_until: TextSize,
}

impl ModuleBuild {
    fn new(name: SmolStr, name_range: TextRange, start: TextSize) -> Self {
        Self {
            name,
            name_range,
            start,
            header_paren: None,
            ports: Vec::new(),
            header_tokens: Vec::new(),
            locals: std::collections::HashMap::new(),
            instances: Vec::new(),
            directives: Vec::new(),
            templates: Vec::new(),
            gen_until: TextSize::new(0),
        }
    }

    fn finish(self, end: TextSize) -> ModuleSurface {
        ModuleSurface {
            name: self.name,
            name_range: self.name_range,
            range: TextRange::new(self.start, end),
            header_paren: self.header_paren,
            ports: self.ports,
            header_tokens: self.header_tokens,
            locals: self.locals,
            instances: self.instances,
            directives: self.directives,
            templates: self.templates,
        }
    }

    fn mark_local(&mut self, name: &SmolStr, f: impl FnOnce(&mut DeclKinds)) {
        f(self.locals.entry(name.clone()).or_default());
    }

    /// Insert or update a declared port, preserving first-occurrence
    /// order. A later declaration of the same name refines direction
    /// and dimensions (body declarations completing non-ANSI headers).
    fn upsert_port(
        &mut self,
        name: SmolStr,
        dir: PortDir,
        packed: SmallVec<[SmolStr; 1]>,
        unpacked: SmallVec<[SmolStr; 1]>,
        generated: bool,
    ) {
        if let Some(p) = self.ports.iter_mut().find(|p| p.name == name) {
            p.dir = dir;
            p.packed = packed;
            p.unpacked = unpacked;
            return;
        }
        self.ports.push(Port {
            name,
            dir,
            packed,
            unpacked,
            origin: PortOrigin::Declared,
            generated,
        });
    }
}

impl<'t> Scanner<'t> {
    fn new(text: &'t str) -> Self {
        let mut toks = Vec::new();
        let mut off = TextSize::new(0);
        for t in lex(text) {
            toks.push(Tok {
                kind: t.kind,
                range: TextRange::at(off, t.len),
            });
            off += t.len;
        }
        Self {
            text,
            toks,
            pos: 0,
            last_sig: None,
        }
    }

    fn cur(&self) -> Tok {
        self.toks[self.pos.min(self.toks.len() - 1)]
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.cur().kind == kind
    }

    fn bump(&mut self) {
        if self.pos + 1 < self.toks.len() {
            self.pos += 1;
        }
    }

    fn slice(&self, range: TextRange) -> &'t str {
        &self.text[usize::from(range.start())..usize::from(range.end())]
    }

    fn run(mut self) -> Vec<ModuleSurface> {
        let mut modules = Vec::new();
        loop {
            match self.cur().kind {
                SyntaxKind::Eof => break,
                SyntaxKind::ModuleKw | SyntaxKind::MacromoduleKw => {
                    if let Some(m) = self.scan_module() {
                        modules.push(m);
                    }
                }
                _ => self.bump(),
            }
        }
        modules
    }

    // Trivia handling

    /// Skip trivia without recording anything. Used on speculative
    /// paths and inside skipped constructs.
    fn skip_trivia_silent(&mut self) {
        while self.cur().kind.is_trivia() {
            self.bump();
        }
    }

    /// Skip trivia, recording AUTO directives and AUTO_TEMPLATE
    /// comments encountered along the way.
    fn drain_trivia(&mut self, m: &mut ModuleBuild, ctx: DirectiveContext) {
        while self.cur().kind.is_trivia() {
            let t = self.cur();
            if t.kind == SyntaxKind::BlockComment {
                let text = self.slice(t.range);
                if let Some(kind) = DirectiveKind::from_comment(text) {
                    self.record_directive(m, kind, ctx, t.range);
                } else if text.contains("AUTO_TEMPLATE") {
                    m.templates.push(TemplateComment { range: t.range });
                }
            }
            self.bump();
        }
    }

    fn record_directive(
        &mut self,
        m: &mut ModuleBuild,
        kind: DirectiveKind,
        ctx: DirectiveContext,
        comment_range: TextRange,
    ) {
        let mut replace_range = comment_range;
        if kind.begin_sentinel().is_some()
            && let Some(end) = self.generated_block_end(kind, ctx)
        {
            replace_range = TextRange::new(comment_range.start(), end);
            m.gen_until = m.gen_until.max(end);
        }
        let needs_leading_comma = matches!(
            (kind, ctx),
            (DirectiveKind::Autoarg, DirectiveContext::HeaderParen)
                | (DirectiveKind::Autoinst, DirectiveContext::InstanceArgs)
        ) && self
            .last_sig
            .is_some_and(|k| k != SyntaxKind::Comma);
        m.directives.push(Directive {
            kind,
            context: ctx,
            comment_range,
            replace_range,
            needs_leading_comma,
            has_trailing_content: false,
            instance: None,
        });
    }

    /// Look ahead (without advancing) for a previously generated block
    /// immediately after the directive comment at `self.pos`. Returns
    /// the end offset of the `// End of automatics` line.
    fn generated_block_end(&self, kind: DirectiveKind, ctx: DirectiveContext) -> Option<TextSize> {
        let sentinel = kind.begin_sentinel()?;
        let mut i = self.pos + 1;
        while i < self.toks.len() && self.toks[i].kind == SyntaxKind::Whitespace {
            i += 1;
        }
        let begin = self.toks.get(i)?;
        if begin.kind != SyntaxKind::LineComment || self.slice(begin.range) != sentinel {
            return None;
        }
        i += 1;
        let mut depth = 0i32;
        while let Some(t) = self.toks.get(i) {
            match t.kind {
                SyntaxKind::LineComment if self.slice(t.range) == END_SENTINEL => {
                    return Some(t.range.end());
                }
                SyntaxKind::Eof | SyntaxKind::EndmoduleKw | SyntaxKind::ModuleKw => return None,
                SyntaxKind::LParen | SyntaxKind::LBracket | SyntaxKind::LBrace => depth += 1,
                SyntaxKind::RParen if ctx == DirectiveContext::HeaderParen && depth == 0 => {
                    return None;
                }
                SyntaxKind::RParen | SyntaxKind::RBracket | SyntaxKind::RBrace => depth -= 1,
                _ => {}
            }
            i += 1;
        }
        None
    }

    // Module scanning

    fn scan_module(&mut self) -> Option<ModuleSurface> {
        let start = self.cur().range.start();
        self.bump();
        self.skip_trivia_silent();
        if !self.at(SyntaxKind::Ident) {
            self.recover_to_endmodule();
            return None;
        }
        let name_tok = self.cur();
        let name = SmolStr::new(self.slice(name_tok.range));
        self.bump();
        let mut m = ModuleBuild::new(name, name_tok.range, start);

        self.skip_trivia_silent();
        // Parameter port list
        if self.at(SyntaxKind::Hash) {
            self.bump();
            self.skip_trivia_silent();
            if self.at(SyntaxKind::LParen) {
                self.skip_balanced_parens();
            }
            self.skip_trivia_silent();
        }
        // Header port list
        if self.at(SyntaxKind::LParen) {
            self.scan_header(&mut m);
        }
        // Header semicolon
        loop {
            self.drain_trivia(&mut m, DirectiveContext::Body);
            match self.cur().kind {
                SyntaxKind::Semicolon => {
                    self.bump();
                    break;
                }
                SyntaxKind::Eof | SyntaxKind::EndmoduleKw => break,
                _ => self.bump(),
            }
        }

        self.scan_body(&mut m);
        let end = if self.at(SyntaxKind::EndmoduleKw) {
            let e = self.cur().range.end();
            self.bump();
            e
        } else {
            self.cur().range.start()
        };
        Some(m.finish(end))
    }

    fn recover_to_endmodule(&mut self) {
        loop {
            match self.cur().kind {
                SyntaxKind::Eof => return,
                SyntaxKind::EndmoduleKw => {
                    self.bump();
                    return;
                }
                _ => self.bump(),
            }
        }
    }

    fn skip_balanced_parens(&mut self) {
        debug_assert!(self.at(SyntaxKind::LParen));
        let mut depth = 0i32;
        loop {
            match self.cur().kind {
                SyntaxKind::Eof => return,
                SyntaxKind::LParen => depth += 1,
                SyntaxKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        self.bump();
                        return;
                    }
                }
                _ => {}
            }
            self.bump();
        }
    }

    // Header port list

    fn scan_header(&mut self, m: &mut ModuleBuild) {
        let lparen = self.cur();
        self.bump();
        self.last_sig = None;
        let header_dir_start = m.directives.len();
        let mut depth = 0i32;
        let mut entry: Vec<Tok> = Vec::new();
        let mut inherited_dir: Option<PortDir> = None;
        // Offset of an AUTOARG directive in this header, if any.
        // Entries after it are stale generated text: their identifier
        // tokens are recorded but they declare nothing.
        let mut autoarg_at: Option<TextSize> = None;

        let rparen = loop {
            if self.cur().kind.is_trivia() {
                let before = m.directives.len();
                self.drain_trivia(m, DirectiveContext::HeaderParen);
                for d in &m.directives[before..] {
                    if d.kind == DirectiveKind::Autoarg && autoarg_at.is_none() {
                        autoarg_at = Some(d.comment_range.start());
                    }
                }
                continue;
            }
            let t = self.cur();
            match t.kind {
                SyntaxKind::Eof => break t,
                SyntaxKind::RParen if depth == 0 => {
                    self.bump();
                    break t;
                }
                SyntaxKind::LParen | SyntaxKind::LBracket | SyntaxKind::LBrace => {
                    depth += 1;
                    entry.push(t);
                    self.last_sig = Some(t.kind);
                    self.bump();
                }
                SyntaxKind::RParen | SyntaxKind::RBracket | SyntaxKind::RBrace => {
                    depth -= 1;
                    entry.push(t);
                    self.last_sig = Some(t.kind);
                    self.bump();
                }
                SyntaxKind::Comma if depth == 0 => {
                    self.flush_header_entry(m, &entry, &mut inherited_dir, autoarg_at);
                    entry.clear();
                    self.last_sig = Some(t.kind);
                    self.bump();
                }
                _ => {
                    if t.kind == SyntaxKind::Ident && depth == 0 {
                        m.header_tokens
                            .push((SmolStr::new(self.slice(t.range)), t.range.start()));
                    }
                    entry.push(t);
                    self.last_sig = Some(t.kind);
                    self.bump();
                }
            }
        };
        self.flush_header_entry(m, &entry, &mut inherited_dir, autoarg_at);
        m.header_paren = Some(TextRange::new(lparen.range.start(), rparen.range.end()));

        // Patch directive geometry that depends on the closing paren.
        // A directive's replacement region may not swallow another
        // directive's comment.
        let rp = rparen.range.start();
        let comment_starts: Vec<TextSize> = m.directives[header_dir_start..]
            .iter()
            .map(|d| d.comment_range.start())
            .collect();
        for d in &mut m.directives[header_dir_start..] {
            if d.context != DirectiveContext::HeaderParen {
                continue;
            }
            match d.kind {
                DirectiveKind::Autoarg => {
                    let end = comment_starts
                        .iter()
                        .copied()
                        .filter(|&s| s >= d.comment_range.end())
                        .min()
                        .unwrap_or(rp)
                        .min(rp)
                        .max(d.comment_range.end());
                    d.replace_range = TextRange::new(d.comment_range.start(), end);
                }
                _ => {
                    let tail = &self.text
                        [usize::from(d.replace_range.end())..usize::from(rp.max(d.replace_range.end()))];
                    d.has_trailing_content = tail.chars().any(|c| !c.is_whitespace());
                }
            }
        }
    }

    fn flush_header_entry(
        &mut self,
        m: &mut ModuleBuild,
        entry: &[Tok],
        inherited_dir: &mut Option<PortDir>,
        autoarg_at: Option<TextSize>,
    ) {
        if entry.is_empty() {
            return;
        }
        if let Some(at) = autoarg_at
            && entry[0].range.start() > at
        {
            return;
        }

        let mut i = 0usize;
        let dir = if let Some(d) = direction_of(entry[0].kind) {
            i += 1;
            *inherited_dir = Some(d);
            Some(d)
        } else {
            *inherited_dir
        };
        // Net/var/data-type keywords before dims and name
        while i < entry.len()
            && (entry[i].kind.is_net_type() || entry[i].kind.is_data_type())
        {
            i += 1;
        }
        let (packed, rest) = bracket_groups_in(entry, i, self.text);
        let mut i = rest;
        // User-defined type name directly before the declarator
        if i < entry.len()
            && entry[i].kind == SyntaxKind::Ident
            && entry[i + 1..]
                .iter()
                .any(|t| t.kind == SyntaxKind::Ident)
        {
            i += 1;
            let (_, rest) = bracket_groups_in(entry, i, self.text);
            i = rest;
        }
        if i >= entry.len() || entry[i].kind != SyntaxKind::Ident {
            return;
        }
        let name_tok = entry[i];
        let name = SmolStr::new(self.slice(name_tok.range));
        let (unpacked, _) = bracket_groups_in(entry, i + 1, self.text);

        let Some(dir) = dir else {
            // Bare name in a non-ANSI header: token only, no port.
            return;
        };
        let generated = name_tok.range.start() < m.gen_until;
        if !generated {
            m.mark_local(&name, |k| k.port = true);
            if entry.iter().any(|t| t.kind == SyntaxKind::RegKw) {
                m.mark_local(&name, |k| k.reg = true);
            }
        }
        m.upsert_port(name, dir, packed, unpacked, generated);
    }

    // Module body

    fn scan_body(&mut self, m: &mut ModuleBuild) {
        loop {
            self.drain_trivia(m, DirectiveContext::Body);
            let t = self.cur();
            match t.kind {
                SyntaxKind::Eof | SyntaxKind::EndmoduleKw => return,
                k if k.is_direction() => match direction_of(k) {
                    Some(dir) => self.scan_decl(m, DeclIntro::Port(dir)),
                    None => self.skip_statement(),
                },
                SyntaxKind::RegKw => self.scan_decl(m, DeclIntro::Reg),
                k if k.is_net_type() => self.scan_decl(m, DeclIntro::Net),
                k if k.is_data_type() => self.scan_decl(m, DeclIntro::Var),
                SyntaxKind::GenvarKw => self.scan_decl(m, DeclIntro::Var),
                SyntaxKind::FunctionKw => self.skip_until(SyntaxKind::EndfunctionKw),
                SyntaxKind::TaskKw => self.skip_until(SyntaxKind::EndtaskKw),
                SyntaxKind::GenerateKw | SyntaxKind::EndgenerateKw => self.bump(),
                SyntaxKind::Ident => {
                    if !self.try_instance(m) && !self.try_typed_decl(m) {
                        self.skip_statement();
                    }
                }
                _ => self.skip_statement(),
            }
        }
    }

    fn skip_until(&mut self, end: SyntaxKind) {
        loop {
            match self.cur().kind {
                SyntaxKind::Eof | SyntaxKind::EndmoduleKw => return,
                k if k == end => {
                    self.bump();
                    return;
                }
                _ => self.bump(),
            }
        }
    }

    /// Skip one statement or block, tolerating nesting. Leaves
    /// `endmodule` unconsumed.
    fn skip_statement(&mut self) {
        let mut depth = 0i32;
        let mut blocks = 0i32;
        loop {
            let t = self.cur();
            match t.kind {
                SyntaxKind::Eof | SyntaxKind::EndmoduleKw => return,
                SyntaxKind::LParen | SyntaxKind::LBracket | SyntaxKind::LBrace => {
                    depth += 1;
                    self.bump();
                }
                SyntaxKind::RParen | SyntaxKind::RBracket | SyntaxKind::RBrace => {
                    depth -= 1;
                    self.bump();
                }
                SyntaxKind::BeginKw
                | SyntaxKind::CaseKw
                | SyntaxKind::CasexKw
                | SyntaxKind::CasezKw
                | SyntaxKind::ForkKw => {
                    blocks += 1;
                    self.bump();
                }
                SyntaxKind::EndKw | SyntaxKind::EndcaseKw | SyntaxKind::JoinKw => {
                    blocks -= 1;
                    self.bump();
                    if blocks <= 0 && depth <= 0 {
                        // `end else ...` continues the statement.
                        let save = self.pos;
                        self.skip_trivia_silent();
                        if self.at(SyntaxKind::ElseKw) {
                            continue;
                        }
                        self.pos = save;
                        return;
                    }
                }
                SyntaxKind::Semicolon if depth <= 0 && blocks <= 0 => {
                    self.bump();
                    return;
                }
                _ => self.bump(),
            }
        }
    }

    /// Declaration statement: `intro [modifiers] [packed]* name
    /// [unpacked]* [= expr] {, name …};`
    fn scan_decl(&mut self, m: &mut ModuleBuild, intro: DeclIntro) {
        let mut is_reg = matches!(intro, DeclIntro::Reg);
        self.bump();
        self.skip_trivia_silent();
        while self.cur().kind.is_net_type() || self.cur().kind.is_data_type() {
            if self.at(SyntaxKind::RegKw) {
                is_reg = true;
            }
            self.bump();
            self.skip_trivia_silent();
        }
        let mut packed = self.bracket_groups();
        // User-defined type name before the declarator: `input my_t x;`
        if self.at(SyntaxKind::Ident) && self.next_significant_is_ident() {
            self.bump();
            packed = self.bracket_groups();
        }

        loop {
            self.skip_trivia_silent();
            if !self.at(SyntaxKind::Ident) {
                break;
            }
            let name_tok = self.cur();
            let name = SmolStr::new(self.slice(name_tok.range));
            self.bump();
            let unpacked = self.bracket_groups();
            let generated = name_tok.range.start() < m.gen_until;

            match intro {
                DeclIntro::Port(dir) => {
                    if !generated {
                        m.mark_local(&name, |k| k.port = true);
                        if is_reg {
                            m.mark_local(&name, |k| k.reg = true);
                        }
                    }
                    m.upsert_port(name, dir, packed.clone(), unpacked, generated);
                }
                DeclIntro::Net => {
                    if !generated {
                        m.mark_local(&name, |k| k.net = true);
                    }
                }
                DeclIntro::Reg => {
                    if !generated {
                        m.mark_local(&name, |k| k.reg = true);
                    }
                }
                DeclIntro::Var => {
                    if !generated {
                        m.mark_local(&name, |k| k.var = true);
                    }
                }
            }

            self.skip_trivia_silent();
            if self.at(SyntaxKind::Assign) {
                self.skip_initializer();
            }
            if self.at(SyntaxKind::Comma) {
                self.bump();
                continue;
            }
            break;
        }
        // Declaration terminator
        loop {
            match self.cur().kind {
                SyntaxKind::Eof | SyntaxKind::EndmoduleKw => return,
                SyntaxKind::Semicolon => {
                    self.bump();
                    return;
                }
                _ => self.bump(),
            }
        }
    }

    /// Whether the next significant token after the current one is an
    /// identifier. Pure lookahead.
    fn next_significant_is_ident(&self) -> bool {
        let mut i = self.pos + 1;
        while let Some(t) = self.toks.get(i) {
            if t.kind.is_trivia() {
                i += 1;
                continue;
            }
            return t.kind == SyntaxKind::Ident;
        }
        false
    }

    /// Skip `= expr` up to the next top-level comma or semicolon.
    fn skip_initializer(&mut self) {
        let mut depth = 0i32;
        loop {
            match self.cur().kind {
                SyntaxKind::Eof | SyntaxKind::EndmoduleKw => return,
                SyntaxKind::LParen | SyntaxKind::LBracket | SyntaxKind::LBrace => {
                    depth += 1;
                    self.bump();
                }
                SyntaxKind::RParen | SyntaxKind::RBracket | SyntaxKind::RBrace => {
                    depth -= 1;
                    self.bump();
                }
                SyntaxKind::Comma | SyntaxKind::Semicolon if depth <= 0 => return,
                _ => self.bump(),
            }
        }
    }

    /// Consecutive `[ … ]` groups at the cursor, as bracketed source
    /// text slices.
    fn bracket_groups(&mut self) -> SmallVec<[SmolStr; 1]> {
        let mut dims = SmallVec::new();
        loop {
            self.skip_trivia_silent();
            if !self.at(SyntaxKind::LBracket) {
                return dims;
            }
            let start = self.cur().range.start();
            let mut depth = 0i32;
            loop {
                match self.cur().kind {
                    SyntaxKind::Eof | SyntaxKind::EndmoduleKw => return dims,
                    SyntaxKind::LBracket => {
                        depth += 1;
                        self.bump();
                    }
                    SyntaxKind::RBracket => {
                        depth -= 1;
                        let end = self.cur().range.end();
                        self.bump();
                        if depth == 0 {
                            dims.push(SmolStr::new(
                                self.slice(TextRange::new(start, end)),
                            ));
                            break;
                        }
                    }
                    _ => self.bump(),
                }
            }
        }
    }

    // Instantiations

    /// Speculatively parse `mod [#(…)] inst ( … ) {, inst ( … )} ;`.
    /// Rolls the cursor back and returns false when the shape does not
    /// match. Nothing is recorded before the shape is certain.
    fn try_instance(&mut self, m: &mut ModuleBuild) -> bool {
        let save = self.pos;
        let mod_tok = self.cur();
        let module_name = SmolStr::new(self.slice(mod_tok.range));
        self.bump();
        self.skip_trivia_silent();
        if self.at(SyntaxKind::Hash) {
            self.bump();
            self.skip_trivia_silent();
            if !self.at(SyntaxKind::LParen) {
                self.pos = save;
                return false;
            }
            self.skip_balanced_parens();
            self.skip_trivia_silent();
        }
        loop {
            if !self.at(SyntaxKind::Ident) {
                self.pos = save;
                return false;
            }
            let name_tok = self.cur();
            let name = SmolStr::new(self.slice(name_tok.range));
            self.bump();
            self.skip_trivia_silent();
            // Instance array range: `bar b[3:0] ( … )`
            let _ = self.bracket_groups();
            if !self.at(SyntaxKind::LParen) {
                self.pos = save;
                return false;
            }
            self.scan_instance_args(m, module_name.clone(), name, name_tok.range);
            self.skip_trivia_silent();
            if self.at(SyntaxKind::Comma) {
                self.bump();
                self.skip_trivia_silent();
                continue;
            }
            break;
        }
        // Statement terminator
        loop {
            match self.cur().kind {
                SyntaxKind::Eof | SyntaxKind::EndmoduleKw => return true,
                SyntaxKind::Semicolon => {
                    self.bump();
                    return true;
                }
                _ => self.bump(),
            }
        }
    }

    fn scan_instance_args(
        &mut self,
        m: &mut ModuleBuild,
        module_name: SmolStr,
        name: SmolStr,
        name_range: TextRange,
    ) {
        let lparen = self.cur();
        self.bump();
        self.last_sig = None;
        let dir_start = m.directives.len();
        let mut connections = Vec::new();
        let mut depth = 0i32;

        let rparen = loop {
            if self.cur().kind.is_trivia() {
                self.drain_trivia(m, DirectiveContext::InstanceArgs);
                continue;
            }
            let t = self.cur();
            match t.kind {
                SyntaxKind::Eof => break t,
                SyntaxKind::RParen if depth == 0 => {
                    self.bump();
                    break t;
                }
                SyntaxKind::LParen | SyntaxKind::LBracket | SyntaxKind::LBrace => {
                    depth += 1;
                    self.last_sig = Some(t.kind);
                    self.bump();
                }
                SyntaxKind::RParen | SyntaxKind::RBracket | SyntaxKind::RBrace => {
                    depth -= 1;
                    self.last_sig = Some(t.kind);
                    self.bump();
                }
                SyntaxKind::Dot if depth == 0 => {
                    if let Some(conn) = self.scan_connection(m) {
                        connections.push(conn);
                    }
                }
                _ => {
                    self.last_sig = Some(t.kind);
                    self.bump();
                }
            }
        };

        let inst_idx = m.instances.len();
        let comment_starts: Vec<TextRange> = m.directives[dir_start..]
            .iter()
            .map(|d| d.comment_range)
            .collect();
        let mut autoinst = None;
        for (i, d) in m.directives.iter_mut().enumerate().skip(dir_start) {
            if d.kind == DirectiveKind::Autoinst && d.context == DirectiveContext::InstanceArgs {
                // Stop at the next directive comment: only the first
                // AUTOINST in an argument list owns the tail.
                let end = comment_starts
                    .iter()
                    .map(|r| r.start())
                    .filter(|&s| s >= d.comment_range.end())
                    .min()
                    .unwrap_or_else(|| rparen.range.start())
                    .min(rparen.range.start())
                    .max(d.comment_range.end());
                d.replace_range = TextRange::new(d.comment_range.start(), end);
                if autoinst.is_none() {
                    autoinst = Some(i);
                    d.instance = Some(inst_idx);
                }
            }
        }

        m.instances.push(Instance {
            module_name,
            name,
            name_range,
            paren_range: TextRange::new(lparen.range.start(), rparen.range.end()),
            connections,
            autoinst,
        });
    }

    /// `.port(expr)` or `.port` at the cursor (on the dot).
    fn scan_connection(&mut self, m: &mut ModuleBuild) -> Option<Connection> {
        let dot = self.cur();
        self.bump();
        self.drain_trivia(m, DirectiveContext::InstanceArgs);
        if !self.at(SyntaxKind::Ident) {
            self.last_sig = Some(dot.kind);
            return None;
        }
        let name_tok = self.cur();
        let port = SmolStr::new(self.slice(name_tok.range));
        self.bump();
        let mut end = name_tok.range.end();
        self.skip_trivia_silent();
        if self.at(SyntaxKind::LParen) {
            let mut depth = 0i32;
            loop {
                match self.cur().kind {
                    SyntaxKind::Eof | SyntaxKind::EndmoduleKw => break,
                    SyntaxKind::LParen => {
                        depth += 1;
                        self.bump();
                    }
                    SyntaxKind::RParen => {
                        depth -= 1;
                        end = self.cur().range.end();
                        self.bump();
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => self.bump(),
                }
            }
        }
        self.last_sig = Some(SyntaxKind::RParen);
        Some(Connection {
            port,
            range: TextRange::new(dot.range.start(), end),
        })
    }

    /// Speculatively parse `type_name [packed]* name [unpacked]*
    /// {, name …} ;` for user-typed variable declarations.
    fn try_typed_decl(&mut self, m: &mut ModuleBuild) -> bool {
        let save = self.pos;
        self.bump(); // type name
        self.skip_trivia_silent();
        let _ = self.bracket_groups();
        let mut names: Vec<(SmolStr, TextSize)> = Vec::new();
        loop {
            if !self.at(SyntaxKind::Ident) {
                self.pos = save;
                return false;
            }
            let t = self.cur();
            names.push((SmolStr::new(self.slice(t.range)), t.range.start()));
            self.bump();
            let _ = self.bracket_groups();
            self.skip_trivia_silent();
            if self.at(SyntaxKind::Assign) {
                self.skip_initializer();
            }
            match self.cur().kind {
                SyntaxKind::Comma => {
                    self.bump();
                    self.skip_trivia_silent();
                }
                SyntaxKind::Semicolon => {
                    self.bump();
                    break;
                }
                _ => {
                    self.pos = save;
                    return false;
                }
            }
        }
        for (name, start) in names {
            if start >= m.gen_until {
                m.mark_local(&name, |k| k.var = true);
            }
        }
        true
    }
}

fn direction_of(kind: SyntaxKind) -> Option<PortDir> {
    match kind {
        SyntaxKind::InputKw => Some(PortDir::Input),
        SyntaxKind::OutputKw => Some(PortDir::Output),
        SyntaxKind::InoutKw => Some(PortDir::Inout),
        _ => None,
    }
}

/// Collect consecutive bracket groups from `toks[from..]`, returning
/// the dimension slices and the index past the last group.
fn bracket_groups_in(
    toks: &[Tok],
    from: usize,
    text: &str,
) -> (SmallVec<[SmolStr; 1]>, usize) {
    let mut dims = SmallVec::new();
    let mut i = from;
    while i < toks.len() && toks[i].kind == SyntaxKind::LBracket {
        let start = toks[i].range.start();
        let mut depth = 0i32;
        let mut end = toks[i].range.end();
        while i < toks.len() {
            match toks[i].kind {
                SyntaxKind::LBracket => depth += 1,
                SyntaxKind::RBracket => {
                    depth -= 1;
                    if depth == 0 {
                        end = toks[i].range.end();
                        i += 1;
                        break;
                    }
                }
                _ => {}
            }
            end = toks[i].range.end();
            i += 1;
        }
        dims.push(SmolStr::new(&text[usize::from(start)..usize::from(end)]));
    }
    (dims, i)
}
