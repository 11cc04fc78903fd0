//! Code-action façade over the AUTO-expansion engine.
//!
//! Converts the engine's byte-range edits into `lsp_types::TextEdit`s
//! (zero-based lines, UTF-16 code-unit columns) and groups them into
//! the named actions the language server advertises. The outer
//! adapter owns document URIs and workspace-edit assembly.

use lsp_types::{Position, Range, TextEdit};
use svex_expand::{
    SourceEdit, expand_file, expand_kind_in_range, expand_range, kinds_in_range,
};
use svex_project::Project;
use svex_source::{FileId, LineCol, LineIndex, TextRange, TextSize};
use svex_surface::DirectiveKind;

pub const EXPAND_ALL_TITLE: &str = "Expand all AUTOs in file";
pub const EXPAND_RANGE_TITLE: &str = "Expand all AUTOs in selected range";

/// Title of the per-kind action, e.g. `"Expand AUTOARG"`.
pub fn kind_title(kind: DirectiveKind) -> String {
    format!("Expand {}", kind.name())
}

/// A named group of text edits, ready for the LSP adapter to wrap in
/// a protocol code action.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandAction {
    pub title: String,
    pub edits: Vec<TextEdit>,
}

/// Compute the AUTO-expansion code actions for a cursor range.
///
/// The file-scoped action runs the engine's bounded fixed point; the
/// range-scoped and per-kind actions run a single pass over the
/// directives whose span touches the selected lines (line numbers
/// shift after the first expansion, so composing passes under a range
/// is not meaningful).
pub fn code_actions(project: &Project, file: FileId, range: Range) -> Vec<ExpandAction> {
    let Some(pf) = project.file(file) else {
        return Vec::new();
    };
    let index = LineIndex::new(&pf.text);
    let selection = line_span(&index, &pf.text, range);
    tracing::debug!(
        file = file.0,
        start_line = range.start.line,
        end_line = range.end.line,
        "computing AUTO expansion code actions"
    );

    let mut actions = Vec::new();
    let file_edits = expand_file(project, file);
    if !file_edits.is_empty() {
        actions.push(ExpandAction {
            title: EXPAND_ALL_TITLE.to_string(),
            edits: to_lsp_edits(&index, &file_edits),
        });
    }
    let range_edits = expand_range(project, file, selection);
    if !range_edits.is_empty() {
        actions.push(ExpandAction {
            title: EXPAND_RANGE_TITLE.to_string(),
            edits: to_lsp_edits(&index, &range_edits),
        });
    }
    for kind in kinds_in_range(project, file, selection) {
        let edits = expand_kind_in_range(project, file, selection, kind);
        if !edits.is_empty() {
            actions.push(ExpandAction {
                title: kind_title(kind),
                edits: to_lsp_edits(&index, &edits),
            });
        }
    }
    tracing::debug!(count = actions.len(), "AUTO expansion actions ready");
    actions
}

/// Convert engine edits to protocol edits, preserving the engine's
/// back-to-front order so clients can apply them in sequence.
pub fn to_lsp_edits(index: &LineIndex, edits: &[SourceEdit]) -> Vec<TextEdit> {
    edits
        .iter()
        .map(|e| TextEdit {
            range: Range {
                start: position(index, e.range.start()),
                end: position(index, e.range.end()),
            },
            new_text: e.replacement.clone(),
        })
        .collect()
}

fn position(index: &LineIndex, offset: TextSize) -> Position {
    let lc = index.line_col(offset);
    let wide = index.to_utf16(lc);
    Position {
        line: wide.line,
        character: wide.col,
    }
}

/// Widen a protocol range to whole lines and return it in byte
/// coordinates. A selection touching any part of a line selects every
/// directive on it.
fn line_span(index: &LineIndex, text: &str, range: Range) -> TextRange {
    let eof = TextSize::of(text);
    let start = index
        .offset(LineCol {
            line: range.start.line,
            col: 0,
        })
        .unwrap_or(TextSize::new(0));
    let end = index
        .offset(LineCol {
            line: range.end.line + 1,
            col: 0,
        })
        .unwrap_or(eof);
    TextRange::new(start, end.max(start))
}
