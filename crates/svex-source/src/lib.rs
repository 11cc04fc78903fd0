pub use text_size::{TextRange, TextSize};

mod line_index;
pub use line_index::{LineCol, LineIndex, Utf16LineCol};

/// Opaque handle to a registered source file.
///
/// Files are registered with the project in a fixed order; the id is
/// the registration index. Lookup tiebreaks rely on that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);
