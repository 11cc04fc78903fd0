use svex_source::TextRange;

/// The seven AUTO directive kinds the engine expands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    Autoarg,
    Autoinst,
    Autoinput,
    Autooutput,
    Autoinout,
    Autowire,
    Autoreg,
}

/// Closing sentinel shared by all generated blocks.
pub const END_SENTINEL: &str = "// End of automatics";

impl DirectiveKind {
    /// All kinds, in a fixed order used for code-action enumeration.
    pub const ALL: [DirectiveKind; 7] = [
        DirectiveKind::Autoarg,
        DirectiveKind::Autoinst,
        DirectiveKind::Autoinput,
        DirectiveKind::Autooutput,
        DirectiveKind::Autoinout,
        DirectiveKind::Autowire,
        DirectiveKind::Autoreg,
    ];

    /// Recognise a `/*AUTO…*/` comment. `text` is the full comment
    /// including delimiters.
    pub fn from_comment(text: &str) -> Option<Self> {
        let inner = text
            .strip_prefix("/*")?
            .strip_suffix("*/")?
            .trim();
        match inner {
            "AUTOARG" => Some(Self::Autoarg),
            "AUTOINST" => Some(Self::Autoinst),
            "AUTOINPUT" => Some(Self::Autoinput),
            "AUTOOUTPUT" => Some(Self::Autooutput),
            "AUTOINOUT" => Some(Self::Autoinout),
            "AUTOWIRE" => Some(Self::Autowire),
            "AUTOREG" => Some(Self::Autoreg),
            _ => None,
        }
    }

    /// Directive name as written in the comment.
    pub fn name(self) -> &'static str {
        match self {
            Self::Autoarg => "AUTOARG",
            Self::Autoinst => "AUTOINST",
            Self::Autoinput => "AUTOINPUT",
            Self::Autooutput => "AUTOOUTPUT",
            Self::Autoinout => "AUTOINOUT",
            Self::Autowire => "AUTOWIRE",
            Self::Autoreg => "AUTOREG",
        }
    }

    /// Opening sentinel of this kind's generated block, or `None` for
    /// the kinds whose replacement region is paren-bounded instead.
    pub fn begin_sentinel(self) -> Option<&'static str> {
        match self {
            Self::Autoarg | Self::Autoinst => None,
            Self::Autoinput => Some("// Beginning of automatic inputs (from autoinst inputs)"),
            Self::Autooutput => Some("// Beginning of automatic outputs (from autoinst outputs)"),
            Self::Autoinout => Some("// Beginning of automatic inouts (from autoinst inouts)"),
            Self::Autowire => {
                Some("// Beginning of automatic wires (for undeclared instantiated-module outputs)")
            }
            Self::Autoreg => {
                Some("// Beginning of automatic regs (for this module's undeclared outputs)")
            }
        }
    }
}

/// Where a directive comment sits. Validity per kind is the
/// expander's concern; the scanner only records position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveContext {
    HeaderParen,
    Body,
    InstanceArgs,
}

/// An AUTO directive occurrence with its replacement geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub kind: DirectiveKind,
    pub context: DirectiveContext,
    /// The `/*AUTO…*/` comment itself.
    pub comment_range: TextRange,
    /// Comment plus the trailing generated region this expansion owns:
    /// the sentinel block for declaration kinds, everything up to the
    /// closing paren for AUTOARG/AUTOINST.
    pub replace_range: TextRange,
    /// AUTOARG/AUTOINST: a significant token precedes the comment
    /// inside the parens and it is not a comma, so the generated list
    /// must open with one.
    pub needs_leading_comma: bool,
    /// Header-paren declaration directives: non-whitespace content
    /// follows the replacement region before the closing paren, so the
    /// final generated entry keeps its comma.
    pub has_trailing_content: bool,
    /// Index into the owning module's instance list, for AUTOINST.
    pub instance: Option<usize>,
}
