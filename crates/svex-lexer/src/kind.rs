/// Token kinds for the surface lexer.
///
/// This is deliberately far from a full IEEE 1800 token set: the
/// engine reads module surfaces (headers, declarations, instances,
/// comments), so only structural punctuation and the declaration
/// keywords are distinguished. Every other operator lexes as `Op`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    // Trivia
    Whitespace,
    LineComment,
    BlockComment,

    // Atoms
    Ident,
    SystemIdent,
    Number,
    BasedLiteral,
    Str,
    CompilerDirective,

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Semicolon,
    Comma,
    Dot,
    Colon,
    Hash,
    Assign,
    At,
    /// Any operator character the surface scanner does not care about.
    Op,

    // Declaration keywords
    ModuleKw,
    MacromoduleKw,
    EndmoduleKw,
    InputKw,
    OutputKw,
    InoutKw,
    RefKw,
    WireKw,
    RegKw,
    LogicKw,
    BitKw,
    ByteKw,
    IntKw,
    IntegerKw,
    ShortintKw,
    LongintKw,
    RealKw,
    ShortrealKw,
    TimeKw,
    SignedKw,
    UnsignedKw,
    VarKw,
    GenvarKw,
    ParameterKw,
    LocalparamKw,
    DefparamKw,
    TypedefKw,
    EnumKw,
    StructKw,
    UnionKw,
    PackedKw,

    // Net keywords beyond `wire`
    TriKw,
    Tri0Kw,
    Tri1Kw,
    TriandKw,
    TriorKw,
    TriregKw,
    WandKw,
    WorKw,
    UwireKw,
    Supply0Kw,
    Supply1Kw,

    // Structure keywords the scanner skips over
    AssignKw,
    FunctionKw,
    EndfunctionKw,
    TaskKw,
    EndtaskKw,
    BeginKw,
    EndKw,
    IfKw,
    ElseKw,
    ForKw,
    WhileKw,
    RepeatKw,
    ForeverKw,
    CaseKw,
    CasexKw,
    CasezKw,
    EndcaseKw,
    ForkKw,
    JoinKw,
    DefaultKw,
    GenerateKw,
    EndgenerateKw,
    InitialKw,
    FinalKw,
    AlwaysKw,
    AlwaysCombKw,
    AlwaysFfKw,
    AlwaysLatchKw,
    PosedgeKw,
    NegedgeKw,
    WaitKw,
    DisableKw,
    ReturnKw,
    BreakKw,
    ContinueKw,
    InterfaceKw,
    EndinterfaceKw,
    ModportKw,
    PackageKw,
    EndpackageKw,
    ImportKw,
    ExportKw,
    ProgramKw,
    EndprogramKw,
    PrimitiveKw,
    EndprimitiveKw,
    ConfigKw,
    EndconfigKw,
    ClassKw,
    EndclassKw,
    SpecifyKw,
    EndspecifyKw,

    Error,
    Eof,
}

impl SyntaxKind {
    /// Trivia tokens carry no structure.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::Whitespace | SyntaxKind::LineComment | SyntaxKind::BlockComment
        )
    }

    /// Port direction keywords.
    pub fn is_direction(self) -> bool {
        matches!(
            self,
            SyntaxKind::InputKw | SyntaxKind::OutputKw | SyntaxKind::InoutKw
        )
    }

    /// Net-type keywords (`wire` and friends).
    pub fn is_net_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::WireKw
                | SyntaxKind::TriKw
                | SyntaxKind::Tri0Kw
                | SyntaxKind::Tri1Kw
                | SyntaxKind::TriandKw
                | SyntaxKind::TriorKw
                | SyntaxKind::TriregKw
                | SyntaxKind::WandKw
                | SyntaxKind::WorKw
                | SyntaxKind::UwireKw
                | SyntaxKind::Supply0Kw
                | SyntaxKind::Supply1Kw
        )
    }

    /// Data-type keywords that may follow a direction or net type in a
    /// declaration before the declarator name.
    pub fn is_data_type(self) -> bool {
        matches!(
            self,
            SyntaxKind::LogicKw
                | SyntaxKind::BitKw
                | SyntaxKind::ByteKw
                | SyntaxKind::IntKw
                | SyntaxKind::IntegerKw
                | SyntaxKind::ShortintKw
                | SyntaxKind::LongintKw
                | SyntaxKind::RealKw
                | SyntaxKind::ShortrealKw
                | SyntaxKind::TimeKw
                | SyntaxKind::RegKw
                | SyntaxKind::SignedKw
                | SyntaxKind::UnsignedKw
                | SyntaxKind::VarKw
        )
    }
}
