use crate::SyntaxKind;

/// Classify an identifier string as a keyword or plain `Ident`.
///
/// Only the keywords the surface scanner distinguishes are classified;
/// every other reserved word of IEEE 1800 lexes as `Ident`, which is
/// harmless because the scanner skips statements it does not
/// recognise.
///
/// Uses a length prefilter to skip irrelevant match arms.
pub(crate) fn classify_keyword(word: &str) -> SyntaxKind {
    match word.len() {
        2 => classify_2(word),
        3 => classify_3(word),
        4 => classify_4(word),
        5 => classify_5(word),
        6 => classify_6(word),
        7 => classify_7(word),
        8 => classify_8(word),
        9 => classify_9(word),
        10 => classify_10(word),
        11.. => classify_long(word),
        _ => SyntaxKind::Ident,
    }
}

fn classify_2(w: &str) -> SyntaxKind {
    match w {
        "if" => SyntaxKind::IfKw,
        _ => SyntaxKind::Ident,
    }
}

fn classify_3(w: &str) -> SyntaxKind {
    match w {
        "bit" => SyntaxKind::BitKw,
        "end" => SyntaxKind::EndKw,
        "for" => SyntaxKind::ForKw,
        "int" => SyntaxKind::IntKw,
        "ref" => SyntaxKind::RefKw,
        "reg" => SyntaxKind::RegKw,
        "tri" => SyntaxKind::TriKw,
        "var" => SyntaxKind::VarKw,
        "wor" => SyntaxKind::WorKw,
        _ => SyntaxKind::Ident,
    }
}

fn classify_4(w: &str) -> SyntaxKind {
    match w {
        "byte" => SyntaxKind::ByteKw,
        "case" => SyntaxKind::CaseKw,
        "else" => SyntaxKind::ElseKw,
        "enum" => SyntaxKind::EnumKw,
        "fork" => SyntaxKind::ForkKw,
        "join" => SyntaxKind::JoinKw,
        "real" => SyntaxKind::RealKw,
        "task" => SyntaxKind::TaskKw,
        "time" => SyntaxKind::TimeKw,
        "tri0" => SyntaxKind::Tri0Kw,
        "tri1" => SyntaxKind::Tri1Kw,
        "wait" => SyntaxKind::WaitKw,
        "wand" => SyntaxKind::WandKw,
        "wire" => SyntaxKind::WireKw,
        _ => SyntaxKind::Ident,
    }
}

fn classify_5(w: &str) -> SyntaxKind {
    match w {
        "begin" => SyntaxKind::BeginKw,
        "break" => SyntaxKind::BreakKw,
        "casex" => SyntaxKind::CasexKw,
        "casez" => SyntaxKind::CasezKw,
        "class" => SyntaxKind::ClassKw,
        "final" => SyntaxKind::FinalKw,
        "input" => SyntaxKind::InputKw,
        "inout" => SyntaxKind::InoutKw,
        "logic" => SyntaxKind::LogicKw,
        "trior" => SyntaxKind::TriorKw,
        "uwire" => SyntaxKind::UwireKw,
        "while" => SyntaxKind::WhileKw,
        _ => SyntaxKind::Ident,
    }
}

fn classify_6(w: &str) -> SyntaxKind {
    match w {
        "always" => SyntaxKind::AlwaysKw,
        "assign" => SyntaxKind::AssignKw,
        "config" => SyntaxKind::ConfigKw,
        "export" => SyntaxKind::ExportKw,
        "genvar" => SyntaxKind::GenvarKw,
        "import" => SyntaxKind::ImportKw,
        "module" => SyntaxKind::ModuleKw,
        "output" => SyntaxKind::OutputKw,
        "packed" => SyntaxKind::PackedKw,
        "repeat" => SyntaxKind::RepeatKw,
        "return" => SyntaxKind::ReturnKw,
        "signed" => SyntaxKind::SignedKw,
        "struct" => SyntaxKind::StructKw,
        "triand" => SyntaxKind::TriandKw,
        "trireg" => SyntaxKind::TriregKw,
        _ => SyntaxKind::Ident,
    }
}

fn classify_7(w: &str) -> SyntaxKind {
    match w {
        "default" => SyntaxKind::DefaultKw,
        "disable" => SyntaxKind::DisableKw,
        "endcase" => SyntaxKind::EndcaseKw,
        "endtask" => SyntaxKind::EndtaskKw,
        "forever" => SyntaxKind::ForeverKw,
        "initial" => SyntaxKind::InitialKw,
        "integer" => SyntaxKind::IntegerKw,
        "longint" => SyntaxKind::LongintKw,
        "modport" => SyntaxKind::ModportKw,
        "negedge" => SyntaxKind::NegedgeKw,
        "package" => SyntaxKind::PackageKw,
        "posedge" => SyntaxKind::PosedgeKw,
        "program" => SyntaxKind::ProgramKw,
        "specify" => SyntaxKind::SpecifyKw,
        "supply0" => SyntaxKind::Supply0Kw,
        "supply1" => SyntaxKind::Supply1Kw,
        "typedef" => SyntaxKind::TypedefKw,
        _ => SyntaxKind::Ident,
    }
}

fn classify_8(w: &str) -> SyntaxKind {
    match w {
        "continue" => SyntaxKind::ContinueKw,
        "defparam" => SyntaxKind::DefparamKw,
        "endclass" => SyntaxKind::EndclassKw,
        "function" => SyntaxKind::FunctionKw,
        "generate" => SyntaxKind::GenerateKw,
        "shortint" => SyntaxKind::ShortintKw,
        "unsigned" => SyntaxKind::UnsignedKw,
        _ => SyntaxKind::Ident,
    }
}

fn classify_9(w: &str) -> SyntaxKind {
    match w {
        "always_ff" => SyntaxKind::AlwaysFfKw,
        "endconfig" => SyntaxKind::EndconfigKw,
        "endmodule" => SyntaxKind::EndmoduleKw,
        "interface" => SyntaxKind::InterfaceKw,
        "parameter" => SyntaxKind::ParameterKw,
        "primitive" => SyntaxKind::PrimitiveKw,
        "shortreal" => SyntaxKind::ShortrealKw,
        _ => SyntaxKind::Ident,
    }
}

fn classify_10(w: &str) -> SyntaxKind {
    match w {
        "endpackage" => SyntaxKind::EndpackageKw,
        "endprogram" => SyntaxKind::EndprogramKw,
        "endspecify" => SyntaxKind::EndspecifyKw,
        "localparam" => SyntaxKind::LocalparamKw,
        _ => SyntaxKind::Ident,
    }
}

fn classify_long(w: &str) -> SyntaxKind {
    match w {
        "always_comb" => SyntaxKind::AlwaysCombKw,
        "always_latch" => SyntaxKind::AlwaysLatchKw,
        "endfunction" => SyntaxKind::EndfunctionKw,
        "endgenerate" => SyntaxKind::EndgenerateKw,
        "endinterface" => SyntaxKind::EndinterfaceKw,
        "endprimitive" => SyntaxKind::EndprimitiveKw,
        "macromodule" => SyntaxKind::MacromoduleKw,
        _ => SyntaxKind::Ident,
    }
}
