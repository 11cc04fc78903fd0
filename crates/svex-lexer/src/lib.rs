mod keywords;
mod kind;

pub use kind::SyntaxKind;

use svex_source::TextSize;

/// A lexed token (kind + length).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub len: TextSize,
}

/// Lex the full source string into a list of tokens (including trivia).
///
/// Never fails: bytes that fit nothing lex as one-byte `Error` tokens.
/// The concatenated token lengths always cover the input exactly.
pub fn lex(src: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut rest = src;

    while !rest.is_empty() {
        let (kind, consumed) = lex_one(rest);
        tokens.push(Token {
            kind,
            len: TextSize::new(consumed as u32),
        });
        rest = &rest[consumed..];
    }

    tokens.push(Token {
        kind: SyntaxKind::Eof,
        len: TextSize::new(0),
    });
    tokens
}

fn lex_one(s: &str) -> (SyntaxKind, usize) {
    let bytes = s.as_bytes();
    let c = bytes[0];

    // Whitespace
    if c.is_ascii_whitespace() {
        let n = bytes.iter().take_while(|b| b.is_ascii_whitespace()).count();
        return (SyntaxKind::Whitespace, n);
    }

    // Line comment
    if c == b'/' && bytes.get(1) == Some(&b'/') {
        let n = bytes.iter().take_while(|&&b| b != b'\n').count();
        return (SyntaxKind::LineComment, n);
    }

    // Block comment (unterminated runs to end of input)
    if c == b'/' && bytes.get(1) == Some(&b'*') {
        let end = s[2..].find("*/").map_or(s.len(), |i| i + 4);
        return (SyntaxKind::BlockComment, end);
    }

    // String literal
    if c == b'"' {
        return lex_string(bytes);
    }

    // Tick: based literal ('b101, 'hFF), unbased unsized ('0, '1, 'z),
    // or tick-brace. Lexed atomically so brackets inside sized
    // literals cannot confuse depth tracking.
    if c == b'\'' {
        return lex_tick(bytes);
    }

    // Numeric literal
    if c.is_ascii_digit() {
        let n = bytes
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_' || **b == b'.')
            .count();
        return (SyntaxKind::Number, n);
    }

    // Escaped identifier: backslash to next whitespace
    if c == b'\\' {
        let n = bytes
            .iter()
            .take_while(|b| !b.is_ascii_whitespace())
            .count();
        return (SyntaxKind::Ident, n);
    }

    // System identifier ($display, $finish)
    if c == b'$' {
        let n = bytes
            .iter()
            .skip(1)
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_' || **b == b'$')
            .count();
        if n > 0 {
            return (SyntaxKind::SystemIdent, n + 1);
        }
        return (SyntaxKind::Op, 1);
    }

    // Compiler directive (`define, `ifdef, ...)
    if c == b'`' {
        let n = bytes
            .iter()
            .skip(1)
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
            .count();
        return (SyntaxKind::CompilerDirective, n + 1);
    }

    // Identifier / keyword
    if c.is_ascii_alphabetic() || c == b'_' {
        let n = bytes
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_' || **b == b'$')
            .count();
        let kind = keywords::classify_keyword(&s[..n]);
        return (kind, n);
    }

    // Structural punctuation
    let kind = match c {
        b'(' => SyntaxKind::LParen,
        b')' => SyntaxKind::RParen,
        b'[' => SyntaxKind::LBracket,
        b']' => SyntaxKind::RBracket,
        b'{' => SyntaxKind::LBrace,
        b'}' => SyntaxKind::RBrace,
        b';' => SyntaxKind::Semicolon,
        b',' => SyntaxKind::Comma,
        b'.' => SyntaxKind::Dot,
        b':' => SyntaxKind::Colon,
        b'#' => SyntaxKind::Hash,
        b'=' => SyntaxKind::Assign,
        b'@' => SyntaxKind::At,
        b'+' | b'-' | b'*' | b'/' | b'%' | b'&' | b'|' | b'^' | b'~' | b'!' | b'<' | b'>'
        | b'?' => SyntaxKind::Op,
        _ => SyntaxKind::Error,
    };
    (kind, 1)
}

fn lex_string(bytes: &[u8]) -> (SyntaxKind, usize) {
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() => i += 2,
            b'"' => return (SyntaxKind::Str, i + 1),
            _ => i += 1,
        }
    }
    (SyntaxKind::Str, bytes.len())
}

fn lex_tick(bytes: &[u8]) -> (SyntaxKind, usize) {
    match bytes.get(1) {
        // '{ assignment pattern opener: leave the brace for the
        // depth tracker.
        Some(b'{') => (SyntaxKind::Op, 1),
        Some(b) if b.is_ascii_alphanumeric() => {
            // Base char plus digits/xz/_ (possibly signed: 'sb01)
            let n = bytes
                .iter()
                .skip(1)
                .take_while(|b| b.is_ascii_alphanumeric() || **b == b'_')
                .count();
            (SyntaxKind::BasedLiteral, n + 1)
        }
        _ => (SyntaxKind::Op, 1),
    }
}
