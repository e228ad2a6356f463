//! Tokenizer for Swift-style declaration source.
//!
//! Uses Logos. Keywords are not separate tokens: the parser matches on
//! identifier text, since most of the words it cares about (`get`, `lazy`,
//! `open`, ...) are contextual anyway.

use logos::Logos;
use protocol_mirror::Span;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token<'src> {
    // === Trivia ===
    #[regex(r"//[^\n]*", logos::skip)]
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/", logos::skip)]
    Comment,

    /// `#if`, `#elseif`, `#else` or `#endif`, condition included.
    #[regex(r"#(if|elseif|else|endif)[^\n]*", directive)]
    Directive(Directive),

    // === Names ===
    #[regex(r"[\p{XID_Start}_]\p{XID_Continue}*", |lex| lex.slice())]
    #[regex(r"`[^`\n]+`", |lex| lex.slice())]
    #[regex(r"\$\p{XID_Continue}+", |lex| lex.slice())]
    Ident(&'src str),

    /// `@name`, without the `@`.
    #[regex(r"@[\p{XID_Start}_]\p{XID_Continue}*", |lex| &lex.slice()[1..])]
    Attribute(&'src str),

    // === Literals ===
    #[regex(r"0x[0-9a-fA-F_]+", |lex| lex.slice())]
    #[regex(r"0o[0-7_]+", |lex| lex.slice())]
    #[regex(r"0b[01_]+", |lex| lex.slice())]
    #[regex(r"[0-9][0-9_]*", |lex| lex.slice())]
    Integer(&'src str),

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?", |lex| lex.slice())]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9_]+", |lex| lex.slice())]
    Float(&'src str),

    /// Any string literal form, quotes included. The opening delimiter is
    /// matched here and the body by [`string_literal`].
    #[regex(r#"#*""#, string_literal)]
    String(&'src str),

    // === Punctuation ===
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(";")]
    Semi,
    #[token("=")]
    Eq,
    #[token("->")]
    Arrow,
    #[token("?")]
    Question,
    #[token("!")]
    Bang,
    #[token("&")]
    Amp,
    #[token("-")]
    Minus,
    #[token("#")]
    Hash,
    #[token("\\")]
    Backslash,

    /// Remaining operator characters; only ever skipped.
    #[regex(r"[+*/%^|~]")]
    Operator,
}

impl Token<'_> {
    /// Short description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(name) => (*name).to_string(),
            Token::Attribute(name) => format!("@{name}"),
            Token::Integer(text) | Token::Float(text) | Token::String(text) => (*text).to_string(),
            Token::Comment => "comment".to_string(),
            Token::Directive(directive) => directive.to_string(),
            Token::LBrace => "{".to_string(),
            Token::RBrace => "}".to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::LBracket => "[".to_string(),
            Token::RBracket => "]".to_string(),
            Token::Lt => "<".to_string(),
            Token::Gt => ">".to_string(),
            Token::Colon => ":".to_string(),
            Token::Comma => ",".to_string(),
            Token::Dot => ".".to_string(),
            Token::Semi => ";".to_string(),
            Token::Eq => "=".to_string(),
            Token::Arrow => "->".to_string(),
            Token::Question => "?".to_string(),
            Token::Bang => "!".to_string(),
            Token::Amp => "&".to_string(),
            Token::Minus => "-".to_string(),
            Token::Hash => "#".to_string(),
            Token::Backslash => "\\".to_string(),
            Token::Operator => "operator".to_string(),
        }
    }

    pub fn is_ident(&self, text: &str) -> bool {
        matches!(self, Token::Ident(name) if *name == text)
    }
}

/// Conditional compilation directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Directive {
    #[strum(serialize = "#if")]
    If,
    #[strum(serialize = "#elseif")]
    ElseIf,
    #[strum(serialize = "#else")]
    Else,
    #[strum(serialize = "#endif")]
    EndIf,
}

fn directive<'src>(lex: &mut logos::Lexer<'src, Token<'src>>) -> Option<Directive> {
    let word = lex.slice()[1..]
        .split(|c: char| !c.is_ascii_alphabetic())
        .next()?;
    match word {
        "if" => Some(Directive::If),
        "elseif" => Some(Directive::ElseIf),
        "else" => Some(Directive::Else),
        "endif" => Some(Directive::EndIf),
        _ => None,
    }
}

fn string_literal<'src>(lex: &mut logos::Lexer<'src, Token<'src>>) -> Option<&'src str> {
    let rest = lex.source().get(lex.span().start..)?;
    let len = string_len(rest)?;
    lex.bump(len.checked_sub(lex.slice().len())?);
    Some(lex.slice())
}

/// Byte length of the string literal at the start of `text`: plain,
/// multi-line (`"""`) or raw (`#"..."#`), with `\( ... )` interpolations
/// that may themselves contain strings.
fn string_len(text: &str) -> Option<usize> {
    let hashes = text.bytes().take_while(|&b| b == b'#').count();
    let body = text.get(hashes..)?;
    let quote = if body.starts_with(r#"""""#) {
        r#"""""#
    } else if body.starts_with('"') {
        "\""
    } else {
        return None;
    };
    let multiline = quote.len() == 3;
    let pounds = "#".repeat(hashes);
    let closing = format!("{quote}{pounds}");
    let escape = format!("\\{pounds}");

    let mut i = hashes + quote.len();
    while let Some(rest) = text.get(i..).filter(|rest| !rest.is_empty()) {
        if rest.starts_with(&closing) {
            return Some(i + closing.len());
        }
        if let Some(escaped) = rest.strip_prefix(&escape) {
            let len = if escaped.starts_with('(') {
                interpolation_len(escaped)?
            } else {
                escaped.chars().next()?.len_utf8()
            };
            i += escape.len() + len;
            continue;
        }
        let ch = rest.chars().next()?;
        if ch == '\n' && !multiline {
            return None;
        }
        i += ch.len_utf8();
    }
    None
}

/// Byte length of the parenthesized expression at the start of `text`.
fn interpolation_len(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = 0;
    while let Some(rest) = text.get(i..).filter(|rest| !rest.is_empty()) {
        if rest.trim_start_matches('#').starts_with('"') {
            i += string_len(rest)?;
            continue;
        }
        let ch = rest.chars().next()?;
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
        i += ch.len_utf8();
    }
    None
}

/// A token with its source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spanned<T> {
    pub token: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(token: T, span: Span) -> Self {
        Self { token, span }
    }
}

/// Error during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unexpected character(s) `{slice}`")]
pub struct LexError {
    pub span: Span,
    pub slice: String,
}

/// Tokenize source code into a vector of spanned tokens.
pub fn lex(source: &str) -> Result<Vec<Spanned<Token<'_>>>, LexError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => {
                if !matches!(token, Token::Comment) {
                    tokens.push(Spanned::new(token, lexer.span().into()));
                }
            }
            Err(()) => {
                return Err(LexError {
                    span: lexer.span().into(),
                    slice: lexer.slice().to_string(),
                });
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token<'_>> {
        lex(source).unwrap().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn test_member_declaration() {
        assert_eq!(
            tokens("public var name: String = \"x\""),
            vec![
                Token::Ident("public"),
                Token::Ident("var"),
                Token::Ident("name"),
                Token::Colon,
                Token::Ident("String"),
                Token::Eq,
                Token::String("\"x\""),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens("42 1_000 0xFF 3.14 1e10"),
            vec![
                Token::Integer("42"),
                Token::Integer("1_000"),
                Token::Integer("0xFF"),
                Token::Float("3.14"),
                Token::Float("1e10"),
            ]
        );
    }

    #[test]
    fn test_function_type() {
        assert_eq!(
            tokens("(_ id: Int) async throws -> User"),
            vec![
                Token::LParen,
                Token::Ident("_"),
                Token::Ident("id"),
                Token::Colon,
                Token::Ident("Int"),
                Token::RParen,
                Token::Ident("async"),
                Token::Ident("throws"),
                Token::Arrow,
                Token::Ident("User"),
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let source = "// line\n/* block\n * more */\n@ProtocolMirror\nstruct";
        assert_eq!(
            tokens(source),
            vec![Token::Attribute("ProtocolMirror"), Token::Ident("struct")]
        );
    }

    #[test]
    fn test_directives() {
        let source = "#if os(iOS) && DEBUG\nvar\n#elseif os(macOS)\n#else // comment\n#endif\n";
        assert_eq!(
            tokens(source),
            vec![
                Token::Directive(Directive::If),
                Token::Ident("var"),
                Token::Directive(Directive::ElseIf),
                Token::Directive(Directive::Else),
                Token::Directive(Directive::EndIf),
            ]
        );
        assert_eq!(tokens("#selector"), vec![Token::Hash, Token::Ident("selector")]);
    }

    #[test]
    fn test_string_forms() {
        assert_eq!(
            tokens(r##""a \"quoted\" word" #"raw "quoted" \n"#"##),
            vec![
                Token::String(r#""a \"quoted\" word""#),
                Token::String(r##"#"raw "quoted" \n"#"##),
            ]
        );
        assert_eq!(
            tokens(r###"##"a "# b"## x"###),
            vec![Token::String(r###"##"a "# b"##"###), Token::Ident("x")]
        );
        assert_eq!(
            tokens("\"\"\"\nmulti \"quoted\"\nline\n\"\"\""),
            vec![Token::String("\"\"\"\nmulti \"quoted\"\nline\n\"\"\"")]
        );
        assert_eq!(tokens(r#""""#), vec![Token::String(r#""""#)]);
    }

    #[test]
    fn test_interpolated_strings_are_one_token() {
        let source = r#""Hello \(s.replacingOccurrences(of: "a", with: "b"))!" next"#;
        assert_eq!(
            tokens(source),
            vec![
                Token::String(r#""Hello \(s.replacingOccurrences(of: "a", with: "b"))!""#),
                Token::Ident("next"),
            ]
        );
        assert_eq!(
            tokens(r#""\(")")" x"#),
            vec![Token::String(r#""\(")")""#), Token::Ident("x")]
        );
        assert_eq!(
            tokens(r##"#"\#(name) \(raw)"#"##),
            vec![Token::String(r##"#"\#(name) \(raw)"#"##)]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = lex("var s = \"abc\nvar t").unwrap_err();
        assert_eq!(err.span.start, 8);
    }

    #[test]
    fn test_unicode_identifiers() {
        assert_eq!(
            tokens("struct Café { var crème: Int }"),
            vec![
                Token::Ident("struct"),
                Token::Ident("Café"),
                Token::LBrace,
                Token::Ident("var"),
                Token::Ident("crème"),
                Token::Colon,
                Token::Ident("Int"),
                Token::RBrace,
            ]
        );
        assert_eq!(tokens("@Mirrorö"), vec![Token::Attribute("Mirrorö")]);
    }

    #[test]
    fn test_generic_closing_angles_stay_separate() {
        assert_eq!(
            tokens("Array<Set<Int>>"),
            vec![
                Token::Ident("Array"),
                Token::Lt,
                Token::Ident("Set"),
                Token::Lt,
                Token::Ident("Int"),
                Token::Gt,
                Token::Gt,
            ]
        );
    }

    #[test]
    fn test_unknown_character() {
        let err = lex("var x = 'a'").unwrap_err();
        assert_eq!(err.slice, "'");
        assert_eq!(err.span.start, 8);
    }
}
