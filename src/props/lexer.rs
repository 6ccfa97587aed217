//! # TSX Lexer
//!
//! A forgiving tokenizer for TypeScript / TSX source. It only has to be good
//! enough to find declarations, parameter lists and literal expressions, so:
//!
//! - Regular expression literals and JSX text are not recognized; they lex
//!   as ordinary punctuation and identifiers.
//! - A `'` or `"` with no closing quote on the same line lexes as a lone
//!   punctuation token (apostrophes in JSX text).
//! - `//` directly after `word:` is a URL in JSX text, not a comment.
//! - `>` is never merged with a following `>` or `=`, so nested generics close
//!   one level per token.
//!
//! `/** ... */` comments are kept and attached to the next token as
//! documentation. All other comments are dropped.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated block comment starting at byte {0}")]
    UnterminatedComment(usize),
    #[error("unterminated template literal starting at byte {0}")]
    UnterminatedTemplate(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    /// Quoted string with escapes resolved
    Str(String),
    /// Template literal; `text` is the raw body between the backticks
    Template {
        text: String,
        has_substitutions: bool,
    },
    Number(String),
    Punct(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the token start
    pub offset: usize,
    /// Raw text of the `/** */` comment directly preceding this token
    pub doc: Option<String>,
}

impl Token {
    pub fn is_punct(&self, punct: &str) -> bool {
        matches!(&self.kind, TokenKind::Punct(p) if *p == punct)
    }

    pub fn is_ident(&self, ident: &str) -> bool {
        matches!(&self.kind, TokenKind::Ident(name) if name == ident)
    }

    pub fn ident(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// Source-like rendering, used to rebuild type text from tokens
    pub fn text(&self) -> String {
        match &self.kind {
            TokenKind::Ident(name) => name.clone(),
            TokenKind::Str(value) => format!("\"{}\"", value.replace('"', "\\\"")),
            TokenKind::Template { text, .. } => format!("`{}`", text),
            TokenKind::Number(raw) => raw.clone(),
            TokenKind::Punct(p) => (*p).to_string(),
        }
    }
}

/// Multi-character punctuators, longest first
const MULTI_PUNCTS: &[&str] = &[
    "...", "===", "!==", "=>", "==", "!=", "<=", "&&", "||", "??", "?.", "++", "--", "+=", "-=",
    "*=", "/=",
];

const SINGLE_PUNCTS: &[&str] = &[
    "{", "}", "(", ")", "[", "]", "<", ">", ";", ",", ":", "?", ".", "=", "|", "&", "+", "-",
    "*", "/", "%", "!", "~", "^", "@", "#", "'", "\"", "\\",
];

/// Tokenize TypeScript / TSX source.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pending_doc: Option<String> = None;
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];

        if c.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        // Comments
        if c == b'/' && bytes.get(i + 1) == Some(&b'/') && !follows_url_scheme(bytes, i) {
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }
        if c == b'/' && bytes.get(i + 1) == Some(&b'*') {
            let start = i;
            let Some(end) = source[i + 2..].find("*/") else {
                return Err(LexError::UnterminatedComment(start));
            };
            let close = i + 2 + end + 2;
            if bytes.get(i + 2) == Some(&b'*') && close - start > 4 {
                pending_doc = Some(source[start..close].to_string());
            }
            i = close;
            continue;
        }

        let start = i;
        let kind = if c == b'"' || c == b'\'' {
            match lex_quoted(source, i) {
                Some((value, next)) => {
                    i = next;
                    TokenKind::Str(value)
                }
                None => {
                    i += 1;
                    TokenKind::Punct(if c == b'"' { "\"" } else { "'" })
                }
            }
        } else if c == b'`' {
            let (text, has_substitutions, next) = lex_template(source, i)?;
            i = next;
            TokenKind::Template {
                text,
                has_substitutions,
            }
        } else if c.is_ascii_digit()
            || (c == b'.' && bytes.get(i + 1).is_some_and(u8::is_ascii_digit))
        {
            let next = lex_number(bytes, i);
            let raw = source[i..next].to_string();
            i = next;
            TokenKind::Number(raw)
        } else if is_ident_start(c) {
            let mut next = i;
            while next < bytes.len() && is_ident_continue(bytes[next]) {
                next += 1;
            }
            let name = source[i..next].to_string();
            i = next;
            TokenKind::Ident(name)
        } else if !c.is_ascii() {
            // Non-ASCII outside strings (JSX text, emoji): skip the whole char
            let width = source[i..].chars().next().map_or(1, char::len_utf8);
            i += width;
            continue;
        } else if let Some(punct) = MULTI_PUNCTS
            .iter()
            .chain(SINGLE_PUNCTS.iter())
            .find(|p| source[i..].starts_with(**p))
        {
            i += punct.len();
            TokenKind::Punct(*punct)
        } else {
            i += 1;
            continue;
        };

        tokens.push(Token {
            kind,
            offset: start,
            doc: pending_doc.take(),
        });
    }

    Ok(tokens)
}

/// `scheme://` in JSX text: the `//` directly follows `<word>:`.
fn follows_url_scheme(bytes: &[u8], i: usize) -> bool {
    i >= 2 && bytes[i - 1] == b':' && bytes[i - 2].is_ascii_alphanumeric()
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b'$'
}

fn is_ident_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'$'
}

/// Lex a single- or double-quoted string starting at `start`.
///
/// Returns `None` if the line ends before the closing quote.
fn lex_quoted(source: &str, start: usize) -> Option<(String, usize)> {
    let quote = source[start..].chars().next()?;
    let mut value = String::new();
    let mut chars = source[start + 1..].char_indices();

    while let Some((idx, ch)) = chars.next() {
        match ch {
            '\n' => return None,
            '\\' => {
                let (_, escaped) = chars.next()?;
                match escaped {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    'r' => value.push('\r'),
                    '0' => value.push('\0'),
                    // Line continuation
                    '\n' => {}
                    other => value.push(other),
                }
            }
            c if c == quote => return Some((value, start + 1 + idx + 1)),
            c => value.push(c),
        }
    }

    None
}

/// Lex a template literal starting at the opening backtick.
///
/// `${ ... }` substitutions are skipped with brace counting; strings and
/// nested templates inside them are honored.
fn lex_template(source: &str, start: usize) -> Result<(String, bool, usize), LexError> {
    let bytes = source.as_bytes();
    let mut i = start + 1;
    let mut has_substitutions = false;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => {
                return Ok((source[start + 1..i].to_string(), has_substitutions, i + 1));
            }
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                has_substitutions = true;
                i = skip_substitution(source, i + 2)?;
            }
            _ => i += 1,
        }
    }

    Err(LexError::UnterminatedTemplate(start))
}

/// Skip to just past the `}` closing a `${` substitution whose body starts at `i`.
fn skip_substitution(source: &str, mut i: usize) -> Result<usize, LexError> {
    let bytes = source.as_bytes();
    let mut depth = 1;

    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i + 1);
                }
            }
            b'"' | b'\'' => {
                if let Some((_, next)) = lex_quoted(source, i) {
                    i = next;
                    continue;
                }
            }
            b'`' => {
                let (_, _, next) = lex_template(source, i)?;
                i = next;
                continue;
            }
            _ => {}
        }
        i += 1;
    }

    Err(LexError::UnterminatedTemplate(i))
}

fn lex_number(bytes: &[u8], start: usize) -> usize {
    let mut i = start;

    if bytes[i] == b'0'
        && matches!(
            bytes.get(i + 1),
            Some(b'x' | b'X' | b'b' | b'B' | b'o' | b'O')
        )
    {
        i += 2;
        while i < bytes.len() && (bytes[i].is_ascii_hexdigit() || bytes[i] == b'_') {
            i += 1;
        }
        return i;
    }

    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'_' || bytes[i] == b'.') {
        i += 1;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            i = j;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
        }
    }
    // BigInt suffix
    if i < bytes.len() && bytes[i] == b'n' {
        i += 1;
    }

    i
}
