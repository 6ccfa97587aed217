//! Literal expression evaluation.
//!
//! Turns a token slice such as `"100%"`, `-1.5`, `[1, 2]` or
//! `{ x: 0, y: "a" } as const` into a JSON value. Anything that is not a pure
//! literal (identifiers, calls, arrow functions, operators) yields `None`.

use serde_json::{Map, Number, Value};

use crate::props::lexer::{tokenize, Token, TokenKind};

/// Evaluate a whole token slice as one literal.
pub fn literal_value(tokens: &[Token]) -> Option<Value> {
    let tokens = strip_as_suffix(tokens);
    let (value, next) = parse_value(tokens, 0)?;
    (next == tokens.len()).then_some(value)
}

/// Evaluate a piece of source text (a JSDoc `@default` tag, for example).
pub fn literal_from_text(text: &str) -> Option<Value> {
    let tokens = tokenize(text).ok()?;
    if tokens.is_empty() {
        return None;
    }
    literal_value(&tokens)
}

/// Entries of an object literal, keeping keys whose value is not a literal.
///
/// `tokens` must start at `{` and end at the matching `}`. Spread elements and
/// computed keys are skipped. Returns `None` if the slice is not an object
/// literal.
pub fn object_entries(tokens: &[Token]) -> Option<Vec<(String, Option<Value>)>> {
    if !tokens.first()?.is_punct("{") || !tokens.last()?.is_punct("}") {
        return None;
    }

    let inner = &tokens[1..tokens.len() - 1];
    let mut entries = Vec::new();

    for item in split_top_level(inner, ",") {
        if item.is_empty() || item[0].is_punct("...") || item[0].is_punct("[") {
            continue;
        }
        let key = match &item[0].kind {
            TokenKind::Ident(name) => name.clone(),
            TokenKind::Str(value) => value.clone(),
            TokenKind::Number(raw) => raw.clone(),
            _ => continue,
        };
        let value = if item.len() > 2 && item[1].is_punct(":") {
            literal_value(&item[2..])
        } else {
            None
        };
        entries.push((key, value));
    }

    Some(entries)
}

/// Split `tokens` on `separator` at bracket depth zero.
pub fn split_top_level<'a>(tokens: &'a [Token], separator: &str) -> Vec<&'a [Token]> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, token) in tokens.iter().enumerate() {
        if token.is_punct("{") || token.is_punct("(") || token.is_punct("[") {
            depth += 1;
        } else if token.is_punct("}") || token.is_punct(")") || token.is_punct("]") {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && token.is_punct(separator) {
            parts.push(&tokens[start..idx]);
            start = idx + 1;
        }
    }
    if start < tokens.len() {
        parts.push(&tokens[start..]);
    }

    parts
}

/// Parse a numeric literal the way JavaScript would print it back.
pub fn number_value(raw: &str) -> Option<Value> {
    let cleaned = raw.replace('_', "");
    let cleaned = cleaned.strip_suffix('n').unwrap_or(&cleaned);

    let radix = match cleaned.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0b" | "0B") => Some(2),
        Some("0o" | "0O") => Some(8),
        _ => None,
    };
    if let Some(radix) = radix {
        let parsed = i64::from_str_radix(&cleaned[2..], radix).ok()?;
        return Some(Value::Number(parsed.into()));
    }

    let parsed: f64 = cleaned.parse().ok()?;
    Some(float_value(parsed))
}

/// Integral floats become integers so `1.0` prints as `1`.
fn float_value(value: f64) -> Value {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        return Value::Number((value as i64).into());
    }
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

/// Drop a trailing `as const` / `as SomeType` / `satisfies T` clause.
fn strip_as_suffix(tokens: &[Token]) -> &[Token] {
    let mut depth = 0usize;
    for (idx, token) in tokens.iter().enumerate() {
        if token.is_punct("{") || token.is_punct("(") || token.is_punct("[") {
            depth += 1;
        } else if token.is_punct("}") || token.is_punct(")") || token.is_punct("]") {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && idx > 0 && (token.is_ident("as") || token.is_ident("satisfies")) {
            return &tokens[..idx];
        }
    }
    tokens
}

fn parse_value(tokens: &[Token], pos: usize) -> Option<(Value, usize)> {
    let token = tokens.get(pos)?;

    match &token.kind {
        TokenKind::Str(value) => Some((Value::String(value.clone()), pos + 1)),
        TokenKind::Template {
            text,
            has_substitutions: false,
        } => Some((Value::String(text.clone()), pos + 1)),
        TokenKind::Number(raw) => Some((number_value(raw)?, pos + 1)),
        TokenKind::Ident(name) => match name.as_str() {
            "true" => Some((Value::Bool(true), pos + 1)),
            "false" => Some((Value::Bool(false), pos + 1)),
            "null" => Some((Value::Null, pos + 1)),
            _ => None,
        },
        TokenKind::Punct("-") => {
            let (value, next) = parse_value(tokens, pos + 1)?;
            let negated = match value {
                Value::Number(n) => {
                    if let Some(i) = n.as_i64() {
                        Value::Number((-i).into())
                    } else {
                        float_value(-n.as_f64()?)
                    }
                }
                _ => return None,
            };
            Some((negated, next))
        }
        TokenKind::Punct("+") => match parse_value(tokens, pos + 1)? {
            (Value::Number(n), next) => Some((Value::Number(n), next)),
            _ => None,
        },
        TokenKind::Punct("(") => {
            let (value, next) = parse_value(tokens, pos + 1)?;
            tokens.get(next)?.is_punct(")").then_some((value, next + 1))
        }
        TokenKind::Punct("[") => parse_array(tokens, pos + 1),
        TokenKind::Punct("{") => parse_object(tokens, pos + 1),
        _ => None,
    }
}

fn parse_array(tokens: &[Token], mut pos: usize) -> Option<(Value, usize)> {
    let mut items = Vec::new();

    loop {
        if tokens.get(pos)?.is_punct("]") {
            return Some((Value::Array(items), pos + 1));
        }
        let (item, next) = parse_value(tokens, pos)?;
        items.push(item);
        pos = next;

        let token = tokens.get(pos)?;
        if token.is_punct(",") {
            pos += 1;
        } else if !token.is_punct("]") {
            return None;
        }
    }
}

fn parse_object(tokens: &[Token], mut pos: usize) -> Option<(Value, usize)> {
    let mut map = Map::new();

    loop {
        let token = tokens.get(pos)?;
        if token.is_punct("}") {
            return Some((Value::Object(map), pos + 1));
        }

        let key = match &token.kind {
            TokenKind::Ident(name) => name.clone(),
            TokenKind::Str(value) => value.clone(),
            TokenKind::Number(raw) => raw.clone(),
            _ => return None,
        };
        if !tokens.get(pos + 1)?.is_punct(":") {
            return None;
        }
        let (value, next) = parse_value(tokens, pos + 2)?;
        map.insert(key, value);
        pos = next;

        let token = tokens.get(pos)?;
        if token.is_punct(",") {
            pos += 1;
        } else if !token.is_punct("}") {
            return None;
        }
    }
}
