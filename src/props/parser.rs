//! # Declaration Parser
//!
//! Walks the token stream of a TSX module and collects, at the top level only:
//!
//! - `interface` declarations (with `extends`)
//! - `type` aliases
//! - component candidates: `function` declarations and `const` bindings
//!   initialized with an arrow function, a function expression, or a
//!   `forwardRef` / `memo` wrapper around one
//! - `export default Name` statements, and `export default memo(function ...)`
//!   wrappers, which also yield a component
//! - `Name.defaultProps = { ... }` assignments
//!
//! Function bodies are skipped by bracket counting, so helpers declared
//! inside a component never show up as candidates.

use serde_json::Value;
use std::collections::HashMap;

use crate::props::lexer::{tokenize, LexError, Token, TokenKind};
use crate::props::literal::{literal_value, number_value, object_entries, split_top_level};

/// Type annotations naming a function component; the first generic argument
/// is the props type
const COMPONENT_TYPE_NAMES: &[&str] = &["FC", "FunctionComponent", "VFC", "ComponentType"];

/// A parsed TypeScript type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// `string`, `React.ReactNode`, `Array<T>`, `Props`
    Named { name: String, args: Vec<TypeExpr> },
    /// `"md"`, `3`, `true`
    Literal(Value),
    /// `{ a: string; b?: number }`
    Object(Vec<Member>),
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    /// `T[]`
    Array(Box<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    /// `(params) => ret`, with the parameter list kept as text
    Function { params: String, ret: Box<TypeExpr> },
    /// Anything kept verbatim: `typeof x`, `keyof T`, template literal types
    Raw(String),
}

impl TypeExpr {
    pub fn named(name: &str) -> Self {
        Self::Named {
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    /// Render back to TypeScript syntax.
    pub fn text(&self) -> String {
        match self {
            Self::Named { name, args } if args.is_empty() => name.clone(),
            Self::Named { name, args } => format!(
                "{}<{}>",
                name,
                args.iter().map(Self::text).collect::<Vec<_>>().join(", ")
            ),
            Self::Literal(Value::String(s)) => format!("\"{}\"", s),
            Self::Literal(value) => value.to_string(),
            Self::Object(members) if members.is_empty() => "{}".to_string(),
            Self::Object(members) => format!(
                "{{ {} }}",
                members
                    .iter()
                    .map(|m| format!(
                        "{}{}: {}",
                        m.name,
                        if m.optional { "?" } else { "" },
                        m.ty.text()
                    ))
                    .collect::<Vec<_>>()
                    .join("; ")
            ),
            Self::Union(parts) => parts.iter().map(Self::text).collect::<Vec<_>>().join(" | "),
            Self::Intersection(parts) => parts
                .iter()
                .map(Self::text)
                .collect::<Vec<_>>()
                .join(" & "),
            Self::Array(inner) => match inner.as_ref() {
                Self::Union(_) | Self::Intersection(_) | Self::Function { .. } => {
                    format!("({})[]", inner.text())
                }
                _ => format!("{}[]", inner.text()),
            },
            Self::Tuple(items) => format!(
                "[{}]",
                items.iter().map(Self::text).collect::<Vec<_>>().join(", ")
            ),
            Self::Function { params, ret } => format!("({}) => {}", params, ret.text()),
            Self::Raw(text) => text.clone(),
        }
    }

    /// Literal members if this is a union made only of literals.
    pub fn literal_union(&self) -> Option<Vec<Value>> {
        match self {
            Self::Union(parts) => parts
                .iter()
                .map(|part| match part {
                    Self::Literal(value) => Some(value.clone()),
                    _ => None,
                })
                .collect(),
            _ => None,
        }
    }
}

/// Parsed `/** ... */` comment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocComment {
    pub description: Option<String>,
    /// `(tag, value)` pairs in order, tag without the `@`
    pub tags: Vec<(String, String)>,
}

impl DocComment {
    pub fn parse(raw: &str) -> Self {
        let body = raw
            .trim()
            .trim_start_matches("/**")
            .trim_end_matches("*/");

        let mut description = Vec::new();
        let mut tags: Vec<(String, String)> = Vec::new();

        for line in body.lines() {
            let line = line.trim();
            let line = line.strip_prefix('*').unwrap_or(line).trim();

            if let Some(tag_line) = line.strip_prefix('@') {
                let (tag, value) = tag_line
                    .split_once(char::is_whitespace)
                    .unwrap_or((tag_line, ""));
                tags.push((tag.to_string(), value.trim().to_string()));
            } else if let Some((_, value)) = tags.last_mut() {
                if !line.is_empty() {
                    if !value.is_empty() {
                        value.push('\n');
                    }
                    value.push_str(line);
                }
            } else if !line.is_empty() {
                description.push(line);
            }
        }

        Self {
            description: (!description.is_empty()).then(|| description.join(" ")),
            tags,
        }
    }

    pub fn tag(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(tag, _)| tag == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|(tag, _)| tag == name)
    }
}

/// A property of an interface or object type.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub name: String,
    pub ty: TypeExpr,
    pub optional: bool,
    pub doc: Option<DocComment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceDecl {
    pub name: String,
    pub extends: Vec<TypeExpr>,
    pub members: Vec<Member>,
}

/// One binding of a destructured props parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternField {
    /// Property name being read (not the local alias)
    pub key: String,
    pub has_default: bool,
    /// The default, when it is a literal
    pub default: Option<Value>,
}

/// The first parameter of a component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Param {
    /// Fields of `{ a, b = 1 }`, `None` for a plain identifier
    pub pattern: Option<Vec<PatternField>>,
    pub annotation: Option<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDecl {
    pub name: String,
    pub exported: bool,
    pub is_default: bool,
    pub doc: Option<DocComment>,
    pub param: Option<Param>,
    /// Props type from `FC<Props>` or `forwardRef<El, Props>`
    pub wrapper_props: Option<TypeExpr>,
}

impl ComponentDecl {
    /// The declared props type, preferring the parameter annotation.
    pub fn props_type(&self) -> Option<&TypeExpr> {
        self.param
            .as_ref()
            .and_then(|p| p.annotation.as_ref())
            .or(self.wrapper_props.as_ref())
    }

    pub fn pattern(&self) -> &[PatternField] {
        self.param
            .as_ref()
            .and_then(|p| p.pattern.as_deref())
            .unwrap_or_default()
    }
}

/// Everything collected from one source file.
#[derive(Debug, Clone, Default)]
pub struct Module {
    pub interfaces: HashMap<String, InterfaceDecl>,
    pub aliases: HashMap<String, TypeExpr>,
    pub components: Vec<ComponentDecl>,
    pub default_export: Option<String>,
    /// `Name.defaultProps` entries in source order
    pub default_props: HashMap<String, Vec<(String, Option<Value>)>>,
}

impl Module {
    pub fn parse(source: &str) -> Result<Self, LexError> {
        let tokens = tokenize(source)?;
        Ok(Parser::new(&tokens).parse_module())
    }

    /// Pick the component a request refers to.
    ///
    /// With a hint, only an exact name match counts. Without one: the default
    /// export, else the first exported capitalized candidate, else the first
    /// capitalized candidate, else the first candidate.
    pub fn select_component(&self, hint: Option<&str>) -> Option<&ComponentDecl> {
        if let Some(hint) = hint {
            return self.components.iter().find(|c| c.name == hint);
        }

        let capitalized = |c: &&ComponentDecl| c.name.starts_with(|ch: char| ch.is_ascii_uppercase());

        self.components
            .iter()
            .find(|c| c.is_default || self.default_export.as_deref() == Some(c.name.as_str()))
            .or_else(|| {
                self.components
                    .iter()
                    .filter(|c| c.exported)
                    .find(capitalized)
            })
            .or_else(|| self.components.iter().find(capitalized))
            .or_else(|| self.components.first())
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<&'a Token> {
        self.tokens.get(self.pos + offset)
    }

    fn at_punct(&self, punct: &str) -> bool {
        self.peek().is_some_and(|t| t.is_punct(punct))
    }

    fn at_ident(&self, ident: &str) -> bool {
        self.peek().is_some_and(|t| t.is_ident(ident))
    }

    fn eat_punct(&mut self, punct: &str) -> bool {
        if self.at_punct(punct) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Option<String> {
        let name = self.peek()?.ident()?.to_string();
        self.pos += 1;
        Some(name)
    }

    /// Index of the token closing the bracket at `open`.
    fn matching(&self, open: usize) -> Option<usize> {
        let (open_punct, close_punct) = match &self.tokens.get(open)?.kind {
            TokenKind::Punct("(") => ("(", ")"),
            TokenKind::Punct("[") => ("[", "]"),
            TokenKind::Punct("{") => ("{", "}"),
            TokenKind::Punct("<") => ("<", ">"),
            _ => return None,
        };

        let mut depth = 0usize;
        for (idx, token) in self.tokens.iter().enumerate().skip(open) {
            if token.is_punct(open_punct) {
                depth += 1;
            } else if token.is_punct(close_punct) {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
        }
        None
    }

    /// Skip a `<...>` generic parameter list if one starts here.
    fn skip_generics(&mut self) -> Option<()> {
        if self.at_punct("<") {
            self.pos = self.matching(self.pos)? + 1;
        }
        Some(())
    }

    fn parse_module(mut self) -> Module {
        let mut module = Module::default();
        let mut depth = 0usize;

        while self.pos < self.tokens.len() {
            let token = &self.tokens[self.pos];

            if token.is_punct("{") || token.is_punct("(") || token.is_punct("[") {
                depth += 1;
            } else if token.is_punct("}") || token.is_punct(")") || token.is_punct("]") {
                depth = depth.saturating_sub(1);
            } else if depth == 0 {
                let start = self.pos;
                if self.declaration(&mut module).is_some() && self.pos > start {
                    continue;
                }
                self.pos = start;
            }

            self.pos += 1;
        }

        module
    }

    /// Try to parse a top-level declaration at the current position.
    ///
    /// On success the cursor is left after the part that was consumed. Bodies
    /// are left to the caller's bracket counting.
    fn declaration(&mut self, module: &mut Module) -> Option<()> {
        let token = self.peek()?;
        let keyword = token.ident()?;

        match keyword {
            "interface" if self.peek_at(1)?.ident().is_some() => {
                let decl = self.interface()?;
                module.interfaces.insert(decl.name.clone(), decl);
            }
            "type"
                if self.peek_at(1)?.ident().is_some()
                    && (self.peek_at(2)?.is_punct("=") || self.peek_at(2)?.is_punct("<")) =>
            {
                let (name, ty) = self.type_alias()?;
                module.aliases.insert(name, ty);
            }
            "function" => {
                let decl = self.function_component()?;
                module.components.push(decl);
            }
            "const" | "let" | "var" if self.peek_at(1)?.ident().is_some() => {
                let decl = self.const_component()?;
                module.components.push(decl);
            }
            "export" if self.peek_at(1)?.is_ident("default") => {
                if let Some(decl) = self.wrapped_default_component() {
                    module.default_export = Some(decl.name.clone());
                    module.components.push(decl);
                } else {
                    let name = self.default_export_target()?;
                    module.default_export = Some(name);
                }
            }
            _ if self.peek_at(1)?.is_punct(".")
                && self.peek_at(2)?.is_ident("defaultProps")
                && self.peek_at(3)?.is_punct("=")
                && self.peek_at(4)?.is_punct("{") =>
            {
                let name = keyword.to_string();
                let open = self.pos + 4;
                let close = self.matching(open)?;
                let entries = object_entries(&self.tokens[open..=close])?;
                module.default_props.insert(name, entries);
                self.pos = close + 1;
            }
            _ => return None,
        }

        Some(())
    }

    /// Walk back over `export`, `default`, `declare` and `async` modifiers
    /// preceding `start`. Returns `(exported, is_default, first_index)`.
    fn modifiers(&self, start: usize) -> (bool, bool, usize) {
        let mut exported = false;
        let mut is_default = false;
        let mut first = start;

        while first > 0 {
            let Some(name) = self.tokens[first - 1].ident() else {
                break;
            };
            match name {
                "export" => exported = true,
                "default" => is_default = true,
                "declare" | "async" => {}
                _ => break,
            }
            first -= 1;
        }

        (exported || is_default, is_default, first)
    }

    fn doc_at(&self, index: usize) -> Option<DocComment> {
        self.tokens
            .get(index)?
            .doc
            .as_deref()
            .map(DocComment::parse)
    }

    fn interface(&mut self) -> Option<InterfaceDecl> {
        self.pos += 1;
        let name = self.ident()?;
        self.skip_generics()?;

        let mut extends = Vec::new();
        if self.at_ident("extends") {
            self.pos += 1;
            loop {
                extends.push(self.postfix_type()?);
                if !self.eat_punct(",") {
                    break;
                }
            }
        }

        if !self.at_punct("{") {
            return None;
        }
        let members = self.object_members()?;

        Some(InterfaceDecl {
            name,
            extends,
            members,
        })
    }

    fn type_alias(&mut self) -> Option<(String, TypeExpr)> {
        self.pos += 1;
        let name = self.ident()?;
        self.skip_generics()?;
        if !self.eat_punct("=") {
            return None;
        }
        let ty = self.parse_type()?;
        self.eat_punct(";");
        Some((name, ty))
    }

    fn function_component(&mut self) -> Option<ComponentDecl> {
        let start = self.pos;
        let (exported, is_default, first) = self.modifiers(start);
        self.pos += 1;

        let name = match self.peek()?.ident() {
            Some(name) => {
                self.pos += 1;
                name.to_string()
            }
            None if is_default => "default".to_string(),
            None => return None,
        };
        self.skip_generics()?;

        if !self.at_punct("(") {
            return None;
        }
        let param = self.parameter_list()?;

        Some(ComponentDecl {
            name,
            exported,
            is_default,
            doc: self.doc_at(first).or_else(|| self.doc_at(start)),
            param,
            wrapper_props: None,
        })
    }

    fn const_component(&mut self) -> Option<ComponentDecl> {
        let start = self.pos;
        let (exported, is_default, first) = self.modifiers(start);
        self.pos += 1;
        let name = self.ident()?;

        let mut wrapper_props = None;
        if self.eat_punct(":") {
            let annotation = self.parse_type()?;
            wrapper_props = component_type_props(&annotation);
        }
        if !self.eat_punct("=") {
            return None;
        }

        let (param, init_props) = self.component_init()?;

        Some(ComponentDecl {
            name,
            exported,
            is_default,
            doc: self.doc_at(first).or_else(|| self.doc_at(start)),
            param,
            wrapper_props: wrapper_props.or(init_props),
        })
    }

    /// Parse the initializer of a component binding.
    ///
    /// Returns the first parameter and any props type carried by a
    /// `forwardRef<El, Props>` / `memo<Props>` wrapper.
    #[allow(clippy::type_complexity)]
    fn component_init(&mut self) -> Option<(Option<Param>, Option<TypeExpr>)> {
        if self.at_ident("async") {
            self.pos += 1;
        }

        // forwardRef(...), memo(...), React.forwardRef(...)
        if let Some(wrapper) = self.peek()?.ident() {
            let qualified = wrapper == "React" && self.peek_at(1)?.is_punct(".");
            let callee = if qualified {
                self.peek_at(2)?.ident()?
            } else {
                wrapper
            };

            if callee == "forwardRef" || callee == "memo" {
                self.pos += if qualified { 3 } else { 1 };

                let args = if self.at_punct("<") {
                    self.type_arguments()?
                } else {
                    Vec::new()
                };
                if !self.eat_punct("(") {
                    return None;
                }

                let (param, inner_props) = self.component_init()?;
                let props_index = usize::from(callee == "forwardRef");
                let props = inner_props.or_else(|| args.get(props_index).cloned());
                return Some((param, props));
            }
        }

        if self.at_ident("function") {
            self.pos += 1;
            if self.peek()?.ident().is_some() {
                self.pos += 1;
            }
            self.skip_generics()?;
            if !self.at_punct("(") {
                return None;
            }
            return Some((self.parameter_list()?, None));
        }

        self.skip_generics()?;

        if self.at_punct("(") {
            let close = self.matching(self.pos)?;
            let param = self.first_parameter(self.pos + 1, close);

            self.pos = close + 1;
            if self.eat_punct(":") {
                self.parse_type()?;
            }
            if !self.eat_punct("=>") {
                return None;
            }
            return Some((param, None));
        }

        // Single untyped parameter: `props => ...`
        if self.peek()?.ident().is_some() && self.peek_at(1)?.is_punct("=>") {
            self.pos += 2;
            return Some((Some(Param::default()), None));
        }

        None
    }

    /// `export default memo(function Name(...) {...})` and other wrapped
    /// function expressions or arrows. Leaves the cursor untouched when the
    /// wrapper only names another binding.
    fn wrapped_default_component(&mut self) -> Option<ComponentDecl> {
        let start = self.pos;
        let mut idx = start + 2;
        if self.tokens.get(idx)?.is_ident("React") && self.tokens.get(idx + 1)?.is_punct(".") {
            idx += 2;
        }
        let callee = self.tokens.get(idx)?.ident()?;
        if callee != "memo" && callee != "forwardRef" {
            return None;
        }

        self.pos = start + 2;
        let Some((param, wrapper_props)) = self.component_init() else {
            self.pos = start;
            return None;
        };

        let name = self.tokens[start + 2..self.pos]
            .windows(2)
            .find(|pair| pair[0].is_ident("function"))
            .and_then(|pair| pair[1].ident())
            .unwrap_or("default")
            .to_string();

        Some(ComponentDecl {
            name,
            exported: true,
            is_default: true,
            doc: self.doc_at(start),
            param,
            wrapper_props,
        })
    }

    /// `export default Name` / `export default memo(Name)`.
    fn default_export_target(&mut self) -> Option<String> {
        let mut idx = self.pos + 2;
        loop {
            let token = self.tokens.get(idx)?;
            let name = token.ident()?;
            match name {
                "function" | "async" | "class" => return None,
                "React" if self.tokens.get(idx + 1)?.is_punct(".") => idx += 2,
                "memo" | "forwardRef" if self.tokens.get(idx + 1)?.is_punct("(") => idx += 2,
                _ => {
                    self.pos = idx + 1;
                    return Some(name.to_string());
                }
            }
        }
    }

    /// Parse `( ... )` at the cursor and return the first parameter.
    fn parameter_list(&mut self) -> Option<Option<Param>> {
        let close = self.matching(self.pos)?;
        let param = self.first_parameter(self.pos + 1, close);
        self.pos = close + 1;
        Some(param)
    }

    /// First parameter among the tokens in `start..end`.
    fn first_parameter(&self, start: usize, end: usize) -> Option<Param> {
        let inner = &self.tokens[start..end];
        let first = split_top_level(inner, ",").into_iter().next()?;
        if first.is_empty() {
            return None;
        }

        let mut param = Param::default();
        let rest = if first[0].is_punct("{") {
            let close = Parser::new(first).matching(0)?;
            param.pattern = Some(pattern_fields(&first[1..close]));
            &first[close + 1..]
        } else if first[0].ident().is_some() {
            let mut idx = 1;
            if first.get(idx).is_some_and(|t| t.is_punct("?")) {
                idx += 1;
            }
            &first[idx..]
        } else {
            return None;
        };

        if rest.first().is_some_and(|t| t.is_punct(":")) {
            let mut sub = Parser::new(&rest[1..]);
            param.annotation = sub.parse_type();
        }

        Some(param)
    }

    fn type_arguments(&mut self) -> Option<Vec<TypeExpr>> {
        if !self.eat_punct("<") {
            return None;
        }
        let mut args = Vec::new();
        loop {
            if self.eat_punct(">") {
                return Some(args);
            }
            args.push(self.parse_type()?);
            if !self.eat_punct(",") && !self.at_punct(">") {
                return None;
            }
        }
    }

    fn parse_type(&mut self) -> Option<TypeExpr> {
        self.eat_punct("|");
        let first = self.intersection_type()?;
        if !self.at_punct("|") {
            return Some(first);
        }

        let mut parts = vec![first];
        while self.eat_punct("|") {
            parts.push(self.intersection_type()?);
        }
        Some(TypeExpr::Union(parts))
    }

    fn intersection_type(&mut self) -> Option<TypeExpr> {
        self.eat_punct("&");
        let first = self.postfix_type()?;
        if !self.at_punct("&") {
            return Some(first);
        }

        let mut parts = vec![first];
        while self.eat_punct("&") {
            parts.push(self.postfix_type()?);
        }
        Some(TypeExpr::Intersection(parts))
    }

    fn postfix_type(&mut self) -> Option<TypeExpr> {
        let mut ty = self.primary_type()?;

        while self.at_punct("[") {
            if self.peek_at(1).is_some_and(|t| t.is_punct("]")) {
                self.pos += 2;
                ty = TypeExpr::Array(Box::new(ty));
            } else {
                let close = self.matching(self.pos)?;
                let index = tokens_text(&self.tokens[self.pos + 1..close]);
                self.pos = close + 1;
                ty = TypeExpr::Raw(format!("{}[{}]", ty.text(), index));
            }
        }

        Some(ty)
    }

    fn primary_type(&mut self) -> Option<TypeExpr> {
        let token = self.peek()?;

        match &token.kind {
            TokenKind::Str(value) => {
                self.pos += 1;
                Some(TypeExpr::Literal(Value::String(value.clone())))
            }
            TokenKind::Number(raw) => {
                self.pos += 1;
                Some(TypeExpr::Literal(number_value(raw)?))
            }
            TokenKind::Template { text, .. } => {
                self.pos += 1;
                Some(TypeExpr::Raw(format!("`{}`", text)))
            }
            TokenKind::Punct("-") => {
                let literal = literal_value(self.tokens.get(self.pos..self.pos + 2)?)?;
                self.pos += 2;
                Some(TypeExpr::Literal(literal))
            }
            TokenKind::Punct("{") => Some(TypeExpr::Object(self.object_members()?)),
            TokenKind::Punct("[") => {
                let close = self.matching(self.pos)?;
                let inner = &self.tokens[self.pos + 1..close];
                let items = split_top_level(inner, ",")
                    .into_iter()
                    .filter(|item| !item.is_empty())
                    .map(|item| tuple_element(item))
                    .collect::<Option<Vec<_>>>()?;
                self.pos = close + 1;
                Some(TypeExpr::Tuple(items))
            }
            TokenKind::Punct("(") => {
                let close = self.matching(self.pos)?;
                if self.tokens.get(close + 1).is_some_and(|t| t.is_punct("=>")) {
                    return self.function_type();
                }
                self.pos += 1;
                let inner = self.parse_type()?;
                if !self.eat_punct(")") {
                    return None;
                }
                Some(inner)
            }
            TokenKind::Punct("<") => {
                self.skip_generics()?;
                if !self.at_punct("(") {
                    return None;
                }
                self.function_type()
            }
            TokenKind::Ident(name) => match name.as_str() {
                "true" | "false" => {
                    self.pos += 1;
                    Some(TypeExpr::Literal(Value::Bool(name == "true")))
                }
                "typeof" | "keyof" | "readonly" | "unique" | "infer" => {
                    self.pos += 1;
                    let inner = self.postfix_type()?;
                    Some(TypeExpr::Raw(format!("{} {}", name, inner.text())))
                }
                "new" => {
                    self.pos += 1;
                    let inner = self.function_type()?;
                    Some(TypeExpr::Raw(format!("new {}", inner.text())))
                }
                _ => {
                    let mut qualified = name.clone();
                    self.pos += 1;
                    while self.at_punct(".") {
                        let segment = self.peek_at(1)?.ident()?.to_string();
                        qualified.push('.');
                        qualified.push_str(&segment);
                        self.pos += 2;
                    }
                    let args = if self.at_punct("<") {
                        self.type_arguments()?
                    } else {
                        Vec::new()
                    };
                    Some(TypeExpr::Named {
                        name: qualified,
                        args,
                    })
                }
            },
            _ => None,
        }
    }

    /// `(params) => ret` with the cursor on `(`.
    fn function_type(&mut self) -> Option<TypeExpr> {
        let close = self.matching(self.pos)?;
        let params = tokens_text(&self.tokens[self.pos + 1..close]);
        self.pos = close + 1;
        if !self.eat_punct("=>") {
            return None;
        }
        let ret = self.parse_type()?;
        Some(TypeExpr::Function {
            params,
            ret: Box::new(ret),
        })
    }

    /// Members of `{ ... }` with the cursor on `{`; leaves it after `}`.
    fn object_members(&mut self) -> Option<Vec<Member>> {
        let close = self.matching(self.pos)?;
        self.pos += 1;
        let mut members = Vec::new();

        while self.pos < close {
            if self.eat_punct(";") || self.eat_punct(",") {
                continue;
            }

            let before = self.pos;
            if let Some(member) = self.member() {
                members.push(member);
            }
            if self.pos <= before || self.pos > close {
                // Unparseable member: resync on the next separator
                self.pos = before + 1;
                while self.pos < close && !self.at_punct(";") && !self.at_punct(",") {
                    self.pos = match self.peek().map(|t| &t.kind) {
                        Some(TokenKind::Punct("{" | "(" | "[" | "<")) => {
                            self.matching(self.pos).map_or(self.pos + 1, |c| c + 1)
                        }
                        _ => self.pos + 1,
                    };
                }
            }
        }

        self.pos = close + 1;
        Some(members)
    }

    fn member(&mut self) -> Option<Member> {
        let doc = self.peek()?.doc.as_deref().map(DocComment::parse);

        if self.at_ident("readonly")
            && self
                .peek_at(1)
                .is_some_and(|t| !t.is_punct(":") && !t.is_punct("?") && !t.is_punct("("))
        {
            self.pos += 1;
        }

        // Index signatures, mapped types, call and construct signatures
        if self.at_punct("[") || self.at_punct("(") || self.at_punct("<") || self.at_ident("new") {
            if self.at_ident("new") {
                self.pos += 1;
            }
            self.skip_generics()?;
            let close = self.matching(self.pos)?;
            self.pos = close + 1;
            self.eat_punct("?");
            if self.eat_punct(":") {
                self.parse_type()?;
            }
            return None;
        }

        let name = match &self.peek()?.kind {
            TokenKind::Ident(name) | TokenKind::Str(name) | TokenKind::Number(name) => name.clone(),
            _ => return None,
        };
        self.pos += 1;
        let optional = self.eat_punct("?");

        let ty = if self.eat_punct(":") {
            self.parse_type()?
        } else if self.at_punct("(") || self.at_punct("<") {
            // Method signature
            self.skip_generics()?;
            let close = self.matching(self.pos)?;
            let params = tokens_text(&self.tokens[self.pos + 1..close]);
            self.pos = close + 1;
            let ret = if self.eat_punct(":") {
                self.parse_type()?
            } else {
                TypeExpr::named("void")
            };
            TypeExpr::Function {
                params,
                ret: Box::new(ret),
            }
        } else {
            TypeExpr::named("any")
        };

        Some(Member {
            name,
            ty,
            optional,
            doc,
        })
    }
}

/// Props type carried by a `FC<Props>`-style annotation.
fn component_type_props(annotation: &TypeExpr) -> Option<TypeExpr> {
    match annotation {
        TypeExpr::Named { name, args } => {
            let last = name.rsplit('.').next().unwrap_or(name);
            if COMPONENT_TYPE_NAMES.contains(&last) {
                args.first().cloned()
            } else {
                None
            }
        }
        _ => None,
    }
}

/// One element of a tuple type, ignoring labels, `?` and `...`.
fn tuple_element(item: &[Token]) -> Option<TypeExpr> {
    let mut item = item;
    if item.first().is_some_and(|t| t.is_punct("...")) {
        item = &item[1..];
    }
    if item.len() > 2 && item[0].ident().is_some() {
        if item[1].is_punct(":") {
            item = &item[2..];
        } else if item[1].is_punct("?") && item[2].is_punct(":") {
            item = &item[3..];
        }
    }
    let mut sub = Parser::new(item);
    sub.parse_type()
}

/// Fields of a destructuring pattern body (the tokens between `{` and `}`).
fn pattern_fields(inner: &[Token]) -> Vec<PatternField> {
    let mut fields = Vec::new();

    for item in split_top_level(inner, ",") {
        let Some(first) = item.first() else {
            continue;
        };
        if first.is_punct("...") {
            continue;
        }
        let key = match &first.kind {
            TokenKind::Ident(name) | TokenKind::Str(name) => name.clone(),
            _ => continue,
        };

        let mut depth = 0usize;
        let default_start = item.iter().enumerate().find_map(|(idx, token)| {
            if token.is_punct("{") || token.is_punct("(") || token.is_punct("[") {
                depth += 1;
            } else if token.is_punct("}") || token.is_punct(")") || token.is_punct("]") {
                depth = depth.saturating_sub(1);
            } else if depth == 0 && token.is_punct("=") {
                return Some(idx + 1);
            }
            None
        });

        let (has_default, default) = match default_start {
            Some(start) => (true, literal_value(&item[start..])),
            None => (false, None),
        };

        fields.push(PatternField {
            key,
            has_default,
            default,
        });
    }

    fields
}

/// Join tokens back into readable source text.
pub fn tokens_text(tokens: &[Token]) -> String {
    let mut text = String::new();
    let mut previous: Option<&Token> = None;

    for token in tokens {
        if let Some(prev) = previous {
            let no_space_before = [",", ")", "]", ".", ":", "?", ">", ";"]
                .iter()
                .any(|p| token.is_punct(p))
                || (token.is_punct("<") && prev.ident().is_some())
                || (token.is_punct("(") && prev.ident().is_some())
                || (token.is_punct("[") && !prev.is_punct(":") && !prev.is_punct(","));
            let no_space_after = ["(", "[", ".", "<", "..."]
                .iter()
                .any(|p| prev.is_punct(p));
            if !no_space_before && !no_space_after {
                text.push(' ');
            }
        }
        text.push_str(&token.text());
        previous = Some(token);
    }

    text
}
