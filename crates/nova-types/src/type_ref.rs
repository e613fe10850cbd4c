//! Java type reference syntax used by hand-authored registries.
//!
//! Parsing is purely syntactic: `java.util.Map<K, java.util.List<? extends V>>[]` becomes a
//! [`TypeRef`] tree, and name resolution happens later against a [`crate::TypeStore`] and the
//! type variables in scope.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A (possibly qualified) name with optional type arguments. `void` parses as a name too.
    Named { name: String, args: Vec<TypeRef> },
    Wildcard(WildcardRef),
    Array(Box<TypeRef>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WildcardRef {
    Unbounded,
    Extends(Box<TypeRef>),
    Super(Box<TypeRef>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid type reference `{text}` at offset {offset}: {message}")]
pub struct TypeRefError {
    pub text: String,
    pub offset: usize,
    pub message: &'static str,
}

pub fn parse_type_ref(text: &str) -> Result<TypeRef, TypeRefError> {
    let mut parser = Parser { text, pos: 0 };
    let ty = parser.parse_type()?;
    parser.skip_ws();
    if !parser.is_eof() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(ty)
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn parse_type(&mut self) -> Result<TypeRef, TypeRefError> {
        self.skip_ws();
        if self.is_eof() {
            return Err(self.error("expected a type"));
        }

        let ty = if self.consume_char('?') {
            self.parse_wildcard()?
        } else {
            self.parse_named()?
        };
        Ok(self.parse_suffixes(ty))
    }

    fn parse_wildcard(&mut self) -> Result<TypeRef, TypeRefError> {
        let bound = if self.consume_keyword("extends") {
            WildcardRef::Extends(Box::new(self.parse_type()?))
        } else if self.consume_keyword("super") {
            WildcardRef::Super(Box::new(self.parse_type()?))
        } else {
            WildcardRef::Unbounded
        };
        Ok(TypeRef::Wildcard(bound))
    }

    fn parse_named(&mut self) -> Result<TypeRef, TypeRefError> {
        let Some(name) = self.parse_qualified_ident() else {
            return Err(self.error("expected an identifier"));
        };

        let args = if self.consume_char('<') {
            self.parse_type_args()?
        } else {
            Vec::new()
        };
        Ok(TypeRef::Named { name, args })
    }

    fn parse_type_args(&mut self) -> Result<Vec<TypeRef>, TypeRefError> {
        let mut args = Vec::new();
        loop {
            args.push(self.parse_type()?);
            if self.consume_char(',') {
                continue;
            }
            if self.consume_char('>') {
                return Ok(args);
            }
            if self.is_eof() {
                return Err(self.error("unterminated type argument list (missing `>`)"));
            }
            return Err(self.error("expected `,` or `>` in type argument list"));
        }
    }

    fn parse_suffixes(&mut self, mut ty: TypeRef) -> TypeRef {
        loop {
            if self.consume_str("[]") || self.consume_str("...") {
                ty = TypeRef::Array(Box::new(ty));
                continue;
            }
            return ty;
        }
    }

    fn parse_qualified_ident(&mut self) -> Option<String> {
        self.skip_ws();
        let start = self.pos;
        let mut chars = self.rest().char_indices();
        let (_, first) = chars.next()?;
        if !is_ident_start(first) {
            return None;
        }

        let mut end = start + first.len_utf8();
        let mut prev_dot = false;
        for (idx, ch) in chars {
            if is_ident_part(ch) {
                prev_dot = false;
            } else if ch == '.' && !prev_dot && !self.text[start + idx..].starts_with("...") {
                prev_dot = true;
            } else {
                break;
            }
            end = start + idx + ch.len_utf8();
        }
        if prev_dot {
            end -= 1;
        }

        self.pos = end;
        Some(self.text[start..end].to_string())
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn rest(&self) -> &str {
        self.text.get(self.pos..).unwrap_or("")
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.text.len() - trimmed.len();
    }

    fn consume_char(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.rest().starts_with(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn consume_str(&mut self, s: &str) -> bool {
        self.skip_ws();
        if self.rest().starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    fn consume_keyword(&mut self, kw: &str) -> bool {
        self.skip_ws();
        let matched = self.rest().strip_prefix(kw).is_some_and(|after| {
            after
                .chars()
                .next()
                .map_or(true, |ch| !is_ident_part(ch))
        });
        if matched {
            self.pos += kw.len();
            true
        } else {
            false
        }
    }

    fn error(&self, message: &'static str) -> TypeRefError {
        TypeRefError {
            text: self.text.to_string(),
            offset: self.pos,
            message,
        }
    }
}

fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_ident_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}
