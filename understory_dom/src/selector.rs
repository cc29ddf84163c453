// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compound selectors: `tag`, `#id`, `.class`, `[attr]`, and `[attr=value]`.
//!
//! Combinators, pseudo-classes and selector lists are rejected at parse time.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::DomError;

#[derive(Clone, Debug, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    value: Option<String>,
}

/// A parsed compound selector.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selector {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn ident(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        &self.src[start..self.pos]
    }
}

impl Selector {
    /// Parse a compound selector.
    pub fn parse(selector: &str) -> Result<Self, DomError> {
        let err = |reason| DomError::Selector {
            selector: selector.into(),
            reason,
        };
        let src = selector.trim();
        if src.is_empty() {
            return Err(err("empty selector"));
        }
        let mut cur = Cursor { src, pos: 0 };
        let mut out = Self::default();

        if cur.peek() == Some('*') {
            cur.bump();
        } else {
            let tag = cur.ident();
            if !tag.is_empty() {
                out.tag = Some(tag.to_ascii_lowercase());
            }
        }

        while let Some(c) = cur.bump() {
            match c {
                '#' => {
                    let id = cur.ident();
                    if id.is_empty() {
                        return Err(err("expected an id after `#`"));
                    }
                    out.id = Some(id.into());
                }
                '.' => {
                    let class = cur.ident();
                    if class.is_empty() {
                        return Err(err("expected a class after `.`"));
                    }
                    out.classes.push(class.into());
                }
                '[' => {
                    let name = cur.ident();
                    if name.is_empty() {
                        return Err(err("expected an attribute name after `[`"));
                    }
                    let value = match cur.bump() {
                        Some(']') => None,
                        Some('=') => {
                            let value = match cur.peek() {
                                Some(q @ ('"' | '\'')) => {
                                    cur.bump();
                                    let start = cur.pos;
                                    loop {
                                        match cur.bump() {
                                            Some(c) if c == q => break,
                                            Some(_) => {}
                                            None => return Err(err("unterminated quoted value")),
                                        }
                                    }
                                    &src[start..cur.pos - 1]
                                }
                                _ => cur.ident(),
                            };
                            if cur.bump() != Some(']') {
                                return Err(err("expected `]`"));
                            }
                            Some(value.into())
                        }
                        _ => return Err(err("expected `]` or `=`")),
                    };
                    out.attrs.push(AttrMatch {
                        name: name.to_ascii_lowercase(),
                        value,
                    });
                }
                _ => return Err(err("unsupported selector syntax")),
            }
        }
        Ok(out)
    }

    /// Test an element's tag and attributes against this selector.
    pub(crate) fn matches(&self, tag: &str, attributes: &BTreeMap<String, String>) -> bool {
        if self.tag.as_deref().is_some_and(|t| t != tag) {
            return false;
        }
        if let Some(id) = &self.id
            && attributes.get("id") != Some(id)
        {
            return false;
        }
        if !self.classes.is_empty() {
            let Some(class_attr) = attributes.get("class") else {
                return false;
            };
            if !self
                .classes
                .iter()
                .all(|c| class_attr.split_ascii_whitespace().any(|have| have == c))
            {
                return false;
            }
        }
        self.attrs.iter().all(|m| match (&m.value, attributes.get(&m.name)) {
            (_, None) => false,
            (None, Some(_)) => true,
            (Some(want), Some(have)) => want == have,
        })
    }
}
