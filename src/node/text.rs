// Copyright 2025 Sqlweave Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Text nodes with `#{}` and `${}` placeholders

use std::fmt;
use std::sync::Arc;

use super::{Node, Rendered, Translator};
use crate::common::string_pool;
use crate::core::{Error, Result, Value};
use crate::eval::{global_cache, Expression};
use crate::params::{lookup_path, Parameters};

/// How a placeholder is written into the query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    /// `#{...}`: a dialect placeholder plus one argument
    Bind,
    /// `${...}`: the value's string form, inline
    Raw,
}

#[derive(Debug, Clone)]
enum Source {
    /// Dotted parameter path
    Path,
    /// Anything else, compiled as an expression
    Expr(Arc<Expression>),
}

/// One placeholder occurrence
#[derive(Debug, Clone)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    /// Byte offset of the opening `#` or `$`
    pub start: usize,
    /// Byte offset one past the closing `}`
    pub end: usize,
    /// Trimmed placeholder content
    pub name: String,
    source: Source,
}

/// Static SQL text, optionally carrying placeholders
///
/// Placeholders are substituted in order of occurrence. A name used twice
/// produces two arguments. An unterminated `#{` is kept as literal text.
pub struct TextNode {
    text: String,
    placeholders: Vec<Placeholder>,
}

impl TextNode {
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        let placeholders = scan(&text)?;
        Ok(Self { text, placeholders })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    fn resolve(&self, placeholder: &Placeholder, params: &dyn Parameters) -> Result<Value> {
        match &placeholder.source {
            Source::Path => lookup_path(params, &placeholder.name)
                .ok_or_else(|| Error::ParameterNotFound(placeholder.name.clone())),
            Source::Expr(expr) => expr
                .evaluate(params)
                .map_err(|e| e.in_node(format!("text {:?}", self.text))),
        }
    }
}

impl Node for TextNode {
    fn render(&self, translator: &dyn Translator, params: &dyn Parameters) -> Result<Rendered> {
        if self.placeholders.is_empty() {
            return Ok((self.text.clone(), Vec::new()));
        }

        let mut out = string_pool().get();
        let mut args = Vec::with_capacity(self.placeholders.len());
        let mut last = 0;
        for placeholder in &self.placeholders {
            out.push_str(&self.text[last..placeholder.start]);
            let value = match self.resolve(placeholder, params) {
                Ok(value) => value,
                Err(err) => {
                    string_pool().put(out);
                    return Err(err);
                }
            };
            match placeholder.kind {
                PlaceholderKind::Bind => {
                    out.push_str(&translator.translate(&placeholder.name));
                    args.push(value);
                }
                PlaceholderKind::Raw => out.push_str(&value.to_string()),
            }
            last = placeholder.end;
        }
        out.push_str(&self.text[last..]);

        let query = out.as_str().to_string();
        string_pool().put(out);
        Ok((query, args))
    }
}

impl fmt::Debug for TextNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TextNode").field(&self.text).finish()
    }
}

/// Find every well-formed placeholder in `text`
fn scan(text: &str) -> Result<Vec<Placeholder>> {
    let bytes = text.as_bytes();
    let mut placeholders = Vec::new();
    let mut i = 0;
    while i + 1 < bytes.len() {
        let kind = match (bytes[i], bytes[i + 1]) {
            (b'#', b'{') => PlaceholderKind::Bind,
            (b'$', b'{') => PlaceholderKind::Raw,
            _ => {
                i += 1;
                continue;
            }
        };
        let Some(close) = text[i + 2..].find('}') else {
            break;
        };
        let close = i + 2 + close;
        let name = text[i + 2..close].trim();
        if name.is_empty() {
            return Err(Error::invalid_node(
                "text",
                format!("empty placeholder at byte {}", i),
            ));
        }
        let source = if is_path(name) {
            Source::Path
        } else {
            Source::Expr(global_cache().get_or_compile(name)?)
        };
        placeholders.push(Placeholder {
            kind,
            start: i,
            end: close + 1,
            name: name.to_string(),
            source,
        });
        i = close + 1;
    }
    Ok(placeholders)
}

/// `a`, `a.b`, `items.0.Name`
fn is_path(s: &str) -> bool {
    s.split('.').all(|segment| {
        !segment.is_empty() && segment.chars().all(|c| c.is_alphanumeric() || c == '_')
    })
}
