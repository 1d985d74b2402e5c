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

//! Placeholder translators
//!
//! A translator turns a parameter name into the dialect-specific
//! placeholder written into the query text for a `#{name}` token.

use std::cell::Cell;

/// Dialect-specific placeholder generator
pub trait Translator {
    fn translate(&self, name: &str) -> String;
}

impl<F: Fn(&str) -> String> Translator for F {
    fn translate(&self, name: &str) -> String {
        self(name)
    }
}

/// `?` for every placeholder (MySQL, SQLite)
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionMark;

impl Translator for QuestionMark {
    fn translate(&self, _name: &str) -> String {
        "?".to_string()
    }
}

/// `$1`, `$2`, ... in render order (PostgreSQL)
///
/// Numbering continues across renders; use a fresh instance per render or
/// call [`reset`](Self::reset).
#[derive(Debug)]
pub struct DollarNumbered {
    next: Cell<usize>,
}

impl DollarNumbered {
    pub fn new() -> Self {
        Self { next: Cell::new(1) }
    }

    pub fn reset(&self) {
        self.next.set(1);
    }
}

impl Default for DollarNumbered {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for DollarNumbered {
    fn translate(&self, _name: &str) -> String {
        let n = self.next.get();
        self.next.set(n + 1);
        format!("${}", n)
    }
}

/// `:name` (Oracle)
#[derive(Debug, Clone, Copy, Default)]
pub struct ColonNamed;

impl Translator for ColonNamed {
    fn translate(&self, name: &str) -> String {
        format!(":{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_mark() {
        assert_eq!(QuestionMark.translate("id"), "?");
    }

    #[test]
    fn test_dollar_numbered() {
        let t = DollarNumbered::new();
        assert_eq!(t.translate("a"), "$1");
        assert_eq!(t.translate("a"), "$2");
        t.reset();
        assert_eq!(t.translate("b"), "$1");
    }

    #[test]
    fn test_colon_named_and_closures() {
        assert_eq!(ColonNamed.translate("user.id"), ":user.id");
        let at = |name: &str| format!("@{}", name);
        assert_eq!(at.translate("id"), "@id");
    }
}
