// ==============================================================================
// template/lexer.rs - Template Scanner
// ==============================================================================
// Description: Splits template text into literal runs, field references and
//              $directives
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Syntax:
//   The gene {{locus_tag}} {{$if:pseudo}}is a pseudogene{{$fi}}.
//   ^literal  ^field        ^directive with args      ^directive
// ==============================================================================

use regex::Regex;
use std::sync::LazyLock;

// Shortest text between the delimiters; unterminated "{{" stays literal
static RE_VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{\{(.*?)\}\}").expect("valid template variable regex"));

/// Sigil that marks a variable as a directive
pub const DIRECTIVE_SIGIL: char = '$';

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Literal text between variables
    Literal(&'a str),
    /// `{{name}}`, name trimmed
    Field(&'a str),
    /// `{{$name}}` or `{{$name:args}}`; name trimmed, args verbatim
    Directive { name: &'a str, args: Option<&'a str> },
}

/// Iterator over the tokens of a template string
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    cursor: usize,
    pending: Option<Token<'a>>,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            cursor: 0,
            pending: None,
        }
    }

    fn classify(expression: &'a str) -> Token<'a> {
        let trimmed = expression.trim_start();
        match trimmed.strip_prefix(DIRECTIVE_SIGIL) {
            Some(directive) => match directive.split_once(':') {
                Some((name, args)) => Token::Directive {
                    name: name.trim(),
                    args: Some(args),
                },
                None => Token::Directive {
                    name: directive.trim(),
                    args: None,
                },
            },
            None => Token::Field(expression.trim()),
        }
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }
        if self.cursor >= self.input.len() {
            return None;
        }

        let rest = &self.input[self.cursor..];
        match RE_VARIABLE.captures(rest) {
            Some(caps) => {
                let whole = caps.get(0)?;
                let expression = caps.get(1).map_or("", |m| m.as_str());
                let token = Self::classify(expression);
                let prefix = &rest[..whole.start()];
                self.cursor += whole.end();

                if prefix.is_empty() {
                    Some(token)
                } else {
                    self.pending = Some(token);
                    Some(Token::Literal(prefix))
                }
            }
            None => {
                self.cursor = self.input.len();
                Some(Token::Literal(rest))
            }
        }
    }
}
