// ==============================================================================
// template/mod.rs - Line Template Engine
// ==============================================================================
// Description: Compiles human-authored line templates against a record schema
//              and applies them to records to produce sentences
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Usage:
//   let template = Template::compile("{{gene}} encodes {{$product:product:type}}", &header)?;
//   for record in records {
//       let line = template.apply_with(&record, &cache)?;
//   }
// ==============================================================================

pub mod compiler;
pub mod error;
pub mod lexer;
pub mod node;
pub mod stack;

pub use compiler::compile;
pub use error::{ApplyError, CompileError};
pub use node::Command;
pub use stack::ConditionalStack;

use tracing::trace;

use crate::cache::{GlobalCache, NoCache};
use crate::schema::{FieldSchema, Record};

/// A compiled line template bound to one record schema
///
/// Immutable once built; one template can be applied to any number of
/// records, from any number of threads, each application using its own
/// conditional stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    commands: Vec<Command>,
    estimated_size: usize,
}

impl Template {
    /// Compile template text; see [`compiler::compile`]
    pub fn compile<S: FieldSchema + ?Sized>(text: &str, schema: &S) -> Result<Self, CompileError> {
        compile(text, schema)
    }

    /// Top-level commands in output order
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Expected output length per record (a buffer hint only)
    pub fn estimated_size(&self) -> usize {
        self.estimated_size
    }

    /// Translate one record, with no cross-reference datasets available
    ///
    /// Templates using `$include` fail here; use [`Template::apply_with`].
    pub fn apply<R: Record + ?Sized>(&self, record: &R) -> Result<String, ApplyError> {
        self.apply_with(record, &NoCache)
    }

    /// Translate one record, resolving `$include` against `cache`
    pub fn apply_with<R: Record + ?Sized>(
        &self,
        record: &R,
        cache: &dyn GlobalCache,
    ) -> Result<String, ApplyError> {
        let mut stack = ConditionalStack::new();
        let mut out = String::with_capacity(self.estimated_size);
        node::render_all(&self.commands, record, &mut stack, cache, &mut out)?;
        debug_assert_eq!(stack.depth(), 1, "conditional stack must return to the root scope");
        trace!("Translated record into {} bytes", out.len());
        Ok(out)
    }
}
