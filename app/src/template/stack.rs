// ==============================================================================
// template/stack.rs - Conditional Stack
// ==============================================================================
// Description: LIFO stack of effective truth values for nested $if scopes
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Invariant: the bottom entry is the always-true root scope, and every entry
// above it is the AND of its own condition and the entry below it.
// ==============================================================================

/// Stack of conditional scopes for one template application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalStack {
    scopes: Vec<bool>,
}

impl Default for ConditionalStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ConditionalStack {
    /// Create a stack holding only the root scope
    pub fn new() -> Self {
        let mut scopes = Vec::with_capacity(8);
        scopes.push(true);
        Self { scopes }
    }

    /// Open a scope whose effective truth is `flag AND peek()`
    pub fn push(&mut self, flag: bool) {
        let top = flag && self.peek();
        self.scopes.push(top);
    }

    /// Effective truth of the innermost scope
    pub fn peek(&self) -> bool {
        self.scopes.last().copied().unwrap_or(true)
    }

    /// Switch the innermost scope to its else branch
    ///
    /// The top is inverted only when the enclosing scope is true; under a
    /// false parent both branches stay silent.
    pub fn flip_if_parent_true(&mut self) {
        let depth = self.scopes.len();
        if depth < 2 {
            return;
        }
        if self.scopes[depth - 2] {
            self.scopes[depth - 1] = !self.scopes[depth - 1];
        }
    }

    /// Close the innermost scope
    pub fn pop(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Number of open scopes, root included
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}
