// ==============================================================================
// lib.rs - Line Template Library
// ==============================================================================
// Description: Library interface for the genome feature line-template engine
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

pub mod cache;
pub mod generators;
pub mod parsers;
pub mod processor;
pub mod schema;
pub mod template;

pub use cache::{DatasetCache, GlobalCache};
pub use schema::{FieldSchema, Header, Record};
pub use template::{ApplyError, CompileError, Template};
