// ==============================================================================
// parsers/mod.rs - File parser modules
// ==============================================================================
// Description: Record sources for line templates
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

pub mod table;

pub use table::{TableError, TableReader};
