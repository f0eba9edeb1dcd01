// ==============================================================================
// generators/mod.rs - Text Generators
// ==============================================================================
// Description: Self-contained text-production algorithms used by template
//              directives ($list, $product, $include, $group)
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

pub mod gene_product;
pub mod list;

pub use gene_product::{amino_acid_name, describe_product, indefinite_article, strip_comment};
pub use list::{join_list, split_and_join};
