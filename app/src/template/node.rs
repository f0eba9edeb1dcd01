// ==============================================================================
// template/node.rs - Compiled Template Commands
// ==============================================================================
// Description: Closed set of command nodes a template compiles to, and their
//              per-record translation into text
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Every field index stored in a command was resolved against the schema at
// compile time; nothing here looks a name up again.
// ==============================================================================

use crate::cache::GlobalCache;
use crate::generators::{describe_product, join_list, split_and_join};
use crate::schema::Record;

use super::error::ApplyError;
use super::stack::ConditionalStack;

/// Output size hint for one field reference
pub const FIELD_ESTIMATE: usize = 10;
/// Output size hint for one gene product sentence
pub const PRODUCT_ESTIMATE: usize = 80;
/// Output size hint for one cross-reference expansion
pub const INCLUDE_ESTIMATE: usize = 40;

/// One compiled unit of template output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Text copied verbatim
    Literal(String),

    /// Value of one record field
    FieldReference(usize),

    /// Conditional scope on a field's boolean reading
    If {
        field: usize,
        then_branch: Vec<Command>,
        else_branch: Option<Vec<Command>>,
    },

    /// A separator-delimited field rendered as an English list
    List {
        conjunction: String,
        field: usize,
        separator: String,
    },

    /// Sentence synthesized from a product annotation and a feature type
    GeneProduct { product_field: usize, type_field: usize },

    /// Expansions of a field value looked up in an auxiliary dataset
    Include {
        dataset: String,
        link_field: usize,
        conjunction: String,
    },

    /// The non-blank values of several fields rendered as an English list
    Group {
        conjunction: String,
        members: Vec<usize>,
    },

    /// Produces nothing
    Null,
}

impl Command {
    /// Estimated output length, used only to presize the output buffer
    pub fn estimate(&self) -> usize {
        match self {
            Command::Literal(text) => text.len(),
            Command::FieldReference(_) | Command::List { .. } => FIELD_ESTIMATE,
            Command::If {
                then_branch,
                else_branch,
                ..
            } => {
                let then_size = estimate_all(then_branch);
                match else_branch {
                    Some(branch) => then_size.max(estimate_all(branch)),
                    None => then_size,
                }
            }
            Command::GeneProduct { .. } => PRODUCT_ESTIMATE,
            Command::Include { .. } => INCLUDE_ESTIMATE,
            Command::Group { members, .. } => FIELD_ESTIMATE * members.len(),
            Command::Null => 0,
        }
    }

    /// Translate this command for one record
    pub fn translate<R: Record + ?Sized>(
        &self,
        record: &R,
        stack: &mut ConditionalStack,
        cache: &dyn GlobalCache,
    ) -> Result<String, ApplyError> {
        let mut out = String::new();
        self.render_into(record, stack, cache, &mut out)?;
        Ok(out)
    }

    /// Append this command's text for one record to `out`
    pub(crate) fn render_into<R: Record + ?Sized>(
        &self,
        record: &R,
        stack: &mut ConditionalStack,
        cache: &dyn GlobalCache,
        out: &mut String,
    ) -> Result<(), ApplyError> {
        if let Command::If {
            field,
            then_branch,
            else_branch,
        } = self
        {
            let flag = record.flag(*field)?;
            stack.push(flag);
            let mut result = render_all(then_branch, record, stack, cache, out);
            if result.is_ok() {
                if let Some(branch) = else_branch {
                    stack.flip_if_parent_true();
                    result = render_all(branch, record, stack, cache, out);
                }
            }
            stack.pop();
            return result;
        }

        if !stack.peek() {
            return Ok(());
        }

        match self {
            Command::Literal(text) => out.push_str(text),
            Command::FieldReference(index) => out.push_str(record.field(*index)),
            Command::List {
                conjunction,
                field,
                separator,
            } => out.push_str(&split_and_join(record.field(*field), conjunction, separator)),
            Command::GeneProduct {
                product_field,
                type_field,
            } => out.push_str(&describe_product(
                record.field(*product_field),
                record.field(*type_field),
            )),
            Command::Include {
                dataset,
                link_field,
                conjunction,
            } => {
                // Dataset keys are stored trimmed
                let key = record.field(*link_field).trim();
                let expansions = cache.lookup(dataset, key)?;
                out.push_str(&join_list(&expansions, conjunction, " "));
            }
            Command::Group {
                conjunction,
                members,
            } => {
                let present: Vec<&str> = members
                    .iter()
                    .map(|index| record.field(*index).trim())
                    .filter(|value| !value.is_empty())
                    .collect();
                out.push_str(&join_list(&present, conjunction, ", "));
            }
            Command::Null | Command::If { .. } => {}
        }

        Ok(())
    }
}

pub(crate) fn estimate_all(commands: &[Command]) -> usize {
    commands.iter().map(Command::estimate).sum()
}

pub(crate) fn render_all<R: Record + ?Sized>(
    commands: &[Command],
    record: &R,
    stack: &mut ConditionalStack,
    cache: &dyn GlobalCache,
    out: &mut String,
) -> Result<(), ApplyError> {
    for command in commands {
        command.render_into(record, stack, cache, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{DatasetCache, NoCache};

    fn translate(command: &Command, record: &[&str]) -> String {
        let mut stack = ConditionalStack::new();
        let text = command.translate(record, &mut stack, &NoCache).unwrap();
        assert_eq!(stack.depth(), 1);
        text
    }

    #[test]
    fn test_literal_and_field() {
        assert_eq!(translate(&Command::Literal("abc".into()), &[]), "abc");
        assert_eq!(translate(&Command::FieldReference(1), &["x", "y"]), "y");
    }

    #[test]
    fn test_output_suppressed_under_false_scope() {
        let mut stack = ConditionalStack::new();
        stack.push(false);
        let record = ["hello"];

        for command in [
            Command::Literal("text".into()),
            Command::FieldReference(0),
            Command::List {
                conjunction: "and".into(),
                field: 0,
                separator: ",".into(),
            },
            Command::Group {
                conjunction: "and".into(),
                members: vec![0],
            },
        ] {
            assert_eq!(command.translate(&record[..], &mut stack, &NoCache).unwrap(), "");
        }
    }

    #[test]
    fn test_suppressed_include_skips_lookup() {
        let mut stack = ConditionalStack::new();
        stack.push(false);
        let command = Command::Include {
            dataset: "missing".into(),
            link_field: 0,
            conjunction: "and".into(),
        };
        // NoCache would fail if consulted
        assert_eq!(command.translate(&["k"][..], &mut stack, &NoCache).unwrap(), "");
    }

    #[test]
    fn test_if_selects_branch() {
        let command = Command::If {
            field: 0,
            then_branch: vec![Command::Literal("Y".into())],
            else_branch: Some(vec![Command::Literal("N".into())]),
        };
        assert_eq!(translate(&command, &["1"]), "Y");
        assert_eq!(translate(&command, &["0"]), "N");
    }

    #[test]
    fn test_null_ignores_scope() {
        assert_eq!(translate(&Command::Null, &[]), "");
    }

    #[test]
    fn test_include_joins_with_spaces() {
        let mut cache = DatasetCache::new();
        cache.insert("operons", "b0001", "thrL");
        cache.insert("operons", "b0001", "thrA");
        cache.insert("operons", "b0001", "thrB");
        let command = Command::Include {
            dataset: "operons".into(),
            link_field: 0,
            conjunction: "and".into(),
        };

        let mut stack = ConditionalStack::new();
        let text = command.translate(&[" b0001 "][..], &mut stack, &cache).unwrap();
        assert_eq!(text, "thrL thrA and thrB");
    }

    #[test]
    fn test_group_uses_non_blank_members() {
        let command = Command::Group {
            conjunction: "and".into(),
            members: vec![0, 1, 2],
        };
        assert_eq!(translate(&command, &["kinase", " ", "ligase"]), "kinase and ligase");
        assert_eq!(translate(&command, &["", "", ""]), "");
        assert_eq!(translate(&command, &["a", "b", "c"]), "a, b and c");
    }

    #[test]
    fn test_if_estimate_takes_larger_branch() {
        let command = Command::If {
            field: 0,
            then_branch: vec![Command::Literal("short".into())],
            else_branch: Some(vec![
                Command::Literal("much longer".into()),
                Command::FieldReference(1),
            ]),
        };
        assert_eq!(command.estimate(), "much longer".len() + FIELD_ESTIMATE);
    }
}
