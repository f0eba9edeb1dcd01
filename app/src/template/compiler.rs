// ==============================================================================
// template/compiler.rs - Template Compiler
// ==============================================================================
// Description: Resolves field names, parses $directives and builds the nested
//              command tree for a template string
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Directives:
//   $if:<field>  $else  $fi                  conditional scope
//   $list:<conjunction>:<field>:<separator>  list-join one field
//   $product:<field>:<type_field>            gene product sentence
//   $include:<dataset>:<field>[:<conj>]      cross-reference expansion
//   $group:<conjunction>:<field>[:<field>]   list-join non-blank fields
//   $0                                       no output
// ==============================================================================

use tracing::{debug, trace};

use crate::schema::FieldSchema;

use super::error::CompileError;
use super::lexer::{Scanner, Token};
use super::node::{estimate_all, Command};
use super::Template;

/// Conjunction used by $include when none is given
pub const DEFAULT_CONJUNCTION: &str = "and";

/// A `$if` whose `$fi` has not been seen yet
struct OpenConditional {
    field: usize,
    then_branch: Vec<Command>,
    else_branch: Option<Vec<Command>>,
}

/// Compile-time state; the if-depth is the number of open conditionals
struct TreeBuilder<'s, S: ?Sized> {
    schema: &'s S,
    root: Vec<Command>,
    open: Vec<OpenConditional>,
}

impl<'s, S: FieldSchema + ?Sized> TreeBuilder<'s, S> {
    fn new(schema: &'s S) -> Self {
        Self {
            schema,
            root: Vec::new(),
            open: Vec::new(),
        }
    }

    /// Sequence new commands are appended to
    fn current(&mut self) -> &mut Vec<Command> {
        match self.open.last_mut() {
            Some(frame) => match &mut frame.else_branch {
                Some(branch) => branch,
                None => &mut frame.then_branch,
            },
            None => &mut self.root,
        }
    }

    fn resolve(&self, name: &str) -> Result<usize, CompileError> {
        self.schema
            .find_field(name.trim())
            .map_err(|_| CompileError::UnknownField(name.trim().to_string()))
    }

    fn push_token(&mut self, token: Token<'_>) -> Result<(), CompileError> {
        match token {
            Token::Literal(text) => {
                self.current().push(Command::Literal(text.to_string()));
                Ok(())
            }
            Token::Field(name) => {
                let index = self.resolve(name)?;
                self.current().push(Command::FieldReference(index));
                Ok(())
            }
            Token::Directive { name, args } => {
                trace!("Directive ${} args={:?}", name, args);
                self.push_directive(name, args)
            }
        }
    }

    fn push_directive(&mut self, name: &str, args: Option<&str>) -> Result<(), CompileError> {
        match name {
            "if" => {
                let field_name = required_args(name, args)?;
                let field = self.resolve(field_name)?;
                self.open.push(OpenConditional {
                    field,
                    then_branch: Vec::new(),
                    else_branch: None,
                });
            }
            "else" => {
                no_args(name, args)?;
                let frame = self
                    .open
                    .last_mut()
                    .ok_or_else(|| CompileError::ElseOrEndifWithoutIf(name.to_string()))?;
                if frame.else_branch.is_some() {
                    return Err(CompileError::DuplicateElse);
                }
                frame.else_branch = Some(Vec::new());
            }
            "fi" => {
                no_args(name, args)?;
                let frame = self
                    .open
                    .pop()
                    .ok_or_else(|| CompileError::ElseOrEndifWithoutIf(name.to_string()))?;
                self.current().push(Command::If {
                    field: frame.field,
                    then_branch: frame.then_branch,
                    else_branch: frame.else_branch,
                });
            }
            "list" => {
                let parts: Vec<&str> = required_args(name, args)?.splitn(3, ':').collect();
                let &[conjunction, field_name, separator] = parts.as_slice() else {
                    return Err(CompileError::malformed(
                        name,
                        format!("expected <conjunction>:<field>:<separator>, got {} argument(s)", parts.len()),
                    ));
                };
                let field = self.resolve(field_name)?;
                self.current().push(Command::List {
                    conjunction: conjunction.to_string(),
                    field,
                    separator: separator.to_string(),
                });
            }
            "product" => {
                let parts: Vec<&str> = required_args(name, args)?.split(':').collect();
                let &[product_name, type_name] = parts.as_slice() else {
                    return Err(CompileError::malformed(
                        name,
                        format!("expected <field>:<type_field>, got {} argument(s)", parts.len()),
                    ));
                };
                let product_field = self.resolve(product_name)?;
                let type_field = self.resolve(type_name)?;
                self.current().push(Command::GeneProduct {
                    product_field,
                    type_field,
                });
            }
            "include" => {
                let parts: Vec<&str> = required_args(name, args)?.splitn(3, ':').collect();
                let (dataset, link_name, conjunction) = match *parts.as_slice() {
                    [dataset, link_name] => (dataset, link_name, DEFAULT_CONJUNCTION),
                    [dataset, link_name, conjunction] => (dataset, link_name, conjunction),
                    _ => {
                        return Err(CompileError::malformed(
                            name,
                            format!(
                                "expected <dataset>:<field>[:<conjunction>], got {} argument(s)",
                                parts.len()
                            ),
                        ))
                    }
                };
                let dataset = dataset.trim();
                if dataset.is_empty() {
                    return Err(CompileError::malformed(name, "dataset name is empty"));
                }
                let link_field = self.resolve(link_name)?;
                self.current().push(Command::Include {
                    dataset: dataset.to_string(),
                    link_field,
                    conjunction: conjunction.to_string(),
                });
            }
            "group" => {
                let parts: Vec<&str> = required_args(name, args)?.split(':').collect();
                let Some((conjunction, member_names)) = parts.split_first() else {
                    return Err(CompileError::malformed(name, "missing arguments"));
                };
                if member_names.is_empty() {
                    return Err(CompileError::malformed(
                        name,
                        "expected <conjunction>:<field>[:<field>...]",
                    ));
                }
                let members = member_names
                    .iter()
                    .map(|member| self.resolve(member))
                    .collect::<Result<Vec<_>, _>>()?;
                self.current().push(Command::Group {
                    conjunction: conjunction.to_string(),
                    members,
                });
            }
            "0" => {
                no_args(name, args)?;
                self.current().push(Command::Null);
            }
            other => return Err(CompileError::UnknownDirective(other.to_string())),
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<Command>, CompileError> {
        if !self.open.is_empty() {
            return Err(CompileError::UnbalancedConditional {
                open: self.open.len(),
            });
        }
        Ok(self.root)
    }
}

fn required_args<'a>(directive: &str, args: Option<&'a str>) -> Result<&'a str, CompileError> {
    match args {
        Some(args) if !args.trim().is_empty() => Ok(args),
        _ => Err(CompileError::malformed(directive, "missing arguments")),
    }
}

fn no_args(directive: &str, args: Option<&str>) -> Result<(), CompileError> {
    match args {
        None => Ok(()),
        Some(args) => Err(CompileError::malformed(
            directive,
            format!("takes no arguments, got '{args}'"),
        )),
    }
}

/// Compile template text against a field schema
///
/// # Arguments
/// * `text` - Template source: literal text, `{{field}}` references and
///   `{{$directive[:args]}}` expressions
/// * `schema` - Name-to-index lookup for the records the template will see
///
/// # Returns
/// * `Ok(Template)` - Every name resolved and every `$if` closed
/// * `Err(CompileError)` - The first problem found; nothing is built
pub fn compile<S: FieldSchema + ?Sized>(text: &str, schema: &S) -> Result<Template, CompileError> {
    let mut builder = TreeBuilder::new(schema);
    for token in Scanner::new(text) {
        builder.push_token(token)?;
    }
    let commands = builder.finish()?;
    let estimated_size = estimate_all(&commands);

    debug!(
        "Compiled template: {} top-level commands, estimated {} bytes per record",
        commands.len(),
        estimated_size
    );

    Ok(Template {
        commands,
        estimated_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Header;

    fn schema() -> Header {
        Header::new(["a", "b", "gene", "product", "type", "names"])
    }

    #[test]
    fn test_literal_and_field_commands() {
        let template = compile("gene {{gene}}!", &schema()).unwrap();
        assert_eq!(
            template.commands(),
            &[
                Command::Literal("gene ".into()),
                Command::FieldReference(2),
                Command::Literal("!".into()),
            ]
        );
        assert_eq!(template.estimated_size(), "gene ".len() + 10 + 1);
    }

    #[test]
    fn test_nested_conditionals_build_tree() {
        let template = compile("{{$if:a}}{{$if:b}}Y{{$fi}}{{$else}}N{{$fi}}", &schema()).unwrap();
        assert_eq!(
            template.commands(),
            &[Command::If {
                field: 0,
                then_branch: vec![Command::If {
                    field: 1,
                    then_branch: vec![Command::Literal("Y".into())],
                    else_branch: None,
                }],
                else_branch: Some(vec![Command::Literal("N".into())]),
            }]
        );
    }

    #[test]
    fn test_directive_arguments() {
        let template = compile(
            "{{$list:or:names: ## }}{{$product:product:type}}{{$include:operons:gene}}{{$include:go:gene:or}}{{$group:and:a:b}}{{$0}}",
            &schema(),
        )
        .unwrap();
        assert_eq!(
            template.commands(),
            &[
                Command::List {
                    conjunction: "or".into(),
                    field: 5,
                    separator: " ## ".into(),
                },
                Command::GeneProduct {
                    product_field: 3,
                    type_field: 4,
                },
                Command::Include {
                    dataset: "operons".into(),
                    link_field: 2,
                    conjunction: "and".into(),
                },
                Command::Include {
                    dataset: "go".into(),
                    link_field: 2,
                    conjunction: "or".into(),
                },
                Command::Group {
                    conjunction: "and".into(),
                    members: vec![0, 1],
                },
                Command::Null,
            ]
        );
    }

    #[test]
    fn test_list_separator_may_contain_colon() {
        let template = compile("{{$list:and:names:::}}", &schema()).unwrap();
        assert_eq!(
            template.commands(),
            &[Command::List {
                conjunction: "and".into(),
                field: 5,
                separator: "::".into(),
            }]
        );
    }

    #[test]
    fn test_unknown_field() {
        assert_eq!(
            compile("{{nosuch}}", &schema()).unwrap_err(),
            CompileError::UnknownField("nosuch".into())
        );
        assert_eq!(
            compile("{{$if:nosuch}}x{{$fi}}", &schema()).unwrap_err(),
            CompileError::UnknownField("nosuch".into())
        );
    }

    #[test]
    fn test_unknown_directive() {
        assert_eq!(
            compile("{{$loop:a}}", &schema()).unwrap_err(),
            CompileError::UnknownDirective("loop".into())
        );
    }

    #[test]
    fn test_malformed_arguments() {
        for text in [
            "{{$list:and:names}}",
            "{{$product:product}}",
            "{{$product:product:type:gene}}",
            "{{$include:operons}}",
            "{{$include::gene}}",
            "{{$group:and}}",
            "{{$if}}",
            "{{$if:a}}{{$else:x}}{{$fi}}",
            "{{$0:x}}",
        ] {
            assert!(
                matches!(
                    compile(text, &schema()),
                    Err(CompileError::MalformedDirectiveArguments { .. })
                ),
                "{text} should be malformed"
            );
        }
    }

    #[test]
    fn test_unbalanced_conditionals() {
        assert_eq!(
            compile("{{$if:a}}Y", &schema()).unwrap_err(),
            CompileError::UnbalancedConditional { open: 1 }
        );
        assert_eq!(
            compile("{{$fi}}", &schema()).unwrap_err(),
            CompileError::ElseOrEndifWithoutIf("fi".into())
        );
        assert_eq!(
            compile("x{{$else}}", &schema()).unwrap_err(),
            CompileError::ElseOrEndifWithoutIf("else".into())
        );
        assert_eq!(
            compile("{{$if:a}}{{$else}}{{$else}}{{$fi}}", &schema()).unwrap_err(),
            CompileError::DuplicateElse
        );
    }
}
