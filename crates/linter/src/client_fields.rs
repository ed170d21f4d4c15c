//! Apollo local-state fields.
//!
//! Fields marked `@client` are resolved on the client, so the server schema
//! knows nothing about them. They are dropped before validation.

use std::collections::{HashMap, HashSet};

use apollo_compiler::ast;

const CLIENT_DIRECTIVE: &str = "client";

/// Removes every `@client` field (with its sub-selections) from `document`.
///
/// Returns `false` when the first operation has nothing left to validate.
pub fn strip_client_fields(document: &mut ast::Document) -> bool {
    for definition in &mut document.definitions {
        match definition {
            ast::Definition::OperationDefinition(operation) => {
                strip_selections(&mut operation.make_mut().selection_set);
            }
            ast::Definition::FragmentDefinition(fragment) => {
                strip_selections(&mut fragment.make_mut().selection_set);
            }
            _ => {}
        }
    }
    first_operation_has_selections(document)
}

fn strip_selections(selections: &mut Vec<ast::Selection>) {
    selections.retain(|selection| match selection {
        ast::Selection::Field(field) => field.directives.get(CLIENT_DIRECTIVE).is_none(),
        _ => true,
    });
    for selection in selections {
        match selection {
            ast::Selection::Field(field) if !field.selection_set.is_empty() => {
                strip_selections(&mut field.make_mut().selection_set);
            }
            ast::Selection::InlineFragment(inline) => {
                strip_selections(&mut inline.make_mut().selection_set);
            }
            _ => {}
        }
    }
}

fn first_operation_has_selections(document: &ast::Document) -> bool {
    let fragments: HashMap<&str, &ast::FragmentDefinition> = document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            ast::Definition::FragmentDefinition(fragment) => {
                Some((fragment.name.as_str(), &**fragment))
            }
            _ => None,
        })
        .collect();
    let operation = document.definitions.iter().find_map(|definition| match definition {
        ast::Definition::OperationDefinition(operation) => Some(operation),
        _ => None,
    });
    operation.map_or(true, |operation| {
        is_not_empty(&operation.selection_set, &fragments, &mut HashSet::new())
    })
}

/// A spread of a fragment that is itself empty does not count. Unknown
/// fragments are assumed to select something.
fn is_not_empty<'d>(
    selections: &'d [ast::Selection],
    fragments: &HashMap<&'d str, &'d ast::FragmentDefinition>,
    visited: &mut HashSet<&'d str>,
) -> bool {
    selections.iter().any(|selection| match selection {
        ast::Selection::FragmentSpread(spread) => {
            let name = spread.fragment_name.as_str();
            match fragments.get(name) {
                Some(fragment) => {
                    visited.insert(name) && is_not_empty(&fragment.selection_set, fragments, visited)
                }
                None => true,
            }
        }
        _ => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip(query: &str) -> (bool, String) {
        let mut document = ast::Document::parse(query, "query.graphql").unwrap();
        let keep = strip_client_fields(&mut document);
        (keep, document.to_string())
    }

    #[test]
    fn removes_client_fields() {
        let (keep, printed) = strip("{ number isLoggedIn @client greetings { hello local @client } }");
        assert!(keep);
        assert!(!printed.contains("isLoggedIn"));
        assert!(!printed.contains("local"));
        assert!(printed.contains("hello"));
    }

    #[test]
    fn removes_inside_fragments() {
        let (keep, printed) = strip(
            "query Q { ...F } fragment F on Greetings { hello ... on Greetings { cached @client { id } } }",
        );
        assert!(keep);
        assert!(!printed.contains("cached"));
    }

    #[test]
    fn client_only_operation_is_empty() {
        let (keep, _) = strip("{ isLoggedIn @client }");
        assert!(!keep);

        let (keep, _) = strip("query Q { ...F } fragment F on Query { isLoggedIn @client }");
        assert!(!keep);
    }

    #[test]
    fn unknown_fragments_count_as_selections() {
        let (keep, _) = strip("query Q { ...Elsewhere }");
        assert!(keep);
    }
}
