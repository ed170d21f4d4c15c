use std::collections::{HashMap, HashSet};

use apollo_compiler::ast;
use apollo_compiler::{Name, Node};

use super::{name_offset, offset_of};
use crate::validation::type_info::{is_composite, named_type, types_overlap};
use crate::validation::{DocumentVisitor, ValidationContext};

#[derive(Default)]
pub(crate) struct FragmentsOnCompositeTypes;

impl FragmentsOnCompositeTypes {
    fn is_invalid(cx: &ValidationContext<'_>, type_condition: &Name) -> bool {
        cx.schema.types.contains_key(type_condition) && !is_composite(cx.schema, type_condition)
    }
}

impl DocumentVisitor for FragmentsOnCompositeTypes {
    fn enter_inline_fragment(
        &mut self,
        cx: &mut ValidationContext<'_>,
        inline: &Node<ast::InlineFragment>,
    ) {
        if let Some(type_condition) = &inline.type_condition {
            if Self::is_invalid(cx, type_condition) {
                cx.report(
                    format!(
                        "Fragment cannot condition on non composite type \"{type_condition}\"."
                    ),
                    name_offset(type_condition),
                );
            }
        }
    }

    fn enter_fragment_definition(
        &mut self,
        cx: &mut ValidationContext<'_>,
        fragment: &Node<ast::FragmentDefinition>,
    ) {
        if Self::is_invalid(cx, &fragment.type_condition) {
            cx.report(
                format!(
                    "Fragment \"{}\" cannot condition on non composite type \"{}\".",
                    fragment.name, fragment.type_condition
                ),
                name_offset(&fragment.type_condition),
            );
        }
    }
}

#[derive(Default)]
pub(crate) struct UniqueFragmentNames {
    seen: HashMap<Name, Option<usize>>,
}

impl DocumentVisitor for UniqueFragmentNames {
    fn enter_fragment_definition(
        &mut self,
        cx: &mut ValidationContext<'_>,
        fragment: &Node<ast::FragmentDefinition>,
    ) {
        if let Some(first) = self.seen.get(&fragment.name) {
            cx.report(
                format!(
                    "There can be only one fragment named \"{}\".",
                    fragment.name
                ),
                *first,
            );
        } else {
            self.seen
                .insert(fragment.name.clone(), name_offset(&fragment.name));
        }
    }
}

#[derive(Default)]
pub(crate) struct KnownFragmentNames;

impl DocumentVisitor for KnownFragmentNames {
    fn enter_fragment_spread(
        &mut self,
        cx: &mut ValidationContext<'_>,
        spread: &Node<ast::FragmentSpread>,
    ) {
        if cx.fragment(&spread.fragment_name).is_none() {
            cx.report(
                format!("Unknown fragment \"{}\".", spread.fragment_name),
                name_offset(&spread.fragment_name),
            );
        }
    }
}

#[derive(Default)]
pub(crate) struct NoUnusedFragments;

impl DocumentVisitor for NoUnusedFragments {
    fn leave_document(&mut self, cx: &mut ValidationContext<'_>, _document: &ast::Document) {
        let document = cx.document;
        let mut used = HashSet::new();
        for definition in &document.definitions {
            if let ast::Definition::OperationDefinition(operation) = definition {
                for fragment in cx.recursively_referenced_fragments(&operation.selection_set) {
                    used.insert(fragment.name.as_str());
                }
            }
        }

        for definition in &document.definitions {
            if let ast::Definition::FragmentDefinition(fragment) = definition {
                if !used.contains(fragment.name.as_str()) {
                    cx.report(
                        format!("Fragment \"{}\" is never used.", fragment.name),
                        offset_of(fragment),
                    );
                }
            }
        }
    }
}

#[derive(Default)]
pub(crate) struct PossibleFragmentSpreads;

impl PossibleFragmentSpreads {
    /// Composite parent and fragment types that can never overlap.
    fn conflict(cx: &ValidationContext<'_>, fragment_type: &Name) -> Option<Name> {
        let parent = cx.parent_type()?;
        let disjoint = is_composite(cx.schema, fragment_type)
            && is_composite(cx.schema, parent)
            && !types_overlap(cx.schema, fragment_type, parent);
        disjoint.then(|| parent.clone())
    }
}

impl DocumentVisitor for PossibleFragmentSpreads {
    fn enter_inline_fragment(
        &mut self,
        cx: &mut ValidationContext<'_>,
        inline: &Node<ast::InlineFragment>,
    ) {
        let Some(fragment_type) = cx.output_type().map(named_type).cloned() else {
            return;
        };
        if let Some(parent) = Self::conflict(cx, &fragment_type) {
            cx.report(
                format!(
                    "Fragment cannot be spread here as objects of type \"{parent}\" can never be of type \"{fragment_type}\"."
                ),
                offset_of(inline),
            );
        }
    }

    fn enter_fragment_spread(
        &mut self,
        cx: &mut ValidationContext<'_>,
        spread: &Node<ast::FragmentSpread>,
    ) {
        let Some(fragment) = cx.fragment(&spread.fragment_name) else {
            return;
        };
        let fragment_type = fragment.type_condition.clone();
        if let Some(parent) = Self::conflict(cx, &fragment_type) {
            cx.report(
                format!(
                    "Fragment \"{}\" cannot be spread here as objects of type \"{parent}\" can never be of type \"{fragment_type}\".",
                    spread.fragment_name
                ),
                offset_of(spread),
            );
        }
    }
}

#[derive(Default)]
pub(crate) struct NoFragmentCycles {
    visited: HashSet<Name>,
}

struct CycleSearch<'a, 'cx> {
    cx: &'cx ValidationContext<'a>,
    visited: &'cx mut HashSet<Name>,
    /// Spreads on the current path: fragment name and spread offset.
    path: Vec<(Name, Option<usize>)>,
    index_by_name: HashMap<Name, usize>,
    found: Vec<(String, Option<usize>)>,
}

impl<'a> CycleSearch<'a, '_> {
    fn detect(&mut self, fragment: &'a Node<ast::FragmentDefinition>) {
        if !self.visited.insert(fragment.name.clone()) {
            return;
        }
        let spreads = ValidationContext::fragment_spreads(&fragment.selection_set);
        if spreads.is_empty() {
            return;
        }

        self.index_by_name
            .insert(fragment.name.clone(), self.path.len());
        for spread in spreads {
            let name = &spread.fragment_name;
            let cycle_start = self.index_by_name.get(name).copied();
            self.path.push((name.clone(), offset_of(spread)));
            match cycle_start {
                None => {
                    if let Some(target) = self.cx.fragment(name) {
                        self.detect(target);
                    }
                }
                Some(start) => {
                    let cycle = &self.path[start..];
                    let via: Vec<&str> = cycle[..cycle.len() - 1]
                        .iter()
                        .map(|(name, _)| name.as_str())
                        .collect();
                    let via = if via.is_empty() {
                        String::new()
                    } else {
                        format!(" via {}", via.join(", "))
                    };
                    self.found.push((
                        format!("Cannot spread fragment \"{name}\" within itself{via}."),
                        cycle[0].1,
                    ));
                }
            }
            self.path.pop();
        }
        self.index_by_name.remove(&fragment.name);
    }
}

impl DocumentVisitor for NoFragmentCycles {
    fn enter_fragment_definition(
        &mut self,
        cx: &mut ValidationContext<'_>,
        fragment: &Node<ast::FragmentDefinition>,
    ) {
        let Some(fragment) = cx.fragment(&fragment.name) else {
            return;
        };
        let mut search = CycleSearch {
            cx,
            visited: &mut self.visited,
            path: Vec::new(),
            index_by_name: HashMap::new(),
            found: Vec::new(),
        };
        search.detect(fragment);
        let found = search.found;
        for (message, offset) in found {
            cx.report(message, offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::validation::test_support::messages;
    use crate::validation::{builtin_rule, ValidationRule};

    fn rule(name: &str) -> Vec<Arc<dyn ValidationRule>> {
        vec![builtin_rule(name).unwrap()]
    }

    #[test]
    fn fragments_must_be_on_composite_types() {
        assert_eq!(
            messages(
                &rule("FragmentsOnCompositeTypes"),
                "{ allFilms { films { ...on String { foo } } } }"
            ),
            vec!["Fragment cannot condition on non composite type \"String\"."]
        );
        assert_eq!(
            messages(
                &rule("FragmentsOnCompositeTypes"),
                "fragment F on Int { a } { number }"
            ),
            vec!["Fragment \"F\" cannot condition on non composite type \"Int\"."]
        );
    }

    #[test]
    fn duplicate_and_unknown_fragments() {
        assert_eq!(
            messages(
                &rule("UniqueFragmentNames"),
                "fragment FF on Film { title } fragment FF on Film { director } { allFilms { films { ...FF } } }"
            ),
            vec!["There can be only one fragment named \"FF\"."]
        );
        assert_eq!(
            messages(
                &rule("KnownFragmentNames"),
                "{ allFilms { films { ...FilmFragment } } }"
            ),
            vec!["Unknown fragment \"FilmFragment\"."]
        );
    }

    #[test]
    fn unused_fragments_are_reported_after_the_walk() {
        assert_eq!(
            messages(
                &rule("NoUnusedFragments"),
                "fragment FilmFragment on Film { title } { allFilms { films { title } } }"
            ),
            vec!["Fragment \"FilmFragment\" is never used."]
        );
        assert!(messages(
            &rule("NoUnusedFragments"),
            "fragment A on Film { ...B } fragment B on Film { title } { allFilms { films { ...A } } }"
        )
        .is_empty());
    }

    #[test]
    fn spreads_must_be_possible() {
        assert_eq!(
            messages(
                &rule("PossibleFragmentSpreads"),
                "fragment FilmFragment on Film { title } { greetings { ...FilmFragment } }"
            ),
            vec!["Fragment \"FilmFragment\" cannot be spread here as objects of type \"Greetings\" can never be of type \"Film\"."]
        );
        assert!(messages(
            &rule("PossibleFragmentSpreads"),
            "{ someUnion { ... on SomeUnionMember { someField } } }"
        )
        .is_empty());
    }

    #[test]
    fn detects_fragment_cycles() {
        assert_eq!(
            messages(
                &rule("NoFragmentCycles"),
                "fragment FilmFragment on Film { title, ...FilmFragment } { allFilms { films { ...FilmFragment } } }"
            ),
            vec!["Cannot spread fragment \"FilmFragment\" within itself."]
        );
        assert_eq!(
            messages(
                &rule("NoFragmentCycles"),
                "fragment A on Film { ...B } fragment B on Film { ...A } { allFilms { films { ...A } } }"
            ),
            vec!["Cannot spread fragment \"A\" within itself via B."]
        );
    }
}
