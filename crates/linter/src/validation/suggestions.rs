//! "Did you mean ...?" helpers.

const MAX_SUGGESTIONS: usize = 5;

/// Options close enough to `input` to be worth suggesting, closest first.
pub fn suggestion_list<'o>(input: &str, options: impl IntoIterator<Item = &'o str>) -> Vec<String> {
    let threshold = input.chars().count() * 2 / 5 + 1;
    let input_lower = input.to_lowercase();

    let mut scored: Vec<(usize, &str)> = options
        .into_iter()
        .filter_map(|option| {
            let distance = if option == input {
                0
            } else {
                let option_lower = option.to_lowercase();
                if option_lower == input_lower {
                    1
                } else {
                    strsim::osa_distance(&input_lower, &option_lower)
                }
            };
            (distance <= threshold).then_some((distance, option))
        })
        .collect();
    scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    scored.dedup_by(|a, b| a.1 == b.1);
    scored.into_iter().map(|(_, option)| option.to_string()).collect()
}

/// `"a"`, `"a" or "b"`, `"a", "b", or "c"`; at most five items.
#[must_use]
pub fn quoted_or_list(items: &[String]) -> String {
    let selected: Vec<String> = items
        .iter()
        .take(MAX_SUGGESTIONS)
        .map(|item| format!("\"{item}\""))
        .collect();
    match selected.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} or {second}"),
        [rest @ .., last] => format!("{}, or {last}", rest.join(", ")),
    }
}

/// ` Did you mean "a" or "b"?`, or nothing without suggestions.
pub(crate) fn did_you_mean(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(" Did you mean {}?", quoted_or_list(suggestions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_close_options_in_order() {
        assert_eq!(suggestion_list("c", ["b", "a", "zzz"]), vec!["a", "b"]);
        assert_eq!(
            suggestion_list("hellox", ["hi", "hello", "foo", "id"]),
            vec!["hello"]
        );
    }

    #[test]
    fn case_only_difference_is_close() {
        assert_eq!(suggestion_list("HELLO", ["hello"]), vec!["hello"]);
    }

    #[test]
    fn nothing_close_yields_nothing() {
        assert!(suggestion_list("nonExistentQuery", ["number", "sum", "allFilms"]).is_empty());
    }

    #[test]
    fn formats_or_lists() {
        let items: Vec<String> = ["a", "b", "c", "d", "e", "f"]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(quoted_or_list(&items[..1]), "\"a\"");
        assert_eq!(quoted_or_list(&items[..2]), "\"a\" or \"b\"");
        assert_eq!(quoted_or_list(&items[..3]), "\"a\", \"b\", or \"c\"");
        assert_eq!(
            quoted_or_list(&items),
            "\"a\", \"b\", \"c\", \"d\", or \"e\""
        );
        assert_eq!(did_you_mean(&[]), "");
    }
}
