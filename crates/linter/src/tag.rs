use graphql_tag_extract::TagExpr;

/// Whether a template's tag is exactly `tag_name`.
///
/// `gql` matches a bare identifier and `Relay.QL` a two-part member access.
/// Names with more than two segments never match anything.
#[must_use]
pub fn tag_matches(tag_name: &str, tag: &TagExpr) -> bool {
    let segments: Vec<&str> = tag_name.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return false;
    }
    match (segments.as_slice(), tag) {
        ([name], TagExpr::Ident(ident)) => ident == name,
        ([object, property], TagExpr::Member {
            object: tag_object,
            property: tag_property,
        }) => tag_object == object && tag_property == property,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(name: &str) -> TagExpr {
        TagExpr::Ident(name.to_string())
    }

    fn member(object: &str, property: &str) -> TagExpr {
        TagExpr::Member {
            object: object.to_string(),
            property: property.to_string(),
        }
    }

    #[test]
    fn simple_identifier() {
        assert!(tag_matches("gql", &ident("gql")));
        assert!(!tag_matches("gql", &ident("myGql")));
        assert!(!tag_matches("gql", &ident("Gql")));
        assert!(!tag_matches("gql", &member("a", "gql")));
    }

    #[test]
    fn member_expression() {
        assert!(tag_matches("Relay.QL", &member("Relay", "QL")));
        assert!(!tag_matches("Relay.QL", &member("Relay", "Ql")));
        assert!(!tag_matches("Relay.QL", &ident("Relay")));
        assert!(!tag_matches("segmented.TagName", &member("segmented", "gql")));
    }

    #[test]
    fn other_segment_counts_never_match() {
        assert!(!tag_matches("a.b.c", &member("a", "b")));
        assert!(!tag_matches("", &ident("")));
        assert!(!tag_matches("gql", &TagExpr::Other));
    }
}
