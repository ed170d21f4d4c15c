//! Interpolation handling per dialect.

mod common;

use common::{assert_valid, env_group, lint, linter, messages};
use graphql_tag_linter::{Linter, NodeKind, RuleKind, SourceLocation};

fn dialect(env: &str) -> Linter {
    linter(RuleKind::TemplateStrings, vec![env_group(env)])
}

mod apollo {
    use super::*;

    #[test]
    fn fragment_after_document() {
        assert_valid(&dialect("apollo"), "const x = gql`{ number } ${x}`");
    }

    #[test]
    fn fragment_inside_selection() {
        let diagnostics = lint(&dialect("apollo"), "const x = gql`query { ${x} }`");
        assert_eq!(
            diagnostics[0].message,
            "Invalid interpolation - fragment interpolation must occur outside of the brackets."
        );
        assert_eq!(diagnostics[0].node.kind, NodeKind::Expression);
    }

    #[test]
    fn balanced_but_broken_document() {
        let diagnostics = lint(&dialect("apollo"), "const x = gql`query }{ ${x}`");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.starts_with("Syntax Error: "));
        assert_eq!(diagnostics[0].node.kind, NodeKind::TaggedTemplate);
    }

    #[test]
    fn client_fields_are_not_validated() {
        let linter = dialect("apollo");
        assert_valid(
            &linter,
            "gql`query Q { number isLoggedIn @client greetings { hello cart @client { items } } }`",
        );
        assert_valid(&linter, "gql`query Local { isLoggedIn @client }`");
        assert_eq!(
            messages(&linter, "gql`query Q { isLoggedIn @client nope }`"),
            vec!["Cannot query field \"nope\" on type \"Query\"."]
        );
    }
}

mod lokka {
    use super::*;

    #[test]
    fn valid() {
        let linter = dialect("lokka");
        for code in [
            r"
      client.query(gql`
          {
            allFilms {
              films {
                title
              }
            }
          }
      `).then(result => {
          console.log(result.allFilms);
      });
    ",
            r"
      const filmInfo = client.createFragment(gql`
        fragment on Film {
          title,
          director,
          releaseDate
        }
      `);
    ",
            r"
      client.query(gql`
        {
          allFilms {
            films {
              ...${filmInfo}
            }
          }
        }
      `).then(result => {
        console.log(result.allFilms.films);
      });
    ",
            r"
      const query = gql`
        query sumNow($a: Int!, $b: Int!) {
          sum(a: $a, b: $b)
        }
      `;
    ",
        ] {
            assert_valid(&linter, code);
        }
    }

    #[test]
    fn unknown_field_with_suggestion() {
        let diagnostics = lint(
            &dialect("lokka"),
            r"
        client.query(gql`
            {
              allFilmsx {
                films {
                  title
                }
              }
            }
        `).then(result => {
            console.log(result.allFilms);
        });
      ",
        );
        assert_eq!(
            diagnostics[0].message,
            "Cannot query field \"allFilmsx\" on type \"Query\". Did you mean \"allFilms\"?"
        );
        assert_eq!(diagnostics[0].node.kind, NodeKind::TaggedTemplate);
        assert_eq!(diagnostics[0].location, SourceLocation::new(4, 15));
    }

    #[test]
    fn unknown_argument_in_anonymous_fragment() {
        let diagnostics = lint(
            &dialect("lokka"),
            r"
        const filmInfo = client.createFragment(gql`
          fragment on Film {
            title,
            director(wrongArg: 7),
            releaseDate
          }
        `);
      ",
        );
        assert_eq!(
            diagnostics[0].message,
            "Unknown argument \"wrongArg\" on field \"director\" of type \"Film\"."
        );
        assert_eq!(diagnostics[0].location, SourceLocation::new(5, 22));
    }

    #[test]
    fn spread_keeps_following_columns() {
        let diagnostics = lint(
            &dialect("lokka"),
            r"
        client.query(gql`
          {
            allFilms {
              films {
                ...${filmInfo}
                unknownField
              }
            }
          }
        `).then(result => {
          console.log(result.allFilms.films);
        });
      ",
        );
        assert_eq!(
            diagnostics[0].message,
            "Cannot query field \"unknownField\" on type \"Film\"."
        );
        assert_eq!(diagnostics[0].location, SourceLocation::new(7, 17));
    }

    #[test]
    fn bare_interpolation() {
        let diagnostics = lint(
            &dialect("lokka"),
            r"
        client.query(gql`
          {
            allFilms {
              films {
                ${filmInfo}
              }
            }
          }
        `).then(result => {
          console.log(result.allFilms.films);
        });
      ",
        );
        assert_eq!(
            diagnostics[0].message,
            "Invalid interpolation - not a valid fragment or variable."
        );
        assert_eq!(diagnostics[0].node.kind, NodeKind::Expression);
        assert_eq!(diagnostics[0].location, SourceLocation::new(6, 19));
    }
}

mod fraql {
    use super::*;

    #[test]
    fn plain_documents_validate() {
        let linter = dialect("fraql");
        assert_valid(&linter, "const x = gql`{ number }`");
        assert_eq!(
            messages(&linter, "const x = gql`{ nope }`"),
            vec!["Cannot query field \"nope\" on type \"Query\"."]
        );
    }

    #[test]
    fn interpolations_are_rejected() {
        assert_eq!(
            messages(&dialect("fraql"), "const x = gql`query { ${x} }`"),
            vec!["Invalid interpolation - not a valid fragment or variable."]
        );
    }
}

mod relay {
    use super::*;

    #[test]
    fn valid() {
        let linter = dialect("relay");
        for code in [
            r"
      @relay({
        fragments: {
          greetings: () => Relay.QL`
            fragment on Greetings {
              hello,
              hi,
            }
          `,
        }
      })
      class HelloApp extends React.Component {}
    ",
            r"
      const StyledComponent = css`height: 12px;`
    ",
            r"
      HelloApp = Relay.createContainer(HelloApp, {
        fragments: {
          greetings: () => Relay.QL`
            fragment on Greetings {
              hello,
            }
          `,
        }
      });
    ",
            r"
      class HelloRoute extends Relay.Route {
        static routeName = 'Hello';
        static queries = {
          greetings: (Component) => Relay.QL`
            query GreetingsQuery {
              greetings {
                ${Component.getFragment('greetings')},
              },
            }
          `,
        };
      }
    ",
            r"
      class CreateCommentMutation extends Relay.Mutation {
        static fragments = {
          story: () => Relay.QL`
            fragment on Story { id }
          `,
        };
        getMutation() {
          return Relay.QL`
            mutation { createComment }
          `;
        }
        getFatQuery() {
          return Relay.QL`
            fragment on CreateCommentPayload {
              story { comments },
            }
          `;
        }
        getVariables() {
          return { text: this.props.text };
        }
      }
    ",
            "Relay.QL`fragment on Query { sum(a: ${a}, b: ${b}) }`",
        ] {
            assert_valid(&linter, code);
        }
    }

    #[test]
    fn decorated_fragment() {
        let diagnostics = lint(
            &dialect("relay"),
            r"
        @relay({
          fragments: {
            greetings: () => Relay.QL`
              fragment on Greetings {
                hellox,
              }
            `,
          }
        })
        class HelloApp extends React.Component {}
      ",
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "Cannot query field \"hellox\" on type \"Greetings\". Did you mean \"hello\"?"
        );
        assert_eq!(diagnostics[0].node.kind, NodeKind::TaggedTemplate);
        assert_eq!(diagnostics[0].location, SourceLocation::new(6, 17));
    }

    #[test]
    fn every_container_is_checked() {
        let diagnostics = lint(
            &dialect("relay"),
            r"
        import React, { Component, View } from 'react-native';
        import Relay from 'react-relay';

        @relay({
          fragments: {
            user: () => Relay.QL`
              fragment on PublicUser {
                fullName
                nonExistentField
              }
            `
          }
        })
        class Example extends Component {
          render() {
            return <View/>;
          }
        }

        class AnotherExample extends Component {
          render() {
            return <View/>;
          }
        }

        Relay.createContainer(
          AnotherExample,
          {
            fragments: {
              user: () => Relay.QL`
                fragment on PublicUser {
                  fullName
                  nonExistentField
                }
              `
            }
          }
        );
      ",
        );
        let found: Vec<(&str, SourceLocation)> = diagnostics
            .iter()
            .map(|d| (d.message.as_str(), d.location))
            .collect();
        assert_eq!(
            found,
            [
                (
                    "Cannot query field \"nonExistentField\" on type \"PublicUser\".",
                    SourceLocation::new(10, 17)
                ),
                (
                    "Cannot query field \"nonExistentField\" on type \"PublicUser\".",
                    SourceLocation::new(34, 19)
                ),
            ]
        );
    }
}

mod literal {
    use super::*;

    #[test]
    fn graphql_files_are_linted_in_place() {
        let linter = dialect("literal");
        let diagnostics = common::lint_file(
            &linter,
            "queries/films.graphql",
            "query Films {\n  allFilms {\n    films {\n      titel\n    }\n  }\n}\n",
        );
        assert_eq!(
            diagnostics[0].message,
            "Cannot query field \"titel\" on type \"Film\". Did you mean \"title\"?"
        );
        assert_eq!(diagnostics[0].location, SourceLocation::new(4, 7));
    }

    #[test]
    fn escapes_in_graphql_files_survive() {
        let linter = dialect("literal");
        let diagnostics = common::lint_file(
            &linter,
            "a.gql",
            "# `backticks`, \\ and ${dollar}\n{ greetings { hello } }\n{ nope }\n",
        );
        assert_eq!(
            diagnostics[0].message,
            "This anonymous operation must be the only defined operation."
        );
        assert_eq!(diagnostics[0].location, SourceLocation::new(2, 1));
    }
}
