use graphql_tag_types::SourceLocation;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Parsing error at {location}: {message}")]
    Parse {
        message: String,
        location: SourceLocation,
    },

    #[error("{0:?} files contain no JavaScript to extract from")]
    UnsupportedLanguage(graphql_tag_types::Language),
}
