use thiserror::Error;

pub type Result<T> = std::result::Result<T, IntrospectionError>;

#[derive(Debug, Error)]
pub enum IntrospectionError {
    #[error("introspection result has no `__schema` field")]
    MissingSchema,

    #[error("failed to parse introspection result: {0}")]
    Parse(String),
}
