//! GraphQL introspection results and SDL conversion.
//!
//! Schemas can be configured as introspection query results, either inline or
//! as a JSON file. This crate deserializes such a result and prints it back as
//! Schema Definition Language so it can be handed to a schema builder.
//!
//! ```
//! use graphql_introspect::{introspection_from_json, introspection_to_sdl};
//!
//! let json = serde_json::json!({
//!     "data": {
//!         "__schema": {
//!             "queryType": { "name": "Query" },
//!             "types": [
//!                 { "kind": "OBJECT", "name": "Query", "fields": [
//!                     { "name": "number", "args": [],
//!                       "type": { "kind": "SCALAR", "name": "Int", "ofType": null },
//!                       "isDeprecated": false, "deprecationReason": null }
//!                 ], "interfaces": [] }
//!             ],
//!             "directives": []
//!         }
//!     }
//! });
//!
//! let schema = introspection_from_json(&json).unwrap();
//! assert_eq!(introspection_to_sdl(&schema), "type Query {\n  number: Int\n}");
//! ```

mod error;
mod sdl;
mod types;

pub use error::{IntrospectionError, Result};
pub use sdl::introspection_to_sdl;
pub use types::*;

/// Reads an introspection result from JSON.
///
/// Both the full response shape (`{ "data": { "__schema": ... } }`) and the
/// bare `{ "__schema": ... }` object are accepted.
pub fn introspection_from_json(value: &serde_json::Value) -> Result<IntrospectionSchema> {
    let schema = value
        .get("data")
        .and_then(|data| data.get("__schema"))
        .or_else(|| value.get("__schema"))
        .ok_or(IntrospectionError::MissingSchema)?;

    let schema: IntrospectionSchema = serde_json::from_value(schema.clone())
        .map_err(|e| IntrospectionError::Parse(e.to_string()))?;

    tracing::debug!(
        types = schema.types.len(),
        directives = schema.directives.len(),
        "Read introspection result"
    );
    Ok(schema)
}

/// Reads an introspection result from JSON text.
pub fn introspection_from_str(json: &str) -> Result<IntrospectionSchema> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| IntrospectionError::Parse(e.to_string()))?;
    introspection_from_json(&value)
}
