//! SDL (Schema Definition Language) printing for introspection results.

use crate::types::{
    EnumValue, Field, InputValue, IntrospectionDirective, IntrospectionSchema, IntrospectionType,
    IntrospectionTypeRef,
};
use std::fmt::{self, Write};

/// Built-in scalar types that schema builders provide themselves.
const BUILTIN_SCALARS: &[&str] = &["Int", "Float", "String", "Boolean", "ID"];

/// Built-in directives that schema builders provide themselves.
const BUILTIN_DIRECTIVES: &[&str] = &["skip", "include", "deprecated", "specifiedBy", "oneOf"];

/// Converts an introspection result to SDL.
///
/// Built-in scalars, built-in directives and introspection types (`__*`) are
/// left out. Descriptions and deprecations are preserved, so deprecation
/// reasons survive the round trip into the schema builder.
#[must_use]
#[tracing::instrument(skip(schema), fields(types = schema.types.len()))]
pub fn introspection_to_sdl(schema: &IntrospectionSchema) -> String {
    let sdl = SchemaPrinter(schema).to_string();
    tracing::debug!(sdl_length = sdl.len(), "SDL generation complete");
    sdl
}

struct SchemaPrinter<'a>(&'a IntrospectionSchema);

impl fmt::Display for SchemaPrinter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let schema = self.0;
        let mut blocks: Vec<String> = Vec::new();

        if let Some(block) = schema_definition(schema) {
            blocks.push(block);
        }

        for directive in &schema.directives {
            if BUILTIN_DIRECTIVES.contains(&directive.name.as_str()) {
                continue;
            }
            let mut block = String::new();
            write_directive(&mut block, directive)?;
            blocks.push(block);
        }

        for ty in &schema.types {
            let name = ty.name();
            if name.starts_with("__") || BUILTIN_SCALARS.contains(&name) {
                continue;
            }
            let mut block = String::new();
            write_type(&mut block, ty)?;
            blocks.push(block);
        }

        f.write_str(&blocks.join("\n\n"))
    }
}

/// A `schema { ... }` block is only needed for non-conventional root names.
fn schema_definition(schema: &IntrospectionSchema) -> Option<String> {
    let roots = [
        ("query", schema.query_type.as_ref(), "Query"),
        ("mutation", schema.mutation_type.as_ref(), "Mutation"),
        ("subscription", schema.subscription_type.as_ref(), "Subscription"),
    ];

    let conventional = roots
        .iter()
        .all(|(_, root, default)| root.is_none_or(|r| r.name == *default));
    if conventional {
        return None;
    }

    let mut block = String::from("schema {\n");
    for (operation, root, _) in roots {
        if let Some(root) = root {
            block.push_str(&format!("  {operation}: {}\n", root.name));
        }
    }
    block.push('}');
    Some(block)
}

fn write_directive(out: &mut String, directive: &IntrospectionDirective) -> fmt::Result {
    write_description(out, directive.description.as_deref(), "")?;
    write!(out, "directive @{}", directive.name)?;
    write_arguments(out, &directive.args)?;
    if directive.is_repeatable {
        out.push_str(" repeatable");
    }
    write!(out, " on {}", directive.locations.join(" | "))
}

fn write_type(out: &mut String, ty: &IntrospectionType) -> fmt::Result {
    match ty {
        IntrospectionType::Scalar(t) => {
            write_description(out, t.description.as_deref(), "")?;
            write!(out, "scalar {}", t.name)?;
            if let Some(url) = &t.specified_by_url {
                write!(out, " @specifiedBy(url: \"{}\")", escape_string(url))?;
            }
        }
        IntrospectionType::Object(t) => {
            write_description(out, t.description.as_deref(), "")?;
            write!(out, "type {}", t.name)?;
            write_implements(out, &t.interfaces);
            write_fields(out, &t.fields)?;
        }
        IntrospectionType::Interface(t) => {
            write_description(out, t.description.as_deref(), "")?;
            write!(out, "interface {}", t.name)?;
            write_implements(out, &t.interfaces);
            write_fields(out, &t.fields)?;
        }
        IntrospectionType::Union(t) => {
            write_description(out, t.description.as_deref(), "")?;
            let members: Vec<&str> = t.possible_types.iter().map(|m| m.name.as_str()).collect();
            write!(out, "union {} = {}", t.name, members.join(" | "))?;
        }
        IntrospectionType::Enum(t) => {
            write_description(out, t.description.as_deref(), "")?;
            writeln!(out, "enum {} {{", t.name)?;
            for value in &t.enum_values {
                write_enum_value(out, value)?;
            }
            out.push('}');
        }
        IntrospectionType::InputObject(t) => {
            write_description(out, t.description.as_deref(), "")?;
            writeln!(out, "input {} {{", t.name)?;
            for field in &t.input_fields {
                write_description(out, field.description.as_deref(), "  ")?;
                out.push_str("  ");
                write_input_value(out, field)?;
                out.push('\n');
            }
            out.push('}');
        }
    }
    Ok(())
}

fn write_implements(out: &mut String, interfaces: &[IntrospectionTypeRef]) {
    if interfaces.is_empty() {
        return;
    }
    let names: Vec<&str> = interfaces.iter().map(|i| i.name.as_str()).collect();
    out.push_str(" implements ");
    out.push_str(&names.join(" & "));
}

fn write_fields(out: &mut String, fields: &[Field]) -> fmt::Result {
    out.push_str(" {\n");
    for field in fields {
        write_description(out, field.description.as_deref(), "  ")?;
        write!(out, "  {}", field.name)?;
        write_arguments(out, &field.args)?;
        write!(out, ": {}", field.type_ref)?;
        write_deprecation(out, field.is_deprecated, field.deprecation_reason.as_deref())?;
        out.push('\n');
    }
    out.push('}');
    Ok(())
}

fn write_enum_value(out: &mut String, value: &EnumValue) -> fmt::Result {
    write_description(out, value.description.as_deref(), "  ")?;
    write!(out, "  {}", value.name)?;
    write_deprecation(out, value.is_deprecated, value.deprecation_reason.as_deref())?;
    out.push('\n');
    Ok(())
}

fn write_arguments(out: &mut String, args: &[InputValue]) -> fmt::Result {
    if args.is_empty() {
        return Ok(());
    }
    out.push('(');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_input_value(out, arg)?;
    }
    out.push(')');
    Ok(())
}

fn write_input_value(out: &mut String, value: &InputValue) -> fmt::Result {
    write!(out, "{}: {}", value.name, value.type_ref)?;
    if let Some(default) = &value.default_value {
        write!(out, " = {default}")?;
    }
    Ok(())
}

fn write_deprecation(out: &mut String, deprecated: bool, reason: Option<&str>) -> fmt::Result {
    if !deprecated {
        return Ok(());
    }
    match reason {
        Some(reason) => write!(out, " @deprecated(reason: \"{}\")", escape_string(reason)),
        None => {
            out.push_str(" @deprecated");
            Ok(())
        }
    }
}

fn write_description(out: &mut String, description: Option<&str>, indent: &str) -> fmt::Result {
    match description {
        Some(desc) if desc.contains('\n') => {
            let body = desc.replace("\"\"\"", "\\\"\"\"");
            writeln!(out, "{indent}\"\"\"\n{body}\n{indent}\"\"\"")
        }
        Some(desc) => writeln!(out, "{indent}\"{}\"", escape_string(desc)),
        None => Ok(()),
    }
}

fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
