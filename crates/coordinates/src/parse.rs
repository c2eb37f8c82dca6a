// Thin wrappers over apollo-compiler's parser and schema builder.
// Any diagnostic is fatal: callers get either a complete AST/schema or a
// `CoordinateError::Syntax`, never a partial result.

use crate::{CoordinateError, Result};
use apollo_compiler::ast;
use apollo_compiler::Schema;
use std::path::Path;

/// Source name used when the caller does not provide one.
pub const DEFAULT_DOCUMENT_NAME: &str = "document.graphql";

/// Source name used when the caller does not provide one.
pub const DEFAULT_SCHEMA_NAME: &str = "schema.graphql";

/// Parse executable GraphQL text.
#[tracing::instrument(skip(text), fields(size = text.len()))]
pub fn parse_document(text: &str, source_name: &str) -> Result<ast::Document> {
    ast::Document::parse(text, source_name).map_err(|with_errors| {
        tracing::debug!(errors = with_errors.errors.len(), "Document failed to parse");
        CoordinateError::syntax(source_name, with_errors.errors.iter())
    })
}

/// Build a schema model from one or more SDL sources.
///
/// `extend type` blocks are merged into their base definitions regardless of
/// source order; an extension with no base definition is adopted as the
/// definition itself.
pub fn build_schema<'a, I, P>(sources: I) -> Result<Schema>
where
    I: IntoIterator<Item = (P, &'a str)>,
    P: AsRef<Path>,
{
    let mut builder = Schema::builder().adopt_orphan_extensions();
    let mut names = Vec::new();
    for (path, text) in sources {
        names.push(path.as_ref().display().to_string());
        builder = builder.parse(text, path);
    }

    tracing::debug!(sources = names.len(), "Building schema");

    builder.build().map_err(|with_errors| {
        tracing::debug!(errors = with_errors.errors.len(), "Schema failed to build");
        CoordinateError::syntax(names.join(", "), with_errors.errors.iter())
    })
}
