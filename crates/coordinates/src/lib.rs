//! Static extraction of the schema coordinates a GraphQL document references.
//!
//! Given document text and schema SDL, [`extract_schema_coordinates`] returns
//! every `Type.field` the document selects, plus the bare name of every
//! non-built-in input type used by an operation's variables. Nothing is
//! executed and the document is not validated: fields and types missing from
//! the schema are still recorded, traversal just stops descending there.
//!
//! Typical uses are persisted-query allow-listing, schema usage tracking and
//! change-impact analysis.
//!
//! # Example
//!
//! ```
//! use graphql_coordinates::extract_schema_coordinates;
//!
//! let schema = "type Query { user: User } type User { id: ID name: String }";
//! let coordinates = extract_schema_coordinates("{ user { id name } }", schema).unwrap();
//!
//! assert_eq!(
//!     coordinates.to_sorted_strings(),
//!     vec!["Query.user", "User.id", "User.name"]
//! );
//! ```
//!
//! The pipeline is split so callers can reuse its parts:
//! - [`PreparedSchema`] bundles the [`SchemaFieldIndex`] and [`RootOperations`]
//!   built once per schema text
//! - [`seed_roots`] turns a document's definitions into traversal frames
//! - [`walk`] drains those frames into a [`CoordinateSet`]
//! - [`ExtractionCache`] memoizes schema and document builds by text

mod cache;
mod coordinate;
mod error;
mod parse;
mod roots;
mod schema;
mod walker;

pub use cache::{ExtractionCache, DEFAULT_MAX_ENTRIES};
pub use coordinate::{CoordinateSet, SchemaCoordinate};
pub use error::{CoordinateError, Result};
pub use parse::{build_schema, parse_document, DEFAULT_DOCUMENT_NAME, DEFAULT_SCHEMA_NAME};
pub use roots::{is_built_in_scalar, seed_roots, OperationKind, BUILT_IN_SCALARS};
pub use schema::{FieldEntry, PreparedSchema, RootOperations, SchemaFieldIndex};
pub use walker::{walk, TraversalFrame};

/// Extract every schema coordinate `document_text` references.
///
/// Fails on malformed document or schema text, on a document without any
/// operation, and on an operation whose kind has no root type in the schema.
#[tracing::instrument(skip_all, fields(document_len = document_text.len(), schema_len = schema_text.len()))]
pub fn extract_schema_coordinates(document_text: &str, schema_text: &str) -> Result<CoordinateSet> {
    let schema = PreparedSchema::parse(schema_text)?;
    let document = parse_document(document_text, DEFAULT_DOCUMENT_NAME)?;
    extract_from_document(&document, &schema)
}

/// Extract from an already parsed document against an already prepared schema.
pub fn extract_from_document(
    document: &apollo_compiler::ast::Document,
    schema: &PreparedSchema,
) -> Result<CoordinateSet> {
    let (queue, coordinates) = seed_roots(document, &schema.roots)?;
    let coordinates = walk(queue, &schema.index, coordinates);
    tracing::debug!(coordinates = coordinates.len(), "Extracted schema coordinates");
    Ok(coordinates)
}
