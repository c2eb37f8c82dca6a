use crate::parse::{build_schema, DEFAULT_SCHEMA_NAME};
use crate::{OperationKind, Result};
use apollo_compiler::ast;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::Schema;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// A field declared on an object type, with its return type unwrapped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldEntry {
    pub name: Arc<str>,
    /// Innermost named type, with every `[T]` and `T!` wrapper removed.
    pub return_type: Arc<str>,
}

/// Map from object type name to the fields it declares, in declaration order.
///
/// Only object types are indexed. Interfaces, unions, scalars, enums and
/// input objects never appear, so a selection on one of those cannot descend
/// further through this index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaFieldIndex {
    types: HashMap<Arc<str>, Vec<FieldEntry>>,
}

impl SchemaFieldIndex {
    /// Index every user-declared object type of a built schema.
    #[must_use]
    pub fn from_schema(schema: &Schema) -> Self {
        let mut types = HashMap::new();

        for (type_name, ty) in &schema.types {
            let ExtendedType::Object(object) = ty else {
                continue;
            };
            // Introspection types (`__Schema`, `__Type`, ...) are built in
            if type_name.as_str().starts_with("__") {
                continue;
            }

            let fields: Vec<FieldEntry> = object
                .fields
                .iter()
                .filter(|(field_name, _)| !field_name.as_str().starts_with("__"))
                .map(|(field_name, field)| FieldEntry {
                    name: Arc::from(field_name.as_str()),
                    return_type: Arc::from(named_type(&field.ty)),
                })
                .collect();

            types.insert(Arc::from(type_name.as_str()), fields);
        }

        tracing::debug!(types = types.len(), "Indexed schema object types");
        Self { types }
    }

    /// Fields declared on `type_name`, or `None` if it is not an indexed object type.
    #[must_use]
    pub fn fields(&self, type_name: &str) -> Option<&[FieldEntry]> {
        self.types.get(type_name).map(Vec::as_slice)
    }

    /// Declared return type of `type_name.field_name`, if both exist.
    #[must_use]
    pub fn return_type(&self, type_name: &str, field_name: &str) -> Option<&Arc<str>> {
        self.fields(type_name)?
            .iter()
            .find(|field| field.name.as_ref() == field_name)
            .map(|field| &field.return_type)
    }

    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Strip list and non-null wrappers down to the named type.
pub(crate) fn named_type(ty: &ast::Type) -> &str {
    match ty {
        ast::Type::Named(name) | ast::Type::NonNullNamed(name) => name.as_str(),
        ast::Type::List(inner) | ast::Type::NonNullList(inner) => named_type(inner),
    }
}

/// Root type names for each operation kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootOperations {
    query: Option<Arc<str>>,
    mutation: Option<Arc<str>>,
    subscription: Option<Arc<str>>,
}

impl RootOperations {
    /// Read the roots from the schema's root operation definitions.
    ///
    /// Without a `schema { ... }` block the builder has already bound each kind
    /// to its conventional object type (`Query`, `Mutation`, `Subscription`)
    /// when one exists, so a kind left unbound here has no root.
    #[must_use]
    pub fn from_schema(schema: &Schema) -> Self {
        let definition = &schema.schema_definition;
        let declared = |name: Option<&apollo_compiler::schema::ComponentName>| {
            name.map(|n| Arc::<str>::from(n.name.as_str()))
        };

        Self {
            query: declared(definition.query.as_ref()),
            mutation: declared(definition.mutation.as_ref()),
            subscription: declared(definition.subscription.as_ref()),
        }
    }

    /// Explicit roots, mainly for tests and callers that skip SDL entirely.
    #[must_use]
    pub fn new(
        query: Option<&str>,
        mutation: Option<&str>,
        subscription: Option<&str>,
    ) -> Self {
        Self {
            query: query.map(Arc::from),
            mutation: mutation.map(Arc::from),
            subscription: subscription.map(Arc::from),
        }
    }

    #[must_use]
    pub const fn get(&self, kind: OperationKind) -> Option<&Arc<str>> {
        match kind {
            OperationKind::Query => self.query.as_ref(),
            OperationKind::Mutation => self.mutation.as_ref(),
            OperationKind::Subscription => self.subscription.as_ref(),
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.query.is_none() && self.mutation.is_none() && self.subscription.is_none()
    }
}

/// Everything extraction needs from a schema, built once per schema text.
///
/// The apollo-compiler model itself is dropped after indexing; it is not
/// needed for traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedSchema {
    pub index: SchemaFieldIndex,
    pub roots: RootOperations,
}

impl PreparedSchema {
    /// Build from a single SDL text.
    pub fn parse(sdl: &str) -> Result<Self> {
        Self::from_sources([(DEFAULT_SCHEMA_NAME, sdl)])
    }

    /// Build from several SDL sources merged into one schema.
    #[tracing::instrument(skip_all)]
    pub fn from_sources<'a, I, P>(sources: I) -> Result<Self>
    where
        I: IntoIterator<Item = (P, &'a str)>,
        P: AsRef<Path>,
    {
        let schema = build_schema(sources)?;
        Ok(Self::from_schema(&schema))
    }

    #[must_use]
    pub fn from_schema(schema: &Schema) -> Self {
        Self {
            index: SchemaFieldIndex::from_schema(schema),
            roots: RootOperations::from_schema(schema),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(sdl: &str) -> Schema {
        build_schema([(DEFAULT_SCHEMA_NAME, sdl)]).unwrap()
    }

    #[test]
    fn test_index_unwraps_list_and_non_null() {
        let schema = schema(
            r"
            type Query { users: [User!]! matrix: [[Int]] }
            type User { id: ID! }
            ",
        );
        let index = SchemaFieldIndex::from_schema(&schema);

        assert_eq!(index.return_type("Query", "users").map(AsRef::as_ref), Some("User"));
        assert_eq!(index.return_type("Query", "matrix").map(AsRef::as_ref), Some("Int"));
        assert_eq!(index.return_type("User", "id").map(AsRef::as_ref), Some("ID"));
    }

    #[test]
    fn test_index_only_contains_object_types() {
        let schema = schema(
            r"
            type Query { pet: Pet animal: Animal }
            interface Animal { name: String }
            type Dog implements Animal { name: String }
            union Pet = Dog
            enum Color { RED }
            input Filter { name: String }
            scalar Date
            ",
        );
        let index = SchemaFieldIndex::from_schema(&schema);

        assert!(index.fields("Query").is_some());
        assert!(index.fields("Dog").is_some());
        assert!(index.fields("Animal").is_none());
        assert!(index.fields("Pet").is_none());
        assert!(index.fields("Color").is_none());
        assert!(index.fields("Filter").is_none());
        assert!(index.fields("Date").is_none());
        assert!(index.fields("__Schema").is_none());
        assert_eq!(index.type_count(), 2);
    }

    #[test]
    fn test_index_preserves_declaration_order() {
        let schema = schema("type Query { b: Int a: Int c: Int }");
        let index = SchemaFieldIndex::from_schema(&schema);
        let names: Vec<&str> = index
            .fields("Query")
            .unwrap()
            .iter()
            .map(|f| f.name.as_ref())
            .collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_index_includes_extension_fields() {
        let schema = schema(
            r"
            type Query { user: User }
            type User { id: ID }
            extend type User { email: String }
            ",
        );
        let index = SchemaFieldIndex::from_schema(&schema);
        assert_eq!(index.return_type("User", "email").map(AsRef::as_ref), Some("String"));
    }

    #[test]
    fn test_index_missing_type_or_field() {
        let schema = schema("type Query { id: ID }");
        let index = SchemaFieldIndex::from_schema(&schema);
        assert!(index.return_type("Nope", "id").is_none());
        assert!(index.return_type("Query", "nope").is_none());
    }

    #[test]
    fn test_roots_from_schema_block() {
        let schema = schema(
            r"
            schema { query: Root mutation: Change }
            type Root { id: ID }
            type Change { id: ID }
            type Subscription { id: ID }
            ",
        );
        let roots = RootOperations::from_schema(&schema);

        assert_eq!(roots.get(OperationKind::Query).map(AsRef::as_ref), Some("Root"));
        assert_eq!(roots.get(OperationKind::Mutation).map(AsRef::as_ref), Some("Change"));
        // An explicit schema block is authoritative
        assert_eq!(roots.get(OperationKind::Subscription), None);
    }

    #[test]
    fn test_roots_conventional_names() {
        let schema = schema("type Query { id: ID } type Mutation { id: ID }");
        let roots = RootOperations::from_schema(&schema);

        assert_eq!(roots.get(OperationKind::Query).map(AsRef::as_ref), Some("Query"));
        assert_eq!(roots.get(OperationKind::Mutation).map(AsRef::as_ref), Some("Mutation"));
        assert_eq!(roots.get(OperationKind::Subscription), None);
    }

    #[test]
    fn test_roots_ignore_non_object_conventional_names() {
        let schema = schema(
            r"
            interface Query { id: ID }
            type Mutation { id: ID }
            ",
        );
        let roots = RootOperations::from_schema(&schema);

        assert_eq!(roots.get(OperationKind::Query), None);
        assert_eq!(roots.get(OperationKind::Mutation).map(AsRef::as_ref), Some("Mutation"));
    }

    #[test]
    fn test_prepared_schema_empty_index() {
        let prepared = PreparedSchema::parse("scalar Date").unwrap();
        assert!(prepared.index.is_empty());
        assert!(prepared.roots.is_empty());
    }
}
