use crate::schema::{named_type, RootOperations};
use crate::walker::TraversalFrame;
use crate::{CoordinateError, CoordinateSet, Result, SchemaCoordinate};
use apollo_compiler::ast;
use std::fmt;
use std::sync::Arc;

/// Scalars every schema has; variables of these types are not recorded.
pub const BUILT_IN_SCALARS: &[&str] = &["Int", "Float", "String", "Boolean", "ID"];

/// The kind of an operation definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    /// Root type name used when the schema has no `schema { ... }` block.
    #[must_use]
    pub const fn default_type_name(self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Mutation => "Mutation",
            Self::Subscription => "Subscription",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Mutation => "mutation",
            Self::Subscription => "subscription",
        }
    }
}

impl From<ast::OperationType> for OperationKind {
    fn from(operation_type: ast::OperationType) -> Self {
        match operation_type {
            ast::OperationType::Query => Self::Query,
            ast::OperationType::Mutation => Self::Mutation,
            ast::OperationType::Subscription => Self::Subscription,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[must_use]
pub fn is_built_in_scalar(type_name: &str) -> bool {
    BUILT_IN_SCALARS.contains(&type_name)
}

/// Seed the traversal queue from a document's top-level definitions.
///
/// Every operation starts at its root type and every fragment definition at
/// its type condition, so each fragment body is walked once no matter how many
/// times it is spread. Input types named by variable declarations are
/// returned as bare type coordinates.
///
/// Fails with [`CoordinateError::UnsupportedOperation`] when an operation's
/// kind has no root type, and with [`CoordinateError::EmptyDocument`] when the
/// document defines no operation at all.
pub fn seed_roots<'a>(
    document: &'a ast::Document,
    roots: &RootOperations,
) -> Result<(Vec<TraversalFrame<'a>>, CoordinateSet)> {
    let mut queue = Vec::new();
    let mut coordinates = CoordinateSet::new();
    let mut operation_count = 0usize;

    for definition in &document.definitions {
        match definition {
            ast::Definition::OperationDefinition(operation) => {
                operation_count += 1;
                let kind = OperationKind::from(operation.operation_type);
                let Some(root) = roots.get(kind) else {
                    tracing::debug!(%kind, name = ?operation.name, "No root type for operation");
                    return Err(CoordinateError::UnsupportedOperation(kind));
                };

                for variable in &operation.variables {
                    let input_type = named_type(&variable.ty);
                    if !is_built_in_scalar(input_type) {
                        coordinates.insert(SchemaCoordinate::type_name(input_type));
                    }
                }

                queue.push(TraversalFrame::new(
                    Arc::clone(root),
                    &operation.selection_set,
                ));
            }
            ast::Definition::FragmentDefinition(fragment) => {
                queue.push(TraversalFrame::new(
                    Arc::from(fragment.type_condition.as_str()),
                    &fragment.selection_set,
                ));
            }
            _ => {}
        }
    }

    if operation_count == 0 {
        return Err(CoordinateError::EmptyDocument);
    }

    tracing::trace!(
        operations = operation_count,
        frames = queue.len(),
        "Seeded traversal roots"
    );
    Ok((queue, coordinates))
}
