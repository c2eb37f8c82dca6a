use crate::{CoordinateSet, SchemaCoordinate, SchemaFieldIndex};
use apollo_compiler::ast;
use std::sync::Arc;

/// A selection set waiting to be walked, and the type it selects from.
#[derive(Debug, Clone)]
pub struct TraversalFrame<'a> {
    pub type_name: Arc<str>,
    pub selection_set: &'a [ast::Selection],
}

impl<'a> TraversalFrame<'a> {
    #[must_use]
    pub fn new(type_name: Arc<str>, selection_set: &'a [ast::Selection]) -> Self {
        Self {
            type_name,
            selection_set,
        }
    }
}

/// Drain `queue`, recording one coordinate per field selection.
///
/// Every field is recorded against the type of the selection set it appears
/// in, whether or not the schema declares it. Descent into a field's own
/// selection set only happens when the index knows both the parent type and
/// the field; otherwise that branch ends at the field itself.
///
/// Fragment spreads are skipped: fragment definitions are seeded as their own
/// roots. An inline fragment without a type condition keeps the parent type.
pub fn walk(
    mut queue: Vec<TraversalFrame<'_>>,
    index: &SchemaFieldIndex,
    mut coordinates: CoordinateSet,
) -> CoordinateSet {
    while let Some(frame) = queue.pop() {
        tracing::trace!(type_name = %frame.type_name, selections = frame.selection_set.len(), "Walking frame");

        for selection in frame.selection_set {
            match selection {
                ast::Selection::FragmentSpread(_) => {}
                ast::Selection::InlineFragment(inline) => {
                    let type_name = inline
                        .type_condition
                        .as_ref()
                        .map_or_else(|| Arc::clone(&frame.type_name), |tc| Arc::from(tc.as_str()));
                    queue.push(TraversalFrame::new(type_name, &inline.selection_set));
                }
                ast::Selection::Field(field) => {
                    let field_name = field.name.as_str();
                    coordinates.insert(SchemaCoordinate::field(
                        Arc::clone(&frame.type_name),
                        field_name,
                    ));

                    if field.selection_set.is_empty() {
                        continue;
                    }

                    if let Some(return_type) = index.return_type(&frame.type_name, field_name) {
                        queue.push(TraversalFrame::new(
                            Arc::clone(return_type),
                            &field.selection_set,
                        ));
                    } else {
                        tracing::debug!(
                            type_name = %frame.type_name,
                            field_name,
                            "Unknown type or field, not descending"
                        );
                    }
                }
            }
        }
    }

    coordinates
}
