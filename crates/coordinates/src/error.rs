use crate::OperationKind;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoordinateError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoordinateError {
    /// The document or schema text could not be parsed or built.
    #[error("Syntax error in {source_name}:\n{message}")]
    Syntax {
        source_name: String,
        message: String,
    },

    /// The document has no operation definition to start traversal from.
    #[error("Document contains no operation definitions")]
    EmptyDocument,

    /// The schema declares no root type for this kind of operation.
    #[error("Unsupported operation kind `{0}`: the schema declares no {0} root type")]
    UnsupportedOperation(OperationKind),
}

impl CoordinateError {
    pub(crate) fn syntax(
        source_name: impl Into<String>,
        diagnostics: impl IntoIterator<Item = impl std::fmt::Display>,
    ) -> Self {
        let message = diagnostics
            .into_iter()
            .map(|d| d.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        Self::Syntax {
            source_name: source_name.into(),
            message,
        }
    }
}
