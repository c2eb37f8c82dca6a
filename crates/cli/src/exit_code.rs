//! Exit codes for the coordinates CLI.
//!
//! Distinct codes let scripts and CI systems tell a document that failed
//! extraction apart from a broken config or schema.

/// Exit codes used by the CLI.
///
/// These follow standard Unix conventions where 0 indicates success
/// and non-zero values indicate different types of failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - every document extracted
    Success = 0,
    /// One or more documents failed extraction (syntax, no operation, unsupported operation)
    ExtractionError = 1,
    /// Configuration error (missing or invalid config file, no matching files)
    ConfigError = 2,
    /// Schema could not be parsed or built
    SchemaError = 3,
    /// I/O error (file read failure)
    IoError = 4,
}

impl ExitCode {
    /// Exit the process with this exit code.
    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }

    /// Get the numeric value of this exit code.
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Classify an error bubbled up from a command.
    #[must_use]
    pub fn for_error(error: &anyhow::Error) -> Self {
        if error.downcast_ref::<graphql_coordinates::CoordinateError>().is_some() {
            Self::SchemaError
        } else if error.downcast_ref::<std::io::Error>().is_some() {
            Self::IoError
        } else {
            Self::ConfigError
        }
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::ExtractionError => write!(f, "extraction error"),
            Self::ConfigError => write!(f, "configuration error"),
            Self::SchemaError => write!(f, "schema error"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.code(), 0);
        assert_eq!(ExitCode::ExtractionError.code(), 1);
        assert_eq!(ExitCode::ConfigError.code(), 2);
        assert_eq!(ExitCode::SchemaError.code(), 3);
        assert_eq!(ExitCode::IoError.code(), 4);
    }

    #[test]
    fn test_for_error_sees_through_context() {
        let schema_err: anyhow::Result<()> =
            Err(graphql_coordinates::CoordinateError::EmptyDocument).context("Failed to build schema");
        assert_eq!(
            ExitCode::for_error(&schema_err.unwrap_err()),
            ExitCode::SchemaError
        );

        let io_err: anyhow::Result<()> = Err(std::io::Error::other("boom")).context("Failed to read");
        assert_eq!(ExitCode::for_error(&io_err.unwrap_err()), ExitCode::IoError);

        assert_eq!(
            ExitCode::for_error(&anyhow::anyhow!("no config")),
            ExitCode::ConfigError
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitCode::SchemaError.to_string(), "schema error");
    }
}
