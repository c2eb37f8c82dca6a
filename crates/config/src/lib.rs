//! Loading of `.graphqlrc` project configuration.
//!
//! A config names the schema files and document globs of one project, or of
//! several named projects:
//!
//! ```yaml
//! schema: schema/*.graphql
//! documents: src/**/*.graphql
//! ```

mod config;
mod error;
mod loader;

pub use config::{DocumentsConfig, GraphQLConfig, ProjectConfig, SchemaConfig, DEFAULT_PROJECT};
pub use error::{ConfigError, Result};
pub use loader::{find_config, load_config, load_config_from_str};
