// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use thiserror::Error;

/// Errors raised while building a [`Matcher`](crate::Matcher).
///
/// These describe a malformed schema, never malformed data: data that does not match a
/// well-formed schema is reported through the boolean result of validation.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Schema document could not be parsed, or names an unknown matcher type or field.
    #[error("Failed to parse schema: {0}")]
    Parse(#[from] serde_json::Error),

    /// Schema document in YAML form could not be parsed.
    #[cfg(feature = "yaml")]
    #[error("Failed to parse schema: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Pattern does not compile.
    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}
