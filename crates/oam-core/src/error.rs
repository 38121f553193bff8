use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported OpenAPI version: {0}")]
    UnsupportedVersion(String),
}

/// Conflicts that make a merged contract unpublishable.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("max iterations of renaming schemas reached ({0} rounds)")]
    MaxRenameIterations(usize),

    #[error("cannot rename {kind} {from} to {to} in {document}: name already taken")]
    RenameConflict {
        kind: &'static str,
        document: String,
        from: String,
        to: String,
    },

    #[error("schema {0} already exists and they are not equal")]
    SchemaCollision(String),

    #[error("{kind} {name} already exists and they are not equal")]
    ComponentCollision { kind: &'static str, name: String },

    #[error("path {0} already exists")]
    PathCollision(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml_ng::Error,
    },
}
