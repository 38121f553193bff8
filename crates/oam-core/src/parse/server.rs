use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Name of the server variable that carries a document's resource namespace.
pub const BASE_PATH_VARIABLE: &str = "basePath";

/// A server variable for URL templates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerVariable {
    pub default: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<String>,
}

/// A server URL definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub variables: IndexMap<String, ServerVariable>,
}

impl Server {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
            variables: IndexMap::new(),
        }
    }

    /// Default value of the `basePath` variable, if declared.
    pub fn base_path(&self) -> Option<&str> {
        self.variables
            .get(BASE_PATH_VARIABLE)
            .map(|v| v.default.as_str())
    }

    /// The same server with the `/{basePath}` template segment removed.
    pub fn without_base_path(&self) -> Server {
        Server::new(self.url.replace("/{basePath}", ""))
    }
}
