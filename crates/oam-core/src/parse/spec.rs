use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::components::Components;
use super::operation::{HttpMethod, Operation, PathItem};
use super::security::SecurityRequirement;
use super::server::Server;

/// Info object describing the API.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Info {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub version: String,

    #[serde(rename = "termsOfService", skip_serializing_if = "Option::is_none")]
    pub terms_of_service: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,

    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

/// Contact information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// License information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Tag definition. The combiner adds one per source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

/// Top-level OpenAPI 3.x document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenApiSpec {
    pub openapi: String,

    pub info: Info,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub servers: Vec<Server>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub paths: IndexMap<String, PathItem>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Components>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,

    /// `externalDocs` and `x-*` extensions.
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl OpenApiSpec {
    /// An empty document with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            openapi: "3.0.1".to_string(),
            info: Info {
                title: title.into(),
                ..Info::default()
            },
            servers: Vec::new(),
            paths: IndexMap::new(),
            components: None,
            tags: Vec::new(),
            security: None,
            extra: IndexMap::new(),
        }
    }

    pub fn title(&self) -> &str {
        &self.info.title
    }

    /// The resource namespace: the first server's `basePath` default with
    /// every `/` removed.
    pub fn resource_segment(&self) -> Option<String> {
        self.servers
            .first()
            .and_then(Server::base_path)
            .map(|base| base.replace('/', ""))
    }

    pub fn components_mut(&mut self) -> &mut Components {
        self.components.get_or_insert_with(Components::default)
    }

    pub fn schema_names(&self) -> impl Iterator<Item = &str> {
        self.components
            .iter()
            .flat_map(|c| c.schemas.keys().map(String::as_str))
    }

    /// Every operation in path order, with its path key and method.
    pub fn operations(&self) -> impl Iterator<Item = (&str, HttpMethod, &Operation)> {
        self.paths.iter().flat_map(|(path, item)| {
            item.operations
                .iter()
                .map(move |(method, op)| (path.as_str(), *method, op))
        })
    }

    pub fn operations_mut(&mut self) -> impl Iterator<Item = &mut Operation> {
        self.paths
            .values_mut()
            .flat_map(|item| item.operations.values_mut())
    }

    /// Call `f` on every `$ref` string in the document: paths and every
    /// component map. Schema, parameter, response, request body and header
    /// refs are all visited, so callers match on the full ref path.
    pub fn visit_refs_mut(&mut self, f: &mut impl FnMut(&mut String)) {
        for item in self.paths.values_mut() {
            item.visit_refs_mut(f);
        }
        if let Some(ref mut components) = self.components {
            components.visit_refs_mut(f);
        }
    }
}

impl AsRef<OpenApiSpec> for OpenApiSpec {
    fn as_ref(&self) -> &OpenApiSpec {
        self
    }
}
