use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::header::HeaderOrRef;
use super::parameter::ParameterOrRef;
use super::request_body::RequestBodyOrRef;
use super::response::ResponseOrRef;
use super::schema::SchemaOrRef;
use super::security::SecurityScheme;

/// Components object holding reusable definitions, each map keyed by name.
///
/// `schemas` doubles as the node table of the reference graph: a `$ref` is
/// resolved by looking its name up here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Components {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub schemas: IndexMap<String, SchemaOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, ResponseOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, ParameterOrRef>,

    #[serde(
        rename = "requestBodies",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub request_bodies: IndexMap<String, RequestBodyOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, HeaderOrRef>,

    #[serde(
        rename = "securitySchemes",
        default,
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub security_schemes: IndexMap<String, SecurityScheme>,

    /// `examples`, `links`, `callbacks` and `x-*` extensions.
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

/// Re-key every entry of `map` named in `renames`, keeping map positions.
pub fn rename_keys<T>(map: &mut IndexMap<String, T>, renames: &IndexMap<String, String>) {
    if !map.keys().any(|name| renames.contains_key(name)) {
        return;
    }
    let entries = std::mem::take(map);
    *map = entries
        .into_iter()
        .map(|(name, value)| match renames.get(&name) {
            Some(to) => (to.clone(), value),
            None => (name, value),
        })
        .collect();
}

impl Components {
    pub fn visit_refs_mut(&mut self, f: &mut impl FnMut(&mut String)) {
        for schema in self.schemas.values_mut() {
            schema.visit_refs_mut(f);
        }
        for param in self.parameters.values_mut() {
            param.visit_refs_mut(f);
        }
        for response in self.responses.values_mut() {
            response.visit_refs_mut(f);
        }
        for body in self.request_bodies.values_mut() {
            body.visit_refs_mut(f);
        }
        for header in self.headers.values_mut() {
            header.visit_refs_mut(f);
        }
    }
}
