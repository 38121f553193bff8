use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::media_type::{Content, visit_content_refs_mut};
use super::schema::SchemaOrRef;

/// Prefix of every component parameter reference.
pub const PARAMETER_REF_PREFIX: &str = "#/components/parameters/";

/// Parameter location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

/// An API parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,

    /// Alternative to `schema` for complex serialisations.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: Content,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,

    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

/// A reference or inline parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Parameter(Parameter),
}

impl ParameterOrRef {
    /// Target name if this is a `#/components/parameters/<name>` reference.
    pub fn ref_name(&self) -> Option<&str> {
        match self {
            ParameterOrRef::Ref { ref_path } => ref_path.strip_prefix(PARAMETER_REF_PREFIX),
            ParameterOrRef::Parameter(_) => None,
        }
    }

    /// Call `f` on this parameter's own `$ref` or on every ref under its
    /// schema and content.
    pub fn visit_refs_mut(&mut self, f: &mut impl FnMut(&mut String)) {
        match self {
            ParameterOrRef::Ref { ref_path } => f(ref_path),
            ParameterOrRef::Parameter(param) => {
                if let Some(ref mut schema) = param.schema {
                    schema.visit_refs_mut(f);
                }
                visit_content_refs_mut(&mut param.content, f);
            }
        }
    }
}
