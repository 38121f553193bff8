use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::header::HeaderOrRef;
use super::media_type::{Content, visit_content_refs_mut};

pub const RESPONSE_REF_PREFIX: &str = "#/components/responses/";

/// A response definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: Content,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, HeaderOrRef>,

    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

/// A reference or inline response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Response(Response),
}

impl ResponseOrRef {
    pub fn ref_name(&self) -> Option<&str> {
        match self {
            ResponseOrRef::Ref { ref_path } => ref_path.strip_prefix(RESPONSE_REF_PREFIX),
            ResponseOrRef::Response(_) => None,
        }
    }

    /// Call `f` on this response's own `$ref`, or on every ref under its
    /// content and headers.
    pub fn visit_refs_mut(&mut self, f: &mut impl FnMut(&mut String)) {
        match self {
            ResponseOrRef::Ref { ref_path } => f(ref_path),
            ResponseOrRef::Response(response) => {
                visit_content_refs_mut(&mut response.content, f);
                for header in response.headers.values_mut() {
                    header.visit_refs_mut(f);
                }
            }
        }
    }
}
