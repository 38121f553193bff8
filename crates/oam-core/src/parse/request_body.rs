use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::media_type::{Content, visit_content_refs_mut};

pub const REQUEST_BODY_REF_PREFIX: &str = "#/components/requestBodies/";

/// A request body definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub content: Content,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,

    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

/// A reference or inline request body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestBodyOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    RequestBody(RequestBody),
}

impl RequestBodyOrRef {
    pub fn ref_name(&self) -> Option<&str> {
        match self {
            RequestBodyOrRef::Ref { ref_path } => ref_path.strip_prefix(REQUEST_BODY_REF_PREFIX),
            RequestBodyOrRef::RequestBody(_) => None,
        }
    }

    pub fn visit_refs_mut(&mut self, f: &mut impl FnMut(&mut String)) {
        match self {
            RequestBodyOrRef::Ref { ref_path } => f(ref_path),
            RequestBodyOrRef::RequestBody(body) => visit_content_refs_mut(&mut body.content, f),
        }
    }
}
