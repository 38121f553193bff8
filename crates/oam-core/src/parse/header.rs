use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::media_type::{Content, visit_content_refs_mut};
use super::schema::SchemaOrRef;

pub const HEADER_REF_PREFIX: &str = "#/components/headers/";

/// A response header. Shaped like a parameter without `name` and `in`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Header {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: Content,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub explode: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,

    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

/// A reference or inline header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Header(Header),
}

impl HeaderOrRef {
    pub fn ref_name(&self) -> Option<&str> {
        match self {
            HeaderOrRef::Ref { ref_path } => ref_path.strip_prefix(HEADER_REF_PREFIX),
            HeaderOrRef::Header(_) => None,
        }
    }

    pub fn visit_refs_mut(&mut self, f: &mut impl FnMut(&mut String)) {
        match self {
            HeaderOrRef::Ref { ref_path } => f(ref_path),
            HeaderOrRef::Header(header) => {
                if let Some(ref mut schema) = header.schema {
                    schema.visit_refs_mut(f);
                }
                visit_content_refs_mut(&mut header.content, f);
            }
        }
    }
}
