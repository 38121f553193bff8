use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::schema::SchemaOrRef;

/// A media type object: the schema carried under one content type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MediaType {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaOrRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub examples: IndexMap<String, serde_json::Value>,

    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

/// Content-type keyed media types, shared by request bodies and responses.
pub type Content = IndexMap<String, MediaType>;

/// Call `f` on every schema `$ref` string under `content`.
pub fn visit_content_refs_mut(content: &mut Content, f: &mut impl FnMut(&mut String)) {
    for media in content.values_mut() {
        if let Some(ref mut schema) = media.schema {
            schema.visit_refs_mut(f);
        }
    }
}
