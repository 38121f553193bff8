use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Prefix of every component schema reference.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Extract the schema name from `#/components/schemas/<Name>`.
pub fn schema_ref_name(ref_path: &str) -> Option<&str> {
    ref_path.strip_prefix(SCHEMA_REF_PREFIX)
}

/// Build `#/components/schemas/<name>`.
pub fn schema_ref(name: &str) -> String {
    format!("{SCHEMA_REF_PREFIX}{name}")
}

/// A JSON Schema type keyword value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

/// The `type` field can be a single type or an array of types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

/// A reference or inline schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Schema(Box<Schema>),
}

/// Discriminator for polymorphic schemas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discriminator {
    #[serde(rename = "propertyName")]
    pub property_name: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub mapping: IndexMap<String, String>,
}

/// A JSON Schema object as it appears in OpenAPI 3.x documents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    pub default_value: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaOrRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaOrRef>>,

    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<SchemaOrRef>,

    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaOrRef>,

    #[serde(rename = "anyOf", default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<SchemaOrRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub not: Option<Box<SchemaOrRef>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<Discriminator>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,

    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
    #[serde(rename = "uniqueItems", skip_serializing_if = "Option::is_none")]
    pub unique_items: Option<bool>,

    #[serde(rename = "readOnly", skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(rename = "writeOnly", skip_serializing_if = "Option::is_none")]
    pub write_only: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,

    /// Keywords without a dedicated field (`multipleOf`, `xml`, `x-*`, ...).
    /// Kept so equality and output see the whole schema.
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

/// `additionalProperties` can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaOrRef>),
}

impl SchemaOrRef {
    /// Shorthand for a `#/components/schemas/<name>` reference.
    pub fn reference(name: &str) -> Self {
        SchemaOrRef::Ref {
            ref_path: schema_ref(name),
        }
    }

    /// Target name if this is a component schema reference.
    pub fn ref_name(&self) -> Option<&str> {
        match self {
            SchemaOrRef::Ref { ref_path } => schema_ref_name(ref_path),
            SchemaOrRef::Schema(_) => None,
        }
    }

    /// Direct children of an inline schema; a reference has none.
    pub fn children(&self) -> Vec<&SchemaOrRef> {
        match self {
            SchemaOrRef::Ref { .. } => Vec::new(),
            SchemaOrRef::Schema(schema) => schema.children(),
        }
    }

    /// Call `f` on every `$ref` string in this schema tree.
    pub fn visit_refs_mut(&mut self, f: &mut impl FnMut(&mut String)) {
        match self {
            SchemaOrRef::Ref { ref_path } => f(ref_path),
            SchemaOrRef::Schema(schema) => schema.visit_refs_mut(f),
        }
    }

    /// Point every reference to `old` at `new` instead.
    pub fn rename_ref(&mut self, old: &str, new: &str) {
        let old_ref = schema_ref(old);
        self.visit_refs_mut(&mut |ref_path| {
            if *ref_path == old_ref {
                *ref_path = schema_ref(new);
            }
        });
    }
}

impl Schema {
    /// `items`, composition members, `not`, property values and a
    /// schema-valued `additionalProperties`, in that order.
    pub fn children(&self) -> Vec<&SchemaOrRef> {
        let mut out: Vec<&SchemaOrRef> = Vec::new();
        if let Some(ref items) = self.items {
            out.push(items);
        }
        out.extend(&self.all_of);
        out.extend(&self.any_of);
        out.extend(&self.one_of);
        if let Some(ref not) = self.not {
            out.push(not);
        }
        out.extend(self.properties.values());
        if let Some(AdditionalProperties::Schema(ref s)) = self.additional_properties {
            out.push(s);
        }
        out
    }

    pub fn visit_refs_mut(&mut self, f: &mut impl FnMut(&mut String)) {
        if let Some(ref mut items) = self.items {
            items.visit_refs_mut(f);
        }
        for member in self
            .all_of
            .iter_mut()
            .chain(self.any_of.iter_mut())
            .chain(self.one_of.iter_mut())
        {
            member.visit_refs_mut(f);
        }
        if let Some(ref mut not) = self.not {
            not.visit_refs_mut(f);
        }
        for prop in self.properties.values_mut() {
            prop.visit_refs_mut(f);
        }
        if let Some(AdditionalProperties::Schema(ref mut s)) = self.additional_properties {
            s.visit_refs_mut(f);
        }
        // Discriminator mappings carry schema refs as plain strings.
        if let Some(ref mut discriminator) = self.discriminator {
            for target in discriminator.mapping.values_mut() {
                f(target);
            }
        }
    }
}
