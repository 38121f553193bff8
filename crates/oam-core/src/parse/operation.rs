use std::collections::BTreeMap;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::parameter::ParameterOrRef;
use super::request_body::RequestBodyOrRef;
use super::response::ResponseOrRef;
use super::security::SecurityRequirement;

/// HTTP method of an operation within a path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An API operation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Operation {
    #[serde(rename = "operationId", skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterOrRef>,

    #[serde(rename = "requestBody", skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBodyOrRef>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub responses: IndexMap<String, ResponseOrRef>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecated: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<SecurityRequirement>>,

    /// `externalDocs`, `callbacks`, `servers` and `x-*` extensions.
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl Operation {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Every `$ref` in parameters, request body and responses.
    pub fn visit_refs_mut(&mut self, f: &mut impl FnMut(&mut String)) {
        for param in &mut self.parameters {
            param.visit_refs_mut(f);
        }
        if let Some(ref mut body) = self.request_body {
            body.visit_refs_mut(f);
        }
        for response in self.responses.values_mut() {
            response.visit_refs_mut(f);
        }
    }
}

/// A path item: path-level metadata plus at most one operation per method.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawPathItem", into = "RawPathItem")]
pub struct PathItem {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub parameters: Vec<ParameterOrRef>,
    pub operations: BTreeMap<HttpMethod, Operation>,
    pub extra: IndexMap<String, serde_json::Value>,
}

impl PathItem {
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        self.operations.get(&method)
    }

    pub fn operation_mut(&mut self, method: HttpMethod) -> Option<&mut Operation> {
        self.operations.get_mut(&method)
    }

    pub fn set_operation(&mut self, method: HttpMethod, op: Operation) {
        self.operations.insert(method, op);
    }

    pub fn remove_operation(&mut self, method: HttpMethod) -> Option<Operation> {
        self.operations.remove(&method)
    }

    pub fn operations_mut(&mut self) -> impl Iterator<Item = (HttpMethod, &mut Operation)> {
        self.operations.iter_mut().map(|(m, op)| (*m, op))
    }

    pub fn has_operations(&self) -> bool {
        !self.operations.is_empty()
    }

    pub fn visit_refs_mut(&mut self, f: &mut impl FnMut(&mut String)) {
        for param in &mut self.parameters {
            param.visit_refs_mut(f);
        }
        for op in self.operations.values_mut() {
            op.visit_refs_mut(f);
        }
    }
}

/// Wire shape of a path item: one optional field per method.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawPathItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    parameters: Vec<ParameterOrRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    get: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    put: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    post: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    delete: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    head: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    patch: Option<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace: Option<Operation>,
    #[serde(flatten)]
    extra: IndexMap<String, serde_json::Value>,
}

impl RawPathItem {
    fn slot(&mut self, method: HttpMethod) -> &mut Option<Operation> {
        match method {
            HttpMethod::Get => &mut self.get,
            HttpMethod::Put => &mut self.put,
            HttpMethod::Post => &mut self.post,
            HttpMethod::Delete => &mut self.delete,
            HttpMethod::Options => &mut self.options,
            HttpMethod::Head => &mut self.head,
            HttpMethod::Patch => &mut self.patch,
            HttpMethod::Trace => &mut self.trace,
        }
    }
}

impl From<RawPathItem> for PathItem {
    fn from(mut raw: RawPathItem) -> Self {
        let operations = HttpMethod::ALL
            .into_iter()
            .filter_map(|method| raw.slot(method).take().map(|op| (method, op)))
            .collect();
        PathItem {
            summary: raw.summary,
            description: raw.description,
            parameters: raw.parameters,
            operations,
            extra: raw.extra,
        }
    }
}

impl From<PathItem> for RawPathItem {
    fn from(item: PathItem) -> Self {
        let mut raw = RawPathItem {
            summary: item.summary,
            description: item.description,
            parameters: item.parameters,
            extra: item.extra,
            ..RawPathItem::default()
        };
        for (method, op) in item.operations {
            *raw.slot(method) = Some(op);
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITEM: &str = r#"
summary: Items
post:
  operationId: createItem
  responses:
    "201":
      description: created
get:
  operationId: listItems
  tags: [internal]
  responses:
    "200":
      description: ok
options:
  responses:
    "200":
      description: cors
"#;

    #[test]
    fn test_methods_are_keyed_by_enum() {
        let item: PathItem = serde_yaml_ng::from_str(ITEM).unwrap();
        let methods: Vec<HttpMethod> = item.operations.keys().copied().collect();
        assert_eq!(
            methods,
            vec![HttpMethod::Get, HttpMethod::Post, HttpMethod::Options]
        );
        assert!(item.operation(HttpMethod::Get).unwrap().has_tag("internal"));
        assert!(item.operation(HttpMethod::Delete).is_none());
    }

    #[test]
    fn test_serializes_back_to_method_fields() {
        let mut item: PathItem = serde_yaml_ng::from_str(ITEM).unwrap();
        item.remove_operation(HttpMethod::Options);
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["summary"], "Items");
        assert_eq!(value["get"]["operationId"], "listItems");
        assert_eq!(value["post"]["operationId"], "createItem");
        assert!(value.get("options").is_none());
    }

    #[test]
    fn test_extensions_survive_round_trip() {
        let yaml = r#"
x-owner: catalog
get:
  operationId: listItems
  externalDocs: { url: "https://docs.example.org/items" }
  x-rate-limit: 10
  responses:
    "200":
      description: ok
"#;
        let item: PathItem = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(item.extra["x-owner"], serde_json::json!("catalog"));
        let op = item.operation(HttpMethod::Get).unwrap();
        assert_eq!(op.extra["x-rate-limit"], serde_json::json!(10));
        assert!(op.extra.contains_key("externalDocs"));

        let again: PathItem =
            serde_yaml_ng::from_str(&serde_yaml_ng::to_string(&item).unwrap()).unwrap();
        assert_eq!(again, item);
    }

    #[test]
    fn test_empty_after_removal() {
        let mut item = PathItem::default();
        item.set_operation(HttpMethod::Head, Operation::default());
        assert!(item.has_operations());
        item.remove_operation(HttpMethod::Head);
        assert!(!item.has_operations());
    }
}
