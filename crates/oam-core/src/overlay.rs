//! Carry hand-maintained details from an upstream copy of a document onto the
//! copy exported by the gateway. Exported documents lose parameter
//! serialization hints and schemas that no operation referenced at export
//! time; the upstream copy still has both.

use log::{debug, info};

use crate::parse::parameter::{Parameter, ParameterOrRef};
use crate::parse::spec::OpenApiSpec;

/// Apply `upstream` to `doc`. Both must describe the same API.
pub fn apply_upstream(doc: &mut OpenApiSpec, upstream: &OpenApiSpec) {
    let title = doc.info.title.clone();

    for (path, item) in doc.paths.iter_mut() {
        let Some(upstream_item) = upstream.paths.get(path) else {
            continue;
        };
        for (method, op) in item.operations_mut() {
            let Some(upstream_op) = upstream_item.operation(method) else {
                continue;
            };
            for param in op.parameters.iter_mut() {
                let ParameterOrRef::Parameter(param) = param else {
                    continue;
                };
                let matching = upstream_op.parameters.iter().find_map(|p| match p {
                    ParameterOrRef::Parameter(p)
                        if p.name == param.name && p.location == param.location =>
                    {
                        Some(p)
                    }
                    _ => None,
                });
                if let Some(upstream_param) = matching {
                    if copy_serialization(param, upstream_param) {
                        debug!(
                            "API {title}: {method} {path} parameter {} style from upstream",
                            param.name
                        );
                    }
                }
            }
        }
    }

    let Some(ref upstream_components) = upstream.components else {
        return;
    };
    let components = doc.components_mut();
    for (name, schema) in &upstream_components.schemas {
        if !components.schemas.contains_key(name) {
            debug!("API {title}: adding schema {name} from upstream");
            components.schemas.insert(name.clone(), schema.clone());
        }
    }
}

fn copy_serialization(param: &mut Parameter, upstream: &Parameter) -> bool {
    let mut changed = false;
    if upstream.style.is_some() && param.style != upstream.style {
        param.style.clone_from(&upstream.style);
        changed = true;
    }
    if upstream.explode.is_some() && param.explode != upstream.explode {
        param.explode = upstream.explode;
        changed = true;
    }
    changed
}

/// Pair each document with the upstream document of the same title and
/// apply it. Documents without a counterpart are left alone.
pub fn apply_upstream_overrides(docs: &mut [OpenApiSpec], upstreams: &[OpenApiSpec]) {
    for doc in docs.iter_mut() {
        if let Some(upstream) = upstreams.iter().find(|u| u.title() == doc.title()) {
            info!("applying upstream overrides to API {}", doc.title());
            apply_upstream(doc, upstream);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use crate::parse::operation::HttpMethod;

    const EXPORTED: &str = r#"
openapi: 3.0.1
info: { title: Search, version: "1" }
paths:
  /search:
    get:
      parameters:
        - name: filter
          in: query
          schema: { type: object }
        - name: filter
          in: header
          schema: { type: string }
      responses:
        "200": { description: ok }
components:
  schemas:
    Hit: { type: object }
"#;

    const UPSTREAM: &str = r#"
openapi: 3.0.1
info: { title: Search, version: "1" }
paths:
  /search:
    get:
      parameters:
        - name: filter
          in: query
          style: deepObject
          explode: true
          schema: { type: object }
      responses:
        "200": { description: ok }
components:
  schemas:
    Hit: { type: string }
    Facet: { type: object }
"#;

    fn param(doc: &OpenApiSpec, index: usize) -> &Parameter {
        let op = doc.paths["/search"].operation(HttpMethod::Get).unwrap();
        match &op.parameters[index] {
            ParameterOrRef::Parameter(p) => p,
            ParameterOrRef::Ref { .. } => panic!("expected inline parameter"),
        }
    }

    #[test]
    fn test_copies_style_and_explode_for_matching_parameter() {
        let mut doc = parse::from_yaml(EXPORTED).unwrap();
        let upstream = parse::from_yaml(UPSTREAM).unwrap();
        apply_upstream(&mut doc, &upstream);

        assert_eq!(param(&doc, 0).style.as_deref(), Some("deepObject"));
        assert_eq!(param(&doc, 0).explode, Some(true));
        assert_eq!(param(&doc, 1).style, None);
    }

    #[test]
    fn test_adds_missing_schemas_only() {
        let mut doc = parse::from_yaml(EXPORTED).unwrap();
        let upstream = parse::from_yaml(UPSTREAM).unwrap();
        let original_hit = doc.components.as_ref().unwrap().schemas["Hit"].clone();
        apply_upstream(&mut doc, &upstream);

        let schemas = &doc.components.as_ref().unwrap().schemas;
        assert_eq!(schemas["Hit"], original_hit);
        assert!(schemas.contains_key("Facet"));
    }

    #[test]
    fn test_overrides_pair_by_title() {
        let mut docs = vec![parse::from_yaml(EXPORTED).unwrap()];
        let mut other = parse::from_yaml(UPSTREAM).unwrap();
        other.info.title = "Other".to_string();
        apply_upstream_overrides(&mut docs, &[other]);
        assert_eq!(param(&docs[0], 0).style, None);
    }
}
