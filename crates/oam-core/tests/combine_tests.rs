use std::collections::HashSet;

use oam_core::error::MergeError;
use oam_core::graph::dangling_refs;
use oam_core::merge::{CombineOptions, Combiner};
use oam_core::parse::operation::HttpMethod;
use oam_core::parse::header::HeaderOrRef;
use oam_core::parse::response::ResponseOrRef;
use oam_core::parse::schema::SchemaOrRef;
use oam_core::parse::{self, spec::OpenApiSpec};

const BASE: &str = include_str!("fixtures/base.yaml");
const API_A: &str = include_str!("fixtures/api-a.yaml");
const API_B: &str = include_str!("fixtures/api-b.yaml");
const API_C: &str = include_str!("fixtures/api-c.yaml");

fn load(yaml: &str) -> OpenApiSpec {
    parse::from_yaml(yaml).expect("fixture should parse")
}

fn combine(sources: &[&str]) -> Result<OpenApiSpec, MergeError> {
    let options = CombineOptions::new("api.example.org");
    let mut others: Vec<OpenApiSpec> = sources.iter().map(|s| load(s)).collect();
    Combiner::new(&options).combine(load(BASE), &mut others)
}

fn response_schema(spec: &OpenApiSpec, path: &str, status: &str) -> SchemaOrRef {
    let op = spec.paths[path]
        .operation(HttpMethod::Get)
        .expect("should have GET");
    match &op.responses[status] {
        ResponseOrRef::Response(r) => r.content["application/json"]
            .schema
            .clone()
            .expect("should have a schema"),
        ResponseOrRef::Ref { .. } => panic!("expected inline response"),
    }
}

#[test]
fn identical_schemas_are_merged_once() {
    let merged = combine(&[API_A, API_B]).expect("should combine");
    let schemas = &merged.components.as_ref().unwrap().schemas;
    assert_eq!(schemas.keys().filter(|k| *k == "Error").count(), 1);
    assert_eq!(
        response_schema(&merged, "/orders/items", "500").ref_name(),
        Some("Error")
    );
    assert_eq!(
        response_schema(&merged, "/billing/invoices", "500").ref_name(),
        Some("Error")
    );
}

#[test]
fn colliding_schemas_are_prefixed_with_title() {
    let merged = combine(&[API_A, API_B]).expect("should combine");
    let schemas = &merged.components.as_ref().unwrap().schemas;
    assert!(!schemas.contains_key("Response"));
    assert!(schemas.contains_key("ApiAResponse"));
    assert!(schemas.contains_key("ApiBResponse"));

    assert_eq!(
        response_schema(&merged, "/orders/items", "200").ref_name(),
        Some("ApiAResponse")
    );
    assert_eq!(
        response_schema(&merged, "/billing/invoices", "200").ref_name(),
        Some("ApiBResponse")
    );
}

#[test]
fn paths_are_namespaced_by_base_path() {
    let merged = combine(&[API_A, API_B]).expect("should combine");
    let paths: Vec<&str> = merged.paths.keys().map(String::as_str).collect();
    assert_eq!(paths, vec!["/orders/items", "/billing/invoices"]);

    let items = &merged.paths["/orders/items"];
    assert!(items.operation(HttpMethod::Options).is_none());
    assert_eq!(
        items.operation(HttpMethod::Post).unwrap().tags,
        vec!["ApiA".to_string()]
    );
}

#[test]
fn same_namespaced_path_is_fatal() {
    // ApiC's basePath is "/orders/", which namespaces to the same segment.
    let err = combine(&[API_A, API_C]).expect_err("should collide");
    match err {
        MergeError::PathCollision(path) => assert_eq!(path, "/orders/items"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn schemas_are_sorted_and_refs_resolve() {
    let merged = combine(&[API_A, API_B]).expect("should combine");
    let names: Vec<&str> = merged.schema_names().collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
    assert_eq!(
        names,
        vec!["ApiAResponse", "ApiBResponse", "Draft", "Error", "Invoice", "Item"]
    );
    assert!(dangling_refs(&merged).is_empty());
}

#[test]
fn one_tag_per_document_and_single_server() {
    let merged = combine(&[API_A, API_B]).expect("should combine");
    let tags: Vec<&str> = merged.tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(tags, vec!["ApiA", "ApiB"]);
    let unique: HashSet<&str> = tags.iter().copied().collect();
    assert_eq!(unique.len(), tags.len());

    assert_eq!(merged.servers.len(), 1);
    assert_eq!(merged.servers[0].url, "https://api.example.org");
    assert_eq!(merged.info.title, "Platform API");
    assert_eq!(
        merged.components.as_ref().unwrap().security_schemes.len(),
        1
    );
}

#[test]
fn combining_is_deterministic() {
    let first = parse::to_yaml(&combine(&[API_A, API_B]).unwrap()).unwrap();
    let second = parse::to_yaml(&combine(&[API_A, API_B]).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn composite_round_trips_through_yaml() {
    let merged = combine(&[API_A, API_B]).unwrap();
    let yaml = parse::to_yaml(&merged).unwrap();
    let reparsed = parse::from_yaml(&yaml).expect("composite should parse");
    assert_eq!(reparsed, merged);
}

fn rated(title: &str, rate_type: &str) -> OpenApiSpec {
    load(&format!(
        r##"
openapi: 3.0.1
info: {{ title: {title}, version: "1" }}
servers:
  - url: https://api.example.org/{{basePath}}
    variables:
      basePath: {{ default: /{title} }}
paths:
  /quota:
    get:
      responses:
        "200":
          description: ok
          headers:
            X-Rate:
              schema: {{ $ref: "#/components/schemas/Rate" }}
components:
  schemas:
    Rate:
      type: {rate_type}
      multipleOf: 5
      x-unit: requests
"##
    ))
}

#[test]
fn header_schema_refs_follow_renames() {
    let options = CombineOptions::new("api.example.org");
    let mut others = vec![rated("A", "integer"), rated("B", "number")];
    let merged = Combiner::new(&options)
        .combine(load(BASE), &mut others)
        .expect("should combine");

    let names: Vec<&str> = merged.schema_names().collect();
    assert_eq!(names, vec!["ARate", "BRate"]);
    for (path, expected) in [("/A/quota", "ARate"), ("/B/quota", "BRate")] {
        let op = merged.paths[path].operation(HttpMethod::Get).unwrap();
        let ResponseOrRef::Response(ok) = &op.responses["200"] else {
            panic!("expected inline response");
        };
        let HeaderOrRef::Header(header) = &ok.headers["X-Rate"] else {
            panic!("expected inline header");
        };
        assert_eq!(
            header.schema.as_ref().and_then(SchemaOrRef::ref_name),
            Some(expected)
        );
    }
    assert!(dangling_refs(&merged).is_empty());
}

#[test]
fn unmodelled_keywords_reach_the_composite() {
    let options = CombineOptions::new("api.example.org");
    let mut others = vec![rated("A", "integer"), rated("B", "integer")];
    let merged = Combiner::new(&options)
        .combine(load(BASE), &mut others)
        .expect("should combine");

    // identical definitions, so no rename
    assert_eq!(merged.schema_names().collect::<Vec<_>>(), vec!["Rate"]);
    let yaml = parse::to_yaml(&merged).unwrap();
    assert!(yaml.contains("multipleOf: 5"));
    assert!(yaml.contains("x-unit: requests"));
}
