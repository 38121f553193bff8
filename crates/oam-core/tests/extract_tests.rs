use oam_core::extract::Extractor;
use oam_core::graph::{SchemaGraph, used_schema_names};
use oam_core::parse::{self, operation::HttpMethod, spec::OpenApiSpec};

const API_A: &str = include_str!("fixtures/api-a.yaml");
const API_B: &str = include_str!("fixtures/api-b.yaml");
const API_C: &str = include_str!("fixtures/api-c.yaml");

fn load(yaml: &str) -> OpenApiSpec {
    parse::from_yaml(yaml).expect("fixture should parse")
}

#[test]
fn keeps_only_tagged_operations() {
    let out = Extractor::default()
        .extract_document(load(API_A))
        .expect("ApiA has external operations");

    let item = &out.paths["/items"];
    assert!(item.operation(HttpMethod::Get).is_some());
    assert!(item.operation(HttpMethod::Post).is_none());
    assert!(item.operation(HttpMethod::Options).is_none());
}

#[test]
fn drops_schemas_only_used_by_removed_operations() {
    let out = Extractor::default()
        .extract_document(load(API_A))
        .expect("ApiA has external operations");

    let names: Vec<&str> = out.schema_names().collect();
    assert_eq!(names, vec!["Response", "Item", "Error"]);
}

#[test]
fn every_kept_schema_is_reachable() {
    let out = Extractor::default().extract(vec![load(API_A), load(API_B)]);
    for doc in &out {
        let used = used_schema_names(doc);
        for name in doc.schema_names() {
            assert!(used.contains(name), "{name} should be reachable");
        }
        // ...and every reachable schema is still there
        let graph = SchemaGraph::for_spec(doc);
        for name in &used {
            assert!(graph.resolve(name).is_some(), "{name} should be kept");
        }
    }
}

#[test]
fn documents_without_tagged_operations_are_removed() {
    let out = Extractor::default().extract(vec![load(API_A), load(API_C), load(API_B)]);
    let titles: Vec<&str> = out.iter().map(OpenApiSpec::title).collect();
    assert_eq!(titles, vec!["ApiA", "ApiB"]);
}

#[test]
fn extraction_is_idempotent() {
    let once = Extractor::default()
        .extract_document(load(API_B))
        .expect("ApiB has external operations");
    let twice = Extractor::default()
        .extract_document(once.clone())
        .expect("still has external operations");
    assert_eq!(once, twice);
}
