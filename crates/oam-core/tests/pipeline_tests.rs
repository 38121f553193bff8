use oam_core::config::OamConfig;
use oam_core::parse::parameter::ParameterOrRef;
use oam_core::parse::{self, operation::HttpMethod};
use oam_core::pipeline::{COMPOSITE_FILE_NAME, Pipeline, Source};

const BASE: &str = include_str!("fixtures/base.yaml");
const API_A: &str = include_str!("fixtures/api-a.yaml");
const API_B: &str = include_str!("fixtures/api-b.yaml");
const API_C: &str = include_str!("fixtures/api-c.yaml");
const UPSTREAM_A: &str = include_str!("fixtures/upstream-a.yaml");

fn sources(texts: &[&str]) -> Vec<Source> {
    texts
        .iter()
        .map(|t| Source::parse(*t).expect("fixture should parse"))
        .collect()
}

fn config(yaml: &str) -> OamConfig {
    serde_yaml_ng::from_str(yaml).expect("config should parse")
}

#[test]
fn excluded_sources_are_not_merged() {
    let config = config("selection:\n  domain: api.example.org\n  excluded: [ApiC]\n");
    let template = parse::from_yaml(BASE).unwrap();
    let output = Pipeline::from_config(&config)
        .run(template, sources(&[API_C, API_B, API_A]), &[])
        .expect("should combine");

    let titles: Vec<&str> = output.sources.iter().map(|s| s.spec.title()).collect();
    assert_eq!(titles, vec!["ApiA", "ApiB"]);
    assert_eq!(output.composite.paths.len(), 2);
}

#[test]
fn upstream_overrides_reach_the_composite() {
    let template = parse::from_yaml(BASE).unwrap();
    let upstream = parse::from_yaml(UPSTREAM_A).unwrap();
    let output = Pipeline::default()
        .run(template, sources(&[API_A]), &[upstream])
        .expect("should combine");

    let op = output.composite.paths["/orders/items"]
        .operation(HttpMethod::Get)
        .unwrap();
    let ParameterOrRef::Parameter(filter) = &op.parameters[0] else {
        panic!("expected inline parameter");
    };
    assert_eq!(filter.style.as_deref(), Some("deepObject"));
    assert_eq!(filter.explode, Some(true));
    assert!(output.composite.schema_names().any(|n| n == "ItemFilter"));
}

#[test]
fn extraction_runs_before_merging() {
    let config = config("extract:\n  enabled: true\n");
    let template = parse::from_yaml(BASE).unwrap();
    let output = Pipeline::from_config(&config)
        .run(template, sources(&[API_A, API_C]), &[])
        .expect("ApiC is extracted away, so no path collision");

    assert_eq!(output.sources.len(), 1);
    let items = &output.composite.paths["/orders/items"];
    assert!(items.operation(HttpMethod::Post).is_none());
    assert!(!output.composite.schema_names().any(|n| n == "Draft"));
}

#[test]
fn artifacts_hold_composite_and_raw_sources() {
    let template = parse::from_yaml(BASE).unwrap();
    let output = Pipeline::default()
        .run(template, sources(&[API_B, API_A]), &[])
        .expect("should combine");
    let artifacts = output.artifacts().unwrap();

    let paths: Vec<&str> = artifacts.iter().map(|a| a.path.as_str()).collect();
    assert_eq!(paths, vec![COMPOSITE_FILE_NAME, "apia.yaml", "apib.yaml"]);
    assert_eq!(artifacts[1].content, API_A);

    let composite = parse::from_yaml(&artifacts[0].content).expect("composite should parse");
    assert_eq!(composite, output.composite);
}

#[test]
fn naming_issues_are_reported_not_fatal() {
    let renamed = API_B.replace("    Invoice:\n", "    Invoice2:\n").replace(
        "#/components/schemas/Invoice\"",
        "#/components/schemas/Invoice2\"",
    );
    let template = parse::from_yaml(BASE).unwrap();
    let output = Pipeline::default()
        .run(template, sources(&[renamed.as_str()]), &[])
        .expect("naming issues are warnings");
    assert_eq!(output.naming_issues.len(), 1);
    assert_eq!(output.naming_issues[0].schema(), "Invoice2");
}
