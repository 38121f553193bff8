pub mod components;
pub mod header;
pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod request_body;
pub mod response;
pub mod schema;
pub mod security;
pub mod server;
pub mod spec;

use crate::error::ParseError;
use spec::OpenApiSpec;

/// Parse an OpenAPI document from YAML.
pub fn from_yaml(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_yaml_ng::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Parse an OpenAPI document from JSON.
pub fn from_json(input: &str) -> Result<OpenApiSpec, ParseError> {
    let spec: OpenApiSpec = serde_json::from_str(input)?;
    validate_version(&spec)?;
    Ok(spec)
}

/// Serialize a document to YAML. Output is stable for identical documents.
pub fn to_yaml(spec: &OpenApiSpec) -> Result<String, ParseError> {
    Ok(serde_yaml_ng::to_string(spec)?)
}

/// Serialize a document to pretty-printed JSON.
pub fn to_json(spec: &OpenApiSpec) -> Result<String, ParseError> {
    Ok(serde_json::to_string_pretty(spec)?)
}

fn validate_version(spec: &OpenApiSpec) -> Result<(), ParseError> {
    if !spec.openapi.starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(spec.openapi.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_swagger_2() {
        let yaml = "openapi: \"2.0\"\ninfo:\n  title: Old\n  version: \"1\"\n";
        assert!(matches!(
            from_yaml(yaml),
            Err(ParseError::UnsupportedVersion(v)) if v == "2.0"
        ));
    }

    #[test]
    fn yaml_round_trip_is_stable() {
        let yaml = r#"
openapi: 3.0.1
info:
  title: Stable
  version: "1"
paths:
  /a:
    get:
      responses:
        "200":
          description: ok
"#;
        let spec = from_yaml(yaml).unwrap();
        let first = to_yaml(&spec).unwrap();
        let second = to_yaml(&from_yaml(&first).unwrap()).unwrap();
        assert_eq!(first, second);
    }
}
