//! Naming lint for component schemas. Findings are warnings, never errors.

use std::fmt;

use log::warn;

use crate::parse::spec::OpenApiSpec;

/// A schema name that downstream code generators are likely to mangle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamingIssue {
    ContainsDigit { schema: String },
    ContainsWhitespace { schema: String },
}

impl NamingIssue {
    pub fn schema(&self) -> &str {
        match self {
            NamingIssue::ContainsDigit { schema } | NamingIssue::ContainsWhitespace { schema } => {
                schema
            }
        }
    }
}

impl fmt::Display for NamingIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingIssue::ContainsDigit { schema } => {
                write!(f, "schema '{schema}' contains numbers")
            }
            NamingIssue::ContainsWhitespace { schema } => {
                write!(f, "schema '{schema}' contains whitespace")
            }
        }
    }
}

/// Check every component schema name of `spec`, logging each finding.
pub fn validate_schema_names(spec: &OpenApiSpec) -> Vec<NamingIssue> {
    let mut issues = Vec::new();
    for name in spec.schema_names() {
        if name.chars().any(|c| c.is_ascii_digit()) {
            issues.push(NamingIssue::ContainsDigit {
                schema: name.to_string(),
            });
        }
        if name.chars().any(char::is_whitespace) {
            issues.push(NamingIssue::ContainsWhitespace {
                schema: name.to_string(),
            });
        }
    }
    for issue in &issues {
        warn!("API {} {}", spec.title(), issue);
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::schema::SchemaOrRef;

    fn with_schemas(names: &[&str]) -> OpenApiSpec {
        let mut spec = OpenApiSpec::new("Lint");
        let components = spec.components_mut();
        for name in names {
            components
                .schemas
                .insert(name.to_string(), SchemaOrRef::reference("Other"));
        }
        spec
    }

    #[test]
    fn test_clean_names_pass() {
        let spec = with_schemas(&["Order", "OrderLine"]);
        assert!(validate_schema_names(&spec).is_empty());
    }

    #[test]
    fn test_reports_digits_and_whitespace() {
        let spec = with_schemas(&["Order2", "Order Line", "Bad 3"]);
        let issues = validate_schema_names(&spec);
        assert_eq!(
            issues,
            vec![
                NamingIssue::ContainsDigit {
                    schema: "Order2".into()
                },
                NamingIssue::ContainsWhitespace {
                    schema: "Order Line".into()
                },
                NamingIssue::ContainsDigit {
                    schema: "Bad 3".into()
                },
                NamingIssue::ContainsWhitespace {
                    schema: "Bad 3".into()
                },
            ]
        );
        assert_eq!(issues[1].schema(), "Order Line");
    }

    #[test]
    fn test_document_without_components() {
        assert!(validate_schema_names(&OpenApiSpec::new("Empty")).is_empty());
    }
}
