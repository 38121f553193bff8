//! The full combine run: selection, upstream overlay, naming lint, optional
//! extraction, then merging under the template.

use std::collections::HashSet;

use log::{info, warn};

use crate::Artifact;
use crate::config::OamConfig;
use crate::error::{MergeError, ParseError};
use crate::extract::Extractor;
use crate::merge::{CombineOptions, Combiner};
use crate::overlay::apply_upstream_overrides;
use crate::parse::{self, spec::OpenApiSpec};
use crate::select::{SelectionOptions, select_sources};
use crate::validate::{NamingIssue, validate_schema_names};

/// File name of the composite document.
pub const COMPOSITE_FILE_NAME: &str = "openapi.yaml";

/// A source document together with the text it was parsed from.
#[derive(Debug, Clone)]
pub struct Source {
    pub raw: String,
    pub spec: OpenApiSpec,
}

impl Source {
    /// Parse `raw` as JSON when it looks like an object, YAML otherwise.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ParseError> {
        let raw = raw.into();
        let spec = if raw.trim_start().starts_with('{') {
            parse::from_json(&raw)?
        } else {
            parse::from_yaml(&raw)?
        };
        Ok(Self { raw, spec })
    }

    /// Artifact name under which the raw source is published.
    pub fn file_name(&self) -> String {
        artifact_file_name(self.spec.title())
    }
}

impl AsRef<OpenApiSpec> for Source {
    fn as_ref(&self) -> &OpenApiSpec {
        &self.spec
    }
}

/// Lowercase letters, digits and `_`, with every other run of characters
/// collapsed to a single `-`. Never contains a path separator or a dot.
fn title_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() || c == '_' {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let trimmed = slug.trim_end_matches('-');
    if trimmed.is_empty() {
        "api".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `Orders API` becomes `orders-api.yaml`.
pub fn artifact_file_name(title: &str) -> String {
    format!("{}.yaml", title_slug(title))
}

/// Everything a combine run produced.
#[derive(Debug)]
pub struct CombineOutput {
    pub composite: OpenApiSpec,
    /// The sources that made it into the composite, in merge order.
    pub sources: Vec<Source>,
    pub naming_issues: Vec<NamingIssue>,
}

impl CombineOutput {
    /// The composite as YAML plus one file per source with its original text.
    pub fn artifacts(&self) -> Result<Vec<Artifact>, ParseError> {
        let mut artifacts = vec![Artifact {
            path: COMPOSITE_FILE_NAME.to_string(),
            content: parse::to_yaml(&self.composite)?,
        }];
        let mut taken: HashSet<String> = HashSet::from([COMPOSITE_FILE_NAME.to_string()]);
        for source in &self.sources {
            let slug = title_slug(source.spec.title());
            let mut path = format!("{slug}.yaml");
            let mut n = 2;
            while !taken.insert(path.clone()) {
                path = format!("{slug}-{n}.yaml");
                n += 1;
            }
            if path != source.file_name() {
                warn!("API {}: file name taken, publishing as {}", source.spec.title(), path);
            }
            artifacts.push(Artifact {
                path,
                content: source.raw.clone(),
            });
        }
        Ok(artifacts)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub selection: SelectionOptions,
    pub combine: CombineOptions,
    pub extractor: Option<Extractor>,
}

impl Pipeline {
    pub fn from_config(config: &OamConfig) -> Self {
        Self {
            selection: config.selection_options(),
            combine: config.combine_options(),
            extractor: config.extractor(),
        }
    }

    pub fn run(
        &self,
        template: OpenApiSpec,
        sources: Vec<Source>,
        upstreams: &[OpenApiSpec],
    ) -> Result<CombineOutput, MergeError> {
        let selected = select_sources(sources, &self.selection);
        info!("{} source document(s) selected", selected.len());

        let mut docs: Vec<OpenApiSpec> = selected.iter().map(|s| s.spec.clone()).collect();
        apply_upstream_overrides(&mut docs, upstreams);

        let naming_issues = docs.iter().flat_map(validate_schema_names).collect();

        let (selected, mut docs): (Vec<Source>, Vec<OpenApiSpec>) = match self.extractor {
            Some(ref extractor) => selected
                .into_iter()
                .zip(docs)
                .filter_map(|(source, doc)| {
                    extractor
                        .extract_document(doc)
                        .map(|doc| (source, doc))
                })
                .unzip(),
            None => (selected, docs),
        };

        let composite = Combiner::new(&self.combine).combine(template, &mut docs)?;
        Ok(CombineOutput {
            composite,
            sources: selected,
            naming_issues,
        })
    }
}
