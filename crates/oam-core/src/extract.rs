//! Reduce documents to the operations carrying a given tag and the
//! components those operations can reach.

use indexmap::{IndexMap, IndexSet};
use log::{debug, info};

use crate::graph::{referenced_components, used_schema_names};
use crate::parse::spec::OpenApiSpec;

/// Tag marking operations for public exposure.
pub const DEFAULT_EXTERNAL_TAG: &str = "external";

/// Tag-scoped operation filter followed by a component mark-and-sweep.
#[derive(Debug, Clone)]
pub struct Extractor {
    tag: String,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(DEFAULT_EXTERNAL_TAG)
    }
}

impl Extractor {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Extract every document, dropping those left without paths.
    pub fn extract(&self, docs: Vec<OpenApiSpec>) -> Vec<OpenApiSpec> {
        docs.into_iter()
            .filter_map(|doc| self.extract_document(doc))
            .collect()
    }

    /// Extract a single document. `None` when no operation carries the tag.
    pub fn extract_document(&self, mut doc: OpenApiSpec) -> Option<OpenApiSpec> {
        self.filter_operations(&mut doc);
        doc.paths.retain(|_, item| item.has_operations());
        if doc.paths.is_empty() {
            info!("API {} has no '{}' operations, dropping it", doc.title(), self.tag);
            return None;
        }
        prune_components(&mut doc);
        prune_schemas(&mut doc);
        Some(doc)
    }

    fn filter_operations(&self, doc: &mut OpenApiSpec) {
        let title = doc.info.title.clone();
        for (path, item) in doc.paths.iter_mut() {
            item.operations.retain(|method, op| {
                let keep = op.has_tag(&self.tag);
                if !keep {
                    debug!("API {title}: removing {method} {path}");
                }
                keep
            });
        }
    }
}

fn sweep<T>(map: &mut IndexMap<String, T>, used: &IndexSet<String>, title: &str, kind: &str) {
    map.retain(|name, _| {
        let keep = used.contains(name);
        if !keep {
            debug!("API {title}: removing unused {kind} {name}");
        }
        keep
    });
}

/// Drop component parameters, request bodies, responses and headers the
/// remaining operations no longer reference. Runs before the schema sweep so
/// schemas only they used go too.
fn prune_components(doc: &mut OpenApiSpec) {
    let used = referenced_components(doc);
    let title = doc.info.title.clone();
    if let Some(ref mut components) = doc.components {
        sweep(&mut components.parameters, &used.parameters, &title, "parameter");
        sweep(&mut components.request_bodies, &used.request_bodies, &title, "request body");
        sweep(&mut components.responses, &used.responses, &title, "response");
        sweep(&mut components.headers, &used.headers, &title, "header");
    }
}

/// Drop every component schema the remaining operations cannot reach.
fn prune_schemas(doc: &mut OpenApiSpec) {
    let used = used_schema_names(doc);
    let title = doc.info.title.clone();
    if let Some(ref mut components) = doc.components {
        sweep(&mut components.schemas, &used, &title, "schema");
    }
}
