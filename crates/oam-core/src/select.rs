//! Pick which source documents take part in a combine run.

use std::collections::HashSet;

use log::{debug, info};

use crate::parse::spec::OpenApiSpec;

/// Inputs to [`select_sources`].
#[derive(Debug, Clone, Default)]
pub struct SelectionOptions {
    /// Substring a document's servers must contain. Empty matches all.
    pub domain: String,
    /// Titles never selected.
    pub excluded: Vec<String>,
}

/// Filter, de-duplicate and order source documents, or anything wrapping
/// one.
///
/// When several documents share a title, the one whose `basePath` has the
/// fewest dashes wins; ties keep input order. The result is sorted by title.
pub fn select_sources<T>(docs: Vec<T>, options: &SelectionOptions) -> Vec<T>
where
    T: AsRef<OpenApiSpec>,
{
    let mut selected: Vec<T> = docs
        .into_iter()
        .filter(|doc| {
            let doc = doc.as_ref();
            let excluded = options.excluded.iter().any(|t| t == doc.title());
            if excluded {
                info!("API {} is excluded", doc.title());
            }
            !excluded
        })
        .filter(|doc| {
            let doc = doc.as_ref();
            let matches = serves_domain(doc, &options.domain);
            if !matches {
                info!(
                    "API {} has no server on '{}', skipping",
                    doc.title(),
                    options.domain
                );
            }
            matches
        })
        .collect();

    selected.sort_by_key(|doc| base_path_dashes(doc.as_ref()));

    let mut seen = HashSet::new();
    selected.retain(|doc| {
        let doc = doc.as_ref();
        let first = seen.insert(doc.title().to_string());
        if !first {
            debug!("API {} is a duplicate, keeping an earlier stage", doc.title());
        }
        first
    });

    selected.sort_by(|a, b| a.as_ref().title().cmp(b.as_ref().title()));
    selected
}

/// Documents without servers are always accepted.
fn serves_domain(doc: &OpenApiSpec, domain: &str) -> bool {
    doc.servers.is_empty() || doc.servers.iter().any(|s| s.url.contains(domain))
}

fn base_path_dashes(doc: &OpenApiSpec) -> usize {
    doc.servers
        .first()
        .and_then(|s| s.base_path())
        .map_or(0, |base| base.matches('-').count())
}
