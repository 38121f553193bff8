//! Fixed-point renaming of components whose names collide across documents
//! with different definitions.
//!
//! Schemas, responses, request bodies and headers are renamed. Parameters
//! keep last-write-wins semantics and security schemes keep the first
//! definition, so neither takes part.

use std::collections::{BTreeSet, HashMap};

use heck::ToPascalCase;
use indexmap::IndexMap;
use indexmap::map::Entry;
use log::{debug, info};

use crate::error::MergeError;
use crate::parse::components::{Components, rename_keys};
use crate::parse::header::HEADER_REF_PREFIX;
use crate::parse::request_body::REQUEST_BODY_REF_PREFIX;
use crate::parse::response::RESPONSE_REF_PREFIX;
use crate::parse::schema::SCHEMA_REF_PREFIX;
use crate::parse::spec::OpenApiSpec;

/// Upper bound on rename rounds before giving up.
pub const MAX_RENAME_ITERATIONS: usize = 20;

/// A component map whose colliding entries are renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    Schema,
    Response,
    RequestBody,
    Header,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 4] = [
        ComponentKind::Schema,
        ComponentKind::Response,
        ComponentKind::RequestBody,
        ComponentKind::Header,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ComponentKind::Schema => "schema",
            ComponentKind::Response => "response",
            ComponentKind::RequestBody => "request body",
            ComponentKind::Header => "header",
        }
    }

    pub fn ref_prefix(self) -> &'static str {
        match self {
            ComponentKind::Schema => SCHEMA_REF_PREFIX,
            ComponentKind::Response => RESPONSE_REF_PREFIX,
            ComponentKind::RequestBody => REQUEST_BODY_REF_PREFIX,
            ComponentKind::Header => HEADER_REF_PREFIX,
        }
    }

    fn names(self, components: &Components) -> Vec<&str> {
        match self {
            ComponentKind::Schema => keys(&components.schemas),
            ComponentKind::Response => keys(&components.responses),
            ComponentKind::RequestBody => keys(&components.request_bodies),
            ComponentKind::Header => keys(&components.headers),
        }
    }

    fn rename(self, components: &mut Components, renames: &IndexMap<String, String>) {
        match self {
            ComponentKind::Schema => rename_keys(&mut components.schemas, renames),
            ComponentKind::Response => rename_keys(&mut components.responses, renames),
            ComponentKind::RequestBody => rename_keys(&mut components.request_bodies, renames),
            ComponentKind::Header => rename_keys(&mut components.headers, renames),
        }
    }

    fn duplicates(self, docs: &[OpenApiSpec]) -> BTreeSet<String> {
        match self {
            ComponentKind::Schema => find_duplicates(docs, |c| &c.schemas),
            ComponentKind::Response => find_duplicates(docs, |c| &c.responses),
            ComponentKind::RequestBody => find_duplicates(docs, |c| &c.request_bodies),
            ComponentKind::Header => find_duplicates(docs, |c| &c.headers),
        }
    }
}

fn keys<T>(map: &IndexMap<String, T>) -> Vec<&str> {
    map.keys().map(String::as_str).collect()
}

/// Names present in more than one document with structurally different
/// definitions. The first occurrence of a name is the reference value every
/// later one is compared against.
fn find_duplicates<T: PartialEq>(
    docs: &[OpenApiSpec],
    map: impl Fn(&Components) -> &IndexMap<String, T>,
) -> BTreeSet<String> {
    let mut first_seen: IndexMap<&str, &T> = IndexMap::new();
    let mut duplicates = BTreeSet::new();

    for components in docs.iter().filter_map(|doc| doc.components.as_ref()) {
        for (name, value) in map(components) {
            match first_seen.entry(name.as_str()) {
                Entry::Occupied(existing) if *existing.get() != value => {
                    duplicates.insert(name.clone());
                }
                Entry::Occupied(_) => {}
                Entry::Vacant(slot) => {
                    slot.insert(value);
                }
            }
        }
    }
    duplicates
}

/// Schema names that occur in more than one document with structurally
/// different definitions.
pub fn find_duplicate_schema_names(docs: &[OpenApiSpec]) -> BTreeSet<String> {
    ComponentKind::Schema.duplicates(docs)
}

/// Colliding names of one round, per component kind.
#[derive(Debug)]
struct Duplicates {
    by_kind: Vec<(ComponentKind, BTreeSet<String>)>,
}

impl Duplicates {
    fn find(docs: &[OpenApiSpec]) -> Self {
        let by_kind = ComponentKind::ALL
            .into_iter()
            .map(|kind| (kind, kind.duplicates(docs)))
            .filter(|(_, names)| !names.is_empty())
            .collect();
        Self { by_kind }
    }

    fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }
}

/// Name a colliding component takes inside `doc`.
pub fn prefixed_name(doc: &OpenApiSpec, name: &str) -> String {
    format!("{}{}", doc.title().to_pascal_case(), name)
}

/// Rename colliding components until every shared name denotes one
/// definition.
///
/// Each round prefixes every duplicate with its document's title and rewrites
/// the references inside that document. Renaming can make previously equal
/// components differ (their refs now point at different names), so rounds
/// repeat until no duplicates remain or [`MAX_RENAME_ITERATIONS`] is
/// exhausted.
pub fn resolve_collisions(docs: &mut [OpenApiSpec]) -> Result<(), MergeError> {
    let mut rounds = 0;
    loop {
        let duplicates = Duplicates::find(docs);
        if duplicates.is_empty() {
            if rounds > 0 {
                info!("component names converged after {rounds} rename round(s)");
            }
            return Ok(());
        }
        if rounds == MAX_RENAME_ITERATIONS {
            return Err(MergeError::MaxRenameIterations(MAX_RENAME_ITERATIONS));
        }
        debug!("rename round {}: {:?}", rounds + 1, duplicates.by_kind);

        for doc in docs.iter_mut() {
            rename_in_document(doc, &duplicates)?;
        }
        rounds += 1;
    }
}

/// Apply one round of renames to `doc`.
///
/// The whole old-to-new mapping is computed before anything changes, so a
/// target name that is itself being renamed away does not count as taken.
fn rename_in_document(doc: &mut OpenApiSpec, duplicates: &Duplicates) -> Result<(), MergeError> {
    let Some(ref components) = doc.components else {
        return Ok(());
    };

    let mut plan: Vec<(ComponentKind, IndexMap<String, String>)> = Vec::new();
    let mut ref_renames: HashMap<String, String> = HashMap::new();

    for (kind, names) in &duplicates.by_kind {
        let existing = kind.names(components);
        let renames: IndexMap<String, String> = existing
            .iter()
            .filter(|name| names.contains(**name))
            .map(|name| (name.to_string(), prefixed_name(doc, name)))
            .collect();
        if renames.is_empty() {
            continue;
        }

        for (from, to) in &renames {
            if existing.contains(&to.as_str()) && !renames.contains_key(to) {
                return Err(MergeError::RenameConflict {
                    kind: kind.label(),
                    document: doc.title().to_string(),
                    from: from.clone(),
                    to: to.clone(),
                });
            }
            info!(
                "API {}: renaming {} {} to {}",
                doc.title(),
                kind.label(),
                from,
                to
            );
            let prefix = kind.ref_prefix();
            ref_renames.insert(format!("{prefix}{from}"), format!("{prefix}{to}"));
        }
        plan.push((*kind, renames));
    }

    if plan.is_empty() {
        return Ok(());
    }

    doc.visit_refs_mut(&mut |ref_path| {
        if let Some(new_ref) = ref_renames.get(ref_path.as_str()) {
            ref_path.clone_from(new_ref);
        }
    });
    let components = doc.components_mut();
    for (kind, renames) in &plan {
        kind.rename(components, renames);
    }
    Ok(())
}
