use indexmap::IndexMap;
use indexmap::map::Entry;
use log::{debug, info, warn};

use super::resolver::resolve_collisions;
use crate::error::MergeError;
use crate::parse::operation::HttpMethod;
use crate::parse::spec::{OpenApiSpec, Tag};

/// Options for a combine run.
#[derive(Debug, Clone, Default)]
pub struct CombineOptions {
    /// Substring identifying the public server among the inputs' servers.
    /// Empty means there is no main server and the template's are kept.
    pub domain: String,
}

impl CombineOptions {
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
        }
    }
}

/// Folds many documents into one composite under a base template.
pub struct Combiner<'a> {
    options: &'a CombineOptions,
}

impl<'a> Combiner<'a> {
    pub fn new(options: &'a CombineOptions) -> Self {
        Self { options }
    }

    /// Merge `others` into `base`.
    ///
    /// `others` are edited in place (OPTIONS removed, colliding schemas
    /// renamed, operation tags replaced). Any error aborts the whole run.
    pub fn combine(
        &self,
        mut base: OpenApiSpec,
        others: &mut [OpenApiSpec],
    ) -> Result<OpenApiSpec, MergeError> {
        self.set_main_server(&mut base, others);
        base.components_mut();

        for doc in others.iter_mut() {
            strip_options(doc);
        }

        resolve_collisions(others)?;

        for doc in others.iter_mut() {
            info!("merging API {}", doc.title());
            base.tags.push(Tag {
                name: doc.info.title.clone(),
                description: doc.info.description.clone(),
                extra: IndexMap::new(),
            });
            for op in doc.operations_mut() {
                op.tags.clear();
            }
            merge_components(&mut base, doc)?;
            merge_paths(&mut base, doc)?;
            if let Some(ref requirements) = doc.security {
                base.security
                    .get_or_insert_with(Vec::new)
                    .extend(requirements.iter().cloned());
            }
        }

        base.components_mut().schemas.sort_keys();
        Ok(base)
    }

    fn set_main_server(&self, base: &mut OpenApiSpec, others: &[OpenApiSpec]) {
        let domain = self.options.domain.as_str();
        if domain.is_empty() {
            info!("no domain configured, keeping template servers");
            return;
        }
        let main = others
            .iter()
            .flat_map(|doc| doc.servers.iter())
            .find(|server| server.url.contains(domain));

        match main {
            Some(server) => {
                let server = server.without_base_path();
                info!("main server: {}", server.url);
                base.servers = vec![server];
            }
            None => warn!("no server matching domain '{domain}' found, keeping template servers"),
        }
    }
}

fn strip_options(doc: &mut OpenApiSpec) {
    for (path, item) in doc.paths.iter_mut() {
        if item.remove_operation(HttpMethod::Options).is_some() {
            debug!("API {}: removed OPTIONS {}", doc.info.title, path);
        }
    }
}

/// Insert every entry of `from` into `into`. Equal definitions are skipped,
/// differing ones fail with the error built by `collision`. After
/// [`resolve_collisions`] only equal definitions share a name.
fn merge_strict<T: Clone + PartialEq>(
    into: &mut IndexMap<String, T>,
    from: &IndexMap<String, T>,
    collision: impl Fn(&str) -> MergeError,
) -> Result<(), MergeError> {
    for (name, value) in from {
        match into.entry(name.clone()) {
            Entry::Occupied(existing) if existing.get() != value => {
                return Err(collision(name));
            }
            Entry::Occupied(_) => {}
            Entry::Vacant(slot) => {
                slot.insert(value.clone());
            }
        }
    }
    Ok(())
}

fn merge_components(base: &mut OpenApiSpec, doc: &OpenApiSpec) -> Result<(), MergeError> {
    let Some(ref theirs) = doc.components else {
        return Ok(());
    };
    let ours = base.components_mut();

    for (name, param) in &theirs.parameters {
        ours.parameters.insert(name.clone(), param.clone());
    }

    merge_strict(&mut ours.schemas, &theirs.schemas, |name| {
        MergeError::SchemaCollision(name.to_string())
    })?;
    merge_strict(&mut ours.responses, &theirs.responses, |name| {
        MergeError::ComponentCollision {
            kind: "response",
            name: name.to_string(),
        }
    })?;
    merge_strict(&mut ours.request_bodies, &theirs.request_bodies, |name| {
        MergeError::ComponentCollision {
            kind: "request body",
            name: name.to_string(),
        }
    })?;
    merge_strict(&mut ours.headers, &theirs.headers, |name| {
        MergeError::ComponentCollision {
            kind: "header",
            name: name.to_string(),
        }
    })?;

    for (name, scheme) in &theirs.security_schemes {
        match ours.security_schemes.get(name) {
            Some(existing) if existing != scheme => {
                warn!(
                    "API {}: security scheme {} differs from an earlier definition, keeping the first",
                    doc.title(),
                    name
                );
            }
            Some(_) => {}
            None => {
                ours.security_schemes.insert(name.clone(), scheme.clone());
            }
        }
    }
    Ok(())
}

fn merge_paths(base: &mut OpenApiSpec, doc: &OpenApiSpec) -> Result<(), MergeError> {
    let segment = doc.resource_segment().filter(|s| !s.is_empty());
    if segment.is_none() && !doc.paths.is_empty() {
        warn!(
            "API {} declares no basePath, its paths are merged without a prefix",
            doc.title()
        );
    }

    for (key, item) in &doc.paths {
        let namespaced = match segment {
            Some(ref segment) => format!("/{segment}{key}"),
            None => key.clone(),
        };

        let mut item = item.clone();
        for (_, op) in item.operations_mut() {
            op.tags = vec![doc.info.title.clone()];
        }

        match base.paths.entry(namespaced) {
            Entry::Occupied(existing) => {
                return Err(MergeError::PathCollision(existing.key().clone()));
            }
            Entry::Vacant(slot) => {
                debug!("adding path {}", slot.key());
                slot.insert(item);
            }
        }
    }
    Ok(())
}
