//! Reachability over the component schema graph.
//!
//! Nodes are either inline schemas (owned by their parent, so visited once per
//! walk) or named component schemas looked up in `components.schemas`. Named
//! nodes are tracked by name, which is what makes cyclic graphs terminate.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};

use crate::parse::components::Components;
use crate::parse::header::HeaderOrRef;
use crate::parse::media_type::Content;
use crate::parse::operation::Operation;
use crate::parse::parameter::ParameterOrRef;
use crate::parse::request_body::RequestBodyOrRef;
use crate::parse::response::ResponseOrRef;
use crate::parse::schema::SchemaOrRef;
use crate::parse::spec::OpenApiSpec;

/// Read-only view of a document's schema node table.
pub struct SchemaGraph<'a> {
    schemas: Option<&'a IndexMap<String, SchemaOrRef>>,
}

impl<'a> SchemaGraph<'a> {
    pub fn new(components: Option<&'a Components>) -> Self {
        Self {
            schemas: components.map(|c| &c.schemas),
        }
    }

    pub fn for_spec(spec: &'a OpenApiSpec) -> Self {
        Self::new(spec.components.as_ref())
    }

    /// Look up a component schema by name.
    pub fn resolve(&self, name: &str) -> Option<&'a SchemaOrRef> {
        self.schemas.and_then(|s| s.get(name))
    }

    /// Every schema nested under `root`, excluding `root` itself, in
    /// depth-first order. A `$ref` contributes its resolved target once per
    /// walk; refs that resolve to nothing are leaves.
    pub fn reachable_schemas<'b>(&self, root: &'b SchemaOrRef) -> Vec<&'b SchemaOrRef>
    where
        'a: 'b,
    {
        let mut out = Vec::new();
        self.walk(root, |node| out.push(node));
        out
    }

    /// Names of every component schema referenced from `root`, directly or
    /// transitively, in discovery order. Dangling names are included.
    pub fn reachable_names(&self, root: &SchemaOrRef) -> IndexSet<String> {
        let mut names = IndexSet::new();
        if let Some(name) = root.ref_name() {
            names.insert(name.to_string());
        }
        self.walk(root, |node| {
            if let Some(name) = node.ref_name() {
                names.insert(name.to_string());
            }
        });
        names
    }

    /// Transitive closure of `names` over the reference graph.
    pub fn closure<I, S>(&self, names: I) -> IndexSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut used = IndexSet::new();
        for name in names {
            let name = name.as_ref();
            used.insert(name.to_string());
            if let Some(schema) = self.resolve(name) {
                used.extend(self.reachable_names(schema));
            }
        }
        used
    }

    fn walk<'b>(&self, root: &'b SchemaOrRef, mut visit: impl FnMut(&'b SchemaOrRef))
    where
        'a: 'b,
    {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&'b SchemaOrRef> = Vec::new();
        self.expand(root, &mut seen, &mut stack);

        while let Some(node) = stack.pop() {
            visit(node);
            self.expand(node, &mut seen, &mut stack);
        }
    }

    /// Push the successors of `node`, reversed so they pop in source order.
    fn expand<'b>(
        &self,
        node: &'b SchemaOrRef,
        seen: &mut HashSet<&'b str>,
        stack: &mut Vec<&'b SchemaOrRef>,
    ) where
        'a: 'b,
    {
        match node {
            SchemaOrRef::Ref { .. } => {
                let Some(name) = node.ref_name() else {
                    return;
                };
                if !seen.insert(name) {
                    return;
                }
                if let Some(target) = self.resolve(name) {
                    stack.push(target);
                }
            }
            SchemaOrRef::Schema(schema) => {
                stack.extend(schema.children().into_iter().rev());
            }
        }
    }
}

/// Collect ref names found in `schema` without following them.
fn direct_ref_names(schema: &SchemaOrRef, out: &mut IndexSet<String>) {
    if let Some(name) = schema.ref_name() {
        out.insert(name.to_string());
    }
    for child in schema.children() {
        direct_ref_names(child, out);
    }
}

/// Non-schema components referenced by `$ref`, per component map.
#[derive(Debug, Default)]
pub struct ComponentRefs {
    pub parameters: IndexSet<String>,
    pub request_bodies: IndexSet<String>,
    pub responses: IndexSet<String>,
    pub headers: IndexSet<String>,
}

/// Gathers the schema roots of parameters, bodies, responses and headers,
/// following component refs (each named component once).
struct Roots<'a> {
    components: Option<&'a Components>,
    schemas: Vec<&'a SchemaOrRef>,
    refs: ComponentRefs,
}

impl<'a> Roots<'a> {
    fn new(components: Option<&'a Components>) -> Self {
        Self {
            components,
            schemas: Vec::new(),
            refs: ComponentRefs::default(),
        }
    }

    fn content(&mut self, content: &'a Content) {
        self.schemas
            .extend(content.values().filter_map(|media| media.schema.as_ref()));
    }

    fn parameter(&mut self, param: &'a ParameterOrRef) {
        match param {
            ParameterOrRef::Parameter(p) => {
                self.schemas.extend(p.schema.as_ref());
                self.content(&p.content);
            }
            ParameterOrRef::Ref { .. } => {
                let Some(name) = param.ref_name() else {
                    return;
                };
                if !self.refs.parameters.insert(name.to_string()) {
                    return;
                }
                if let Some(target) = self.components.and_then(|c| c.parameters.get(name)) {
                    self.parameter(target);
                }
            }
        }
    }

    fn request_body(&mut self, body: &'a RequestBodyOrRef) {
        match body {
            RequestBodyOrRef::RequestBody(b) => self.content(&b.content),
            RequestBodyOrRef::Ref { .. } => {
                let Some(name) = body.ref_name() else {
                    return;
                };
                if !self.refs.request_bodies.insert(name.to_string()) {
                    return;
                }
                if let Some(target) = self.components.and_then(|c| c.request_bodies.get(name)) {
                    self.request_body(target);
                }
            }
        }
    }

    fn response(&mut self, response: &'a ResponseOrRef) {
        match response {
            ResponseOrRef::Response(r) => {
                self.content(&r.content);
                for header in r.headers.values() {
                    self.header(header);
                }
            }
            ResponseOrRef::Ref { .. } => {
                let Some(name) = response.ref_name() else {
                    return;
                };
                if !self.refs.responses.insert(name.to_string()) {
                    return;
                }
                if let Some(target) = self.components.and_then(|c| c.responses.get(name)) {
                    self.response(target);
                }
            }
        }
    }

    fn header(&mut self, header: &'a HeaderOrRef) {
        match header {
            HeaderOrRef::Header(h) => {
                self.schemas.extend(h.schema.as_ref());
                self.content(&h.content);
            }
            HeaderOrRef::Ref { .. } => {
                let Some(name) = header.ref_name() else {
                    return;
                };
                if !self.refs.headers.insert(name.to_string()) {
                    return;
                }
                if let Some(target) = self.components.and_then(|c| c.headers.get(name)) {
                    self.header(target);
                }
            }
        }
    }

    fn operation(&mut self, op: &'a Operation) {
        for param in &op.parameters {
            self.parameter(param);
        }
        if let Some(ref body) = op.request_body {
            self.request_body(body);
        }
        for response in op.responses.values() {
            self.response(response);
        }
    }

    fn paths(&mut self, spec: &'a OpenApiSpec) {
        for item in spec.paths.values() {
            for param in &item.parameters {
                self.parameter(param);
            }
            for op in item.operations.values() {
                self.operation(op);
            }
        }
    }

    /// Every entry of every component map, used or not.
    fn all_components(&mut self, components: &'a Components) {
        self.schemas.extend(components.schemas.values());
        for param in components.parameters.values() {
            self.parameter(param);
        }
        for body in components.request_bodies.values() {
            self.request_body(body);
        }
        for response in components.responses.values() {
            self.response(response);
        }
        for header in components.headers.values() {
            self.header(header);
        }
    }

    fn direct_names(&self) -> IndexSet<String> {
        let mut names = IndexSet::new();
        for root in &self.schemas {
            direct_ref_names(root, &mut names);
        }
        names
    }
}

/// Schema ref names used directly by the document's operations: response
/// content and headers, request bodies, parameter schemas, and the schemas
/// of referenced component parameters, responses, request bodies and headers.
pub fn referenced_names_from_paths(spec: &OpenApiSpec) -> IndexSet<String> {
    let mut roots = Roots::new(spec.components.as_ref());
    roots.paths(spec);
    roots.direct_names()
}

/// Parameters, request bodies, responses and headers the document's paths
/// reference through `components`, directly or through another component.
pub fn referenced_components(spec: &OpenApiSpec) -> ComponentRefs {
    let mut roots = Roots::new(spec.components.as_ref());
    roots.paths(spec);
    roots.refs
}

/// Every schema name the document's operations can reach.
pub fn used_schema_names(spec: &OpenApiSpec) -> IndexSet<String> {
    SchemaGraph::for_spec(spec).closure(referenced_names_from_paths(spec))
}

/// Schema ref names that appear anywhere in the document but have no entry
/// in `components.schemas`.
pub fn dangling_refs(spec: &OpenApiSpec) -> Vec<String> {
    let mut roots = Roots::new(spec.components.as_ref());
    roots.paths(spec);
    if let Some(ref components) = spec.components {
        roots.all_components(components);
    }
    let graph = SchemaGraph::for_spec(spec);
    roots
        .direct_names()
        .into_iter()
        .filter(|name| graph.resolve(name).is_none())
        .collect()
}
