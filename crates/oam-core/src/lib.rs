pub mod config;
pub mod error;
pub mod extract;
pub mod graph;
pub mod merge;
pub mod overlay;
pub mod parse;
pub mod pipeline;
pub mod select;
pub mod validate;

/// A file to publish, relative to the output directory.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub path: String,
    pub content: String,
}
