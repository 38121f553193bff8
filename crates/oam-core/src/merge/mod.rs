pub mod combiner;
pub mod resolver;

pub use combiner::{CombineOptions, Combiner};
pub use resolver::{
    ComponentKind, MAX_RENAME_ITERATIONS, find_duplicate_schema_names, resolve_collisions,
};
