//! Graph schema model and catalog introspection.

pub mod introspect;
pub mod types;

pub use introspect::SchemaIntrospector;
pub use types::{
    Connectivity, NodeProperty, NodeTable, RelProperty, RelTable, Schema, TableDescriptor,
    TableKind,
};
