//! MCP resources.

pub mod home_dir;
pub mod registry;

pub use home_dir::{HOME_DIRECTORY_URI, HomeDirectoryListing, HomeDirectoryResource};
pub use registry::{ResourceHandler, ResourceRegistry};

use crate::database::{DatabaseClient, SessionStore};
use std::sync::Arc;

/// Resources of the relational server.
pub fn create_relational_resources<C: DatabaseClient>(
    session: Arc<SessionStore<C>>,
) -> ResourceRegistry {
    let registry = ResourceRegistry::new();
    registry.register(HomeDirectoryResource::new(session));
    registry
}
