pub mod error;
pub use error::Result;
pub use error::Error;

pub mod registry;
pub use registry::Registry;
pub use registry::RegistryView;

pub mod changeset;
pub use changeset::Plan;

pub mod relationship_resolver;
pub use relationship_resolver::TransitiveResolver;
