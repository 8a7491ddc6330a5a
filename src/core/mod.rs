pub mod error;
pub mod identity;
pub mod index;
pub mod registry;
pub mod resolver;

pub use error::{ClassificationError, KeyParseError};
pub use identity::{ArtifactIdentity, ArtifactKey};
pub use index::DependencyIndex;
pub use registry::{BinaryRegistry, NativeBinary, RegistryBuilder};
pub use resolver::{BuildState, DependentsResolver, Resolution, ResolvedDependentNode};
