use anyhow::Result;
use indexmap::IndexMap;
use tracing::{debug, info};

use super::error::ClassificationError;
use super::identity::{ArtifactIdentity, ArtifactKey};
use crate::model::{BinaryRef, BinarySpec, ModuleHandle, ProjectModelProvider};

/// A binary built from source by a module of this build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeBinary {
    pub id: ArtifactIdentity,
    pub buildable: bool,
    /// Forward dependencies in model order, not yet narrowed
    pub dependencies: Vec<BinaryRef>,
}

impl TryFrom<&BinarySpec> for NativeBinary {
    type Error = ClassificationError;

    fn try_from(spec: &BinarySpec) -> Result<Self, Self::Error> {
        if !spec.kind.is_native() {
            return Err(ClassificationError::UnsupportedKind {
                key: spec.id.key().into_string(),
                kind: spec.kind,
            });
        }
        Ok(Self {
            id: spec.id.clone(),
            buildable: spec.buildable,
            dependencies: spec.dependencies.clone(),
        })
    }
}

impl NativeBinary {
    pub fn key(&self) -> ArtifactKey {
        self.id.key()
    }
}

/// Native binaries of one build keyed by [`ArtifactKey`], in module order.
#[derive(Debug, Clone, Default)]
pub struct BinaryRegistry {
    binaries: IndexMap<ArtifactKey, NativeBinary>,
    skipped: usize,
}

impl BinaryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a binary. A colliding key replaces the value but keeps its position.
    pub fn insert(&mut self, binary: NativeBinary) -> Option<NativeBinary> {
        self.binaries.insert(binary.key(), binary)
    }

    pub fn get(&self, key: &ArtifactKey) -> Option<&NativeBinary> {
        self.binaries.get(key)
    }

    pub fn get_index_of(&self, key: &ArtifactKey) -> Option<usize> {
        self.binaries.get_index_of(key)
    }

    pub fn get_index(&self, position: usize) -> Option<(&ArtifactKey, &NativeBinary)> {
        self.binaries.get_index(position)
    }

    pub fn contains(&self, key: &ArtifactKey) -> bool {
        self.binaries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArtifactKey, &NativeBinary)> {
        self.binaries.iter()
    }

    pub fn len(&self) -> usize {
        self.binaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.binaries.is_empty()
    }

    /// Model records that were not native binaries
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

pub struct RegistryBuilder;

impl RegistryBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Collect every native binary the provider realizes. Modules are visited
    /// sorted by path so collisions resolve the same way on every run.
    pub fn build<P: ProjectModelProvider>(&self, provider: &P) -> Result<BinaryRegistry> {
        let mut modules: Vec<ModuleHandle> = provider.enumerate_modules();
        modules.sort();

        let mut registry = BinaryRegistry::new();

        for module in &modules {
            for component in provider.realized_components(module)? {
                for spec in &component.binaries {
                    match NativeBinary::try_from(spec) {
                        Ok(binary) => {
                            if let Some(previous) = registry.insert(binary) {
                                debug!("Binary {} replaced by a later module", previous.id);
                            }
                        }
                        Err(err) => {
                            debug!("Skipping binary: {}", err);
                            registry.skipped += 1;
                        }
                    }
                }
            }
        }

        info!(
            "Registered {} native binaries from {} modules ({} skipped)",
            registry.len(),
            modules.len(),
            registry.skipped
        );

        Ok(registry)
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
