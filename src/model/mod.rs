//! Boundary to the build model: the provider trait the core consumes and the
//! records it yields.

pub mod snapshot;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::identity::{ArtifactIdentity, ROOT_MODULE_PATH};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum BinaryKind {
    Executable,
    SharedLibrary,
    StaticLibrary,
    /// Native library supplied from outside the build; never built here
    PrebuiltLibrary,
    Jvm,
    Other,
}

impl BinaryKind {
    /// Binaries built from source by a module of this build
    pub fn is_native(self) -> bool {
        matches!(
            self,
            BinaryKind::Executable | BinaryKind::SharedLibrary | BinaryKind::StaticLibrary
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinaryKind::Executable => "executable",
            BinaryKind::SharedLibrary => "shared-library",
            BinaryKind::StaticLibrary => "static-library",
            BinaryKind::PrebuiltLibrary => "prebuilt-library",
            BinaryKind::Jvm => "jvm",
            BinaryKind::Other => "other",
        }
    }
}

impl fmt::Display for BinaryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a binary as seen from a dependency declaration or a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BinaryRef {
    pub id: ArtifactIdentity,
    pub kind: BinaryKind,
}

impl BinaryRef {
    pub fn new(id: ArtifactIdentity, kind: BinaryKind) -> Self {
        Self { id, kind }
    }
}

/// A binary as realized by the build model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinarySpec {
    pub id: ArtifactIdentity,
    pub kind: BinaryKind,
    pub buildable: bool,
    pub dependencies: Vec<BinaryRef>,
}

impl BinarySpec {
    pub fn new(id: ArtifactIdentity, kind: BinaryKind) -> Self {
        Self {
            id,
            kind,
            buildable: true,
            dependencies: Vec::new(),
        }
    }

    pub fn with_buildable(mut self, buildable: bool) -> Self {
        self.buildable = buildable;
        self
    }

    pub fn with_dependency(mut self, dependency: BinaryRef) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn to_ref(&self) -> BinaryRef {
        BinaryRef::new(self.id.clone(), self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSpec {
    pub name: String,
    pub binaries: Vec<BinarySpec>,
}

impl ComponentSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            binaries: Vec::new(),
        }
    }

    pub fn with_binary(mut self, binary: BinarySpec) -> Self {
        self.binaries.push(binary);
        self
    }
}

/// Handle to one module of the build, ordered by canonical path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleHandle {
    path: String,
}

impl ModuleHandle {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            path: if path.is_empty() {
                ROOT_MODULE_PATH.to_string()
            } else {
                path
            },
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl fmt::Display for ModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Read-only view of the build model consumed by the registry builder.
pub trait ProjectModelProvider {
    /// Modules of the build. Must be stable across calls for one build state.
    fn enumerate_modules(&self) -> Vec<ModuleHandle>;

    /// Components realized by `module`, in model order.
    fn realized_components(&self, module: &ModuleHandle) -> Result<Vec<ComponentSpec>>;
}

impl<P: ProjectModelProvider + ?Sized> ProjectModelProvider for &P {
    fn enumerate_modules(&self) -> Vec<ModuleHandle> {
        (**self).enumerate_modules()
    }

    fn realized_components(&self, module: &ModuleHandle) -> Result<Vec<ComponentSpec>> {
        (**self).realized_components(module)
    }
}

/// Build model held in memory, in the order modules were added.
#[derive(Debug, Clone, Default)]
pub struct ProjectModel {
    modules: Vec<(ModuleHandle, Vec<ComponentSpec>)>,
}

impl ProjectModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an empty module. Adding an existing path is a no-op.
    pub fn add_module(&mut self, path: impl Into<String>) -> &mut Self {
        let handle = ModuleHandle::new(path);
        if !self.modules.iter().any(|(existing, _)| *existing == handle) {
            self.modules.push((handle, Vec::new()));
        }
        self
    }

    pub fn add_component(
        &mut self,
        module_path: impl Into<String>,
        component: ComponentSpec,
    ) -> &mut Self {
        let handle = ModuleHandle::new(module_path);
        match self.modules.iter_mut().find(|(existing, _)| *existing == handle) {
            Some((_, components)) => components.push(component),
            None => self.modules.push((handle, vec![component])),
        }
        self
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

impl ProjectModelProvider for ProjectModel {
    fn enumerate_modules(&self) -> Vec<ModuleHandle> {
        self.modules.iter().map(|(handle, _)| handle.clone()).collect()
    }

    fn realized_components(&self, module: &ModuleHandle) -> Result<Vec<ComponentSpec>> {
        self.modules
            .iter()
            .find(|(handle, _)| handle == module)
            .map(|(_, components)| components.clone())
            .ok_or_else(|| anyhow::anyhow!("Unknown module: {}", module))
    }
}
