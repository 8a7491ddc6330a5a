//! File-backed build model.
//!
//! A snapshot is either one JSON document listing every module, or a directory
//! tree where each `*.json` file describes a single module.

use anyhow::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::{BinaryKind, BinaryRef, BinarySpec, ComponentSpec, ModuleHandle, ProjectModel};
use crate::core::identity::ArtifactIdentity;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("failed to parse snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("module '{0}' is described more than once")]
    DuplicateModule(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildSnapshot {
    #[serde(default)]
    pub modules: Vec<ModuleDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDocument {
    pub path: String,
    #[serde(default)]
    pub components: Vec<ComponentDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentDocument {
    pub name: String,
    #[serde(default)]
    pub binaries: Vec<BinaryDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryDocument {
    pub variant: String,
    pub kind: BinaryKind,
    #[serde(default = "default_buildable")]
    pub buildable: bool,
    #[serde(default)]
    pub dependencies: Vec<DependencyDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyDocument {
    #[serde(default)]
    pub module: String,
    pub component: String,
    pub variant: String,
    pub kind: BinaryKind,
}

fn default_buildable() -> bool {
    true
}

impl BuildSnapshot {
    /// Load a snapshot file, or every `*.json` module document under a directory.
    pub fn load(path: &Path) -> Result<Self> {
        if path.is_dir() {
            Self::load_directory(path)
        } else {
            let data = fs::read_to_string(path)?;
            let snapshot = serde_json::from_str(&data).map_err(|source| SnapshotError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(snapshot)
        }
    }

    fn load_directory(root: &Path) -> Result<Self> {
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!("Skipping unreadable snapshot entry: {}", err);
                    None
                }
            })
            .filter(|entry| entry.path().is_file())
            .filter(|entry| entry.path().extension().and_then(|ext| ext.to_str()) == Some("json"))
            .map(|entry| entry.into_path())
            .collect();
        files.sort();

        // Parse module documents in parallel; collect keeps file order
        let modules = files
            .par_iter()
            .map(|file| -> Result<ModuleDocument> {
                let data = fs::read_to_string(file)?;
                let module =
                    serde_json::from_str(&data).map_err(|source| SnapshotError::Parse {
                        path: file.clone(),
                        source,
                    })?;
                Ok(module)
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Loaded {} module documents from {}",
            modules.len(),
            root.display()
        );
        Ok(Self { modules })
    }

    pub fn from_json_str(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    /// Realize the snapshot as an in-memory build model.
    pub fn into_model(self) -> Result<ProjectModel> {
        let mut model = ProjectModel::new();
        let mut seen = HashSet::with_capacity(self.modules.len());

        for module in self.modules {
            let handle = ModuleHandle::new(module.path);
            if !seen.insert(handle.clone()) {
                return Err(SnapshotError::DuplicateModule(handle.path().to_string()).into());
            }

            model.add_module(handle.path());
            for component in module.components {
                let spec = component.into_spec(&handle);
                debug!(
                    "Module {} realizes component {} with {} binaries",
                    handle,
                    spec.name,
                    spec.binaries.len()
                );
                model.add_component(handle.path(), spec);
            }
        }

        Ok(model)
    }
}

impl ComponentDocument {
    fn into_spec(self, module: &ModuleHandle) -> ComponentSpec {
        let name = self.name;
        let binaries = self
            .binaries
            .into_iter()
            .map(|binary| {
                let id = ArtifactIdentity::new(module.path(), name.as_str(), binary.variant);
                let dependencies = binary
                    .dependencies
                    .into_iter()
                    .map(|dep| {
                        BinaryRef::new(
                            ArtifactIdentity::new(dep.module, dep.component, dep.variant),
                            dep.kind,
                        )
                    })
                    .collect();
                BinarySpec {
                    id,
                    kind: binary.kind,
                    buildable: binary.buildable,
                    dependencies,
                }
            })
            .collect();

        ComponentSpec { name, binaries }
    }
}
