use anyhow::Result;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

use super::identity::{ArtifactIdentity, ArtifactKey};
use super::index::DependencyIndex;
use super::registry::{BinaryRegistry, NativeBinary, RegistryBuilder};
use crate::model::{BinaryRef, ProjectModelProvider};

/// One dependent in a resolved tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDependentNode {
    pub id: ArtifactIdentity,
    pub buildable: bool,
    /// Always false: test-suite binaries are not modelled
    pub test_suite: bool,
    /// Back-reference to a binary already on the path from the target.
    /// Such a node has no children.
    pub circular: bool,
    #[serde(rename = "dependents")]
    pub children: Vec<ResolvedDependentNode>,
}

impl ResolvedDependentNode {
    fn from_binary(
        binary: &NativeBinary,
        circular: bool,
        children: Vec<ResolvedDependentNode>,
    ) -> Self {
        Self {
            id: binary.id.clone(),
            buildable: binary.buildable,
            test_suite: false,
            circular,
            children,
        }
    }

    /// Number of nodes in this subtree, including itself
    pub fn size(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.iter());
        }
        count
    }
}

// Chains can be thousands of binaries deep; unlink children before they drop.
impl Drop for ResolvedDependentNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// One binary whose dependents are being collected.
struct Frame<'a> {
    key: &'a ArtifactKey,
    /// None for the query target itself
    binary: Option<&'a NativeBinary>,
    pending: std::vec::IntoIter<&'a ArtifactKey>,
    children: Vec<ResolvedDependentNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The target is not a native binary; another strategy has to answer.
    NotApplicable,
    /// Direct dependents of the target, each carrying its own dependents.
    Resolved(Vec<ResolvedDependentNode>),
}

impl Resolution {
    pub fn is_applicable(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    pub fn dependents(&self) -> Option<&[ResolvedDependentNode]> {
        match self {
            Resolution::Resolved(nodes) => Some(nodes),
            Resolution::NotApplicable => None,
        }
    }
}

/// Registry and dependency index for one build state. Build it once to answer
/// many queries against an unchanged model.
#[derive(Debug, Clone)]
pub struct BuildState {
    registry: BinaryRegistry,
    index: DependencyIndex,
}

impl BuildState {
    pub fn build<P: ProjectModelProvider>(provider: &P) -> Result<Self> {
        let registry = RegistryBuilder::new().build(provider)?;
        Ok(Self::from_registry(registry))
    }

    pub fn from_registry(registry: BinaryRegistry) -> Self {
        let index = DependencyIndex::build(&registry);
        info!(
            "Indexed {} binaries with {} dependency edges",
            index.len(),
            index.edge_count()
        );
        Self { registry, index }
    }

    pub fn registry(&self) -> &BinaryRegistry {
        &self.registry
    }

    pub fn index(&self) -> &DependencyIndex {
        &self.index
    }

    /// Transitive dependents of `target`.
    ///
    /// `include_test_suites` is accepted for callers that ask for test suites,
    /// but test-suite binaries cannot be identified through the model
    /// boundary, so the result is the same either way.
    pub fn resolve(&self, target: &BinaryRef, include_test_suites: bool) -> Resolution {
        if !target.kind.is_native() {
            return Resolution::NotApplicable;
        }
        Resolution::Resolved(self.resolve_tree(&target.id, include_test_suites))
    }

    /// Like [`Self::resolve`] for a bare identity. Identities that are not
    /// registered native binaries are not applicable.
    pub fn resolve_identity(
        &self,
        target: &ArtifactIdentity,
        include_test_suites: bool,
    ) -> Resolution {
        if !self.registry.contains(&target.key()) {
            return Resolution::NotApplicable;
        }
        Resolution::Resolved(self.resolve_tree(target, include_test_suites))
    }

    fn resolve_tree(
        &self,
        target: &ArtifactIdentity,
        include_test_suites: bool,
    ) -> Vec<ResolvedDependentNode> {
        if include_test_suites {
            debug!(
                "Test-suite binaries are not modelled; resolving {} without them",
                target
            );
        }

        let key = target.key();
        let mut path = HashSet::new();
        path.insert(key.clone());
        self.dependents_tree(&key, &mut path)
    }

    // `path` holds the keys of every open frame, the target included.
    fn dependents_tree(
        &self,
        key: &ArtifactKey,
        path: &mut HashSet<ArtifactKey>,
    ) -> Vec<ResolvedDependentNode> {
        let mut stack = vec![Frame {
            key,
            binary: None,
            pending: self.index.direct_dependents(key).into_iter(),
            children: Vec::new(),
        }];

        while let Some(frame) = stack.last_mut() {
            if let Some(dependent_key) = frame.pending.next() {
                let Some(dependent) = self.registry.get(dependent_key) else {
                    continue;
                };

                if path.contains(dependent_key) {
                    debug!("Cycle: {} depends back on {}", dependent_key, frame.key);
                    frame
                        .children
                        .push(ResolvedDependentNode::from_binary(dependent, true, Vec::new()));
                    continue;
                }

                path.insert(dependent_key.clone());
                stack.push(Frame {
                    key: dependent_key,
                    binary: Some(dependent),
                    pending: self.index.direct_dependents(dependent_key).into_iter(),
                    children: Vec::new(),
                });
                continue;
            }

            let Some(mut finished) = stack.pop() else {
                break;
            };
            let children = std::mem::take(&mut finished.children);
            match (finished.binary, stack.last_mut()) {
                (Some(binary), Some(parent)) => {
                    path.remove(finished.key);
                    parent
                        .children
                        .push(ResolvedDependentNode::from_binary(binary, false, children));
                }
                _ => return children,
            }
        }

        Vec::new()
    }
}

/// Answers dependents queries straight from a build model, rebuilding the
/// registry and index for every query.
pub struct DependentsResolver<P> {
    provider: P,
}

impl<P: ProjectModelProvider> DependentsResolver<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Transitive dependents of `target`, read from a freshly built state.
    ///
    /// `include_test_suites` has no effect: test-suite binaries cannot be
    /// identified through the model boundary.
    pub fn resolve_dependents(
        &self,
        target: &BinaryRef,
        include_test_suites: bool,
    ) -> Result<Resolution> {
        if !target.kind.is_native() {
            return Ok(Resolution::NotApplicable);
        }
        let state = BuildState::build(&self.provider)?;
        Ok(state.resolve(target, include_test_suites))
    }

    /// Like [`Self::resolve_dependents`] for a bare identity; identities that
    /// are not registered native binaries are not applicable.
    ///
    /// `include_test_suites` has no effect: test-suite binaries cannot be
    /// identified through the model boundary.
    pub fn resolve_dependents_of(
        &self,
        target: &ArtifactIdentity,
        include_test_suites: bool,
    ) -> Result<Resolution> {
        let state = BuildState::build(&self.provider)?;
        Ok(state.resolve_identity(target, include_test_suites))
    }

    /// Build the state once for a batch of queries.
    pub fn build_state(&self) -> Result<BuildState> {
        BuildState::build(&self.provider)
    }
}
