pub mod json_report;
pub mod text_tree;

pub use json_report::JsonReportFormatter;
pub use text_tree::TextTreeFormatter;

use crate::core::{ArtifactIdentity, Resolution};

/// Outcome of one dependents query, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetReport {
    pub id: ArtifactIdentity,
    pub resolution: Resolution,
}

impl TargetReport {
    pub fn new(id: ArtifactIdentity, resolution: Resolution) -> Self {
        Self { id, resolution }
    }
}
