use anyhow::Result;
use std::fs;
use std::path::Path;

use super::TargetReport;
use crate::core::{Resolution, ResolvedDependentNode};

const BRANCH: &str = "+--- ";
const LAST_BRANCH: &str = "\\--- ";
const CONTINUATION: &str = "|    ";
const GAP: &str = "     ";

/// Renders dependents as ASCII trees, one block per target
pub struct TextTreeFormatter {
    /// Mark nodes whose build is expected to fail
    show_buildability: bool,
}

impl TextTreeFormatter {
    pub fn new() -> Self {
        Self {
            show_buildability: true,
        }
    }

    pub fn with_buildability(mut self, show: bool) -> Self {
        self.show_buildability = show;
        self
    }

    pub fn format_to_file(&self, reports: &[TargetReport], output_path: &Path) -> Result<()> {
        fs::write(output_path, self.format_reports(reports))?;
        Ok(())
    }

    pub fn format_reports(&self, reports: &[TargetReport]) -> String {
        let mut output = String::new();
        let mut saw_circular = false;

        for (i, report) in reports.iter().enumerate() {
            if i > 0 {
                output.push('\n');
            }
            output.push_str(report.id.key().as_str());
            output.push('\n');

            match &report.resolution {
                Resolution::NotApplicable => output.push_str("Not applicable.\n"),
                Resolution::Resolved(nodes) if nodes.is_empty() => {
                    output.push_str("No dependents.\n")
                }
                Resolution::Resolved(nodes) => {
                    self.render_nodes(nodes, &mut output, &mut saw_circular)
                }
            }
        }

        if saw_circular {
            output.push_str("\n(*) - depends back on a binary above it; not expanded\n");
        }

        output
    }

    fn render_nodes(
        &self,
        nodes: &[ResolvedDependentNode],
        output: &mut String,
        saw_circular: &mut bool,
    ) {
        // (node, prefix of its line, last among its siblings); popped in display order
        let mut stack: Vec<(&ResolvedDependentNode, String, bool)> = nodes
            .iter()
            .enumerate()
            .rev()
            .map(|(i, node)| (node, String::new(), i + 1 == nodes.len()))
            .collect();

        while let Some((node, prefix, last)) = stack.pop() {
            output.push_str(&prefix);
            output.push_str(if last { LAST_BRANCH } else { BRANCH });
            output.push_str(node.id.key().as_str());
            if self.show_buildability && !node.buildable {
                output.push_str(" NOT BUILDABLE");
            }
            if node.circular {
                output.push_str(" (*)");
                *saw_circular = true;
            }
            output.push('\n');

            if !node.children.is_empty() {
                let child_prefix = format!("{}{}", prefix, if last { GAP } else { CONTINUATION });
                let count = node.children.len();
                for (i, child) in node.children.iter().enumerate().rev() {
                    stack.push((child, child_prefix.clone(), i + 1 == count));
                }
            }
        }
    }
}

impl Default for TextTreeFormatter {
    fn default() -> Self {
        Self::new()
    }
}
