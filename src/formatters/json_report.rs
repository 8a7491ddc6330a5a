use anyhow::Result;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

use super::TargetReport;
use crate::core::Resolution;

/// JSON rendering of dependents reports for programmatic consumers
pub struct JsonReportFormatter {
    pretty: bool,
}

impl JsonReportFormatter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn format_to_file(&self, reports: &[TargetReport], output_path: &Path) -> Result<()> {
        fs::write(output_path, self.format_reports(reports)?)?;
        Ok(())
    }

    pub fn format_reports(&self, reports: &[TargetReport]) -> Result<String> {
        let value = self.to_value(reports)?;
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(rendered)
    }

    pub fn to_value(&self, reports: &[TargetReport]) -> Result<Value> {
        let mut targets = Vec::with_capacity(reports.len());

        for report in reports {
            let target = match &report.resolution {
                Resolution::NotApplicable => json!({
                    "id": report.id,
                    "applicable": false,
                    "dependents": Value::Null
                }),
                Resolution::Resolved(nodes) => json!({
                    "id": report.id,
                    "applicable": true,
                    "dependents": serde_json::to_value(nodes)?
                }),
            };
            targets.push(target);
        }

        Ok(json!({ "targets": targets }))
    }
}

impl Default for JsonReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}
