use dependents::core::{ArtifactIdentity, Resolution, ResolvedDependentNode};
use dependents::formatters::{JsonReportFormatter, TargetReport};
use serde_json::{json, Value};

#[test]
fn json_report_structure() {
    let app = ResolvedDependentNode {
        id: ArtifactIdentity::new(":app", "main", "debug"),
        buildable: false,
        test_suite: false,
        circular: false,
        children: vec![],
    };
    let reports = vec![
        TargetReport::new(
            ArtifactIdentity::new(":lib", "util", "debug"),
            Resolution::Resolved(vec![app]),
        ),
        TargetReport::new(
            ArtifactIdentity::new(":lib", "util", "jar"),
            Resolution::NotApplicable,
        ),
    ];

    let tmp = tempfile::NamedTempFile::new().unwrap();
    let path = tmp.path().with_extension("json");
    JsonReportFormatter::new()
        .format_to_file(&reports, &path)
        .unwrap();
    let s = std::fs::read_to_string(&path).unwrap();
    let v: Value = serde_json::from_str(&s).unwrap();

    let expected = json!({
        "targets": [
            {
                "id": ":lib:util:debug",
                "applicable": true,
                "dependents": [
                    {
                        "id": ":app:main:debug",
                        "buildable": false,
                        "testSuite": false,
                        "circular": false,
                        "dependents": []
                    }
                ]
            },
            {
                "id": ":lib:util:jar",
                "applicable": false,
                "dependents": null
            }
        ]
    });
    assert_eq!(v, expected);
}

#[test]
fn pretty_output_spans_lines() {
    let reports = vec![TargetReport::new(
        ArtifactIdentity::new("", "tool", "debug"),
        Resolution::Resolved(vec![]),
    )];

    let compact = JsonReportFormatter::new().format_reports(&reports).unwrap();
    let pretty = JsonReportFormatter::new()
        .with_pretty(true)
        .format_reports(&reports)
        .unwrap();

    assert!(!compact.contains('\n'));
    assert!(pretty.contains('\n'));
    let a: Value = serde_json::from_str(&compact).unwrap();
    let b: Value = serde_json::from_str(&pretty).unwrap();
    assert_eq!(a, b);
    assert_eq!(a["targets"][0]["id"], "::tool:debug");
}
