//! Override document through the full review-and-build path.

use std::io::Write;

use wheel_cli::overrides_doc::OverrideDoc;
use wheel_map::ReviewState;
use wheel_model::{
    ActivitySuggestion, ColumnMapping, GroupSuggestion, MappingSuggestion, RingKind,
    RingSuggestion,
};
use wheel_transform::{BuildOptions, build_structure};

fn suggestion() -> MappingSuggestion {
    MappingSuggestion {
        column_mapping: ColumnMapping::default(),
        rings: vec![RingSuggestion {
            name: "Marketing".to_string(),
            kind: RingKind::Outer,
            color: None,
        }],
        activity_groups: vec![
            GroupSuggestion {
                name: "Campaigns".to_string(),
                color: "#111111".to_string(),
            },
            GroupSuggestion {
                name: "Misc".to_string(),
                color: "#222222".to_string(),
            },
        ],
        labels: vec![],
        activities: vec![ActivitySuggestion {
            name: "Spring launch".to_string(),
            start_date: "2026-03-01".to_string(),
            end_date: "2026-03-10".to_string(),
            ring: "Marketing".to_string(),
            group: "Misc".to_string(),
            label_names: vec![],
            description: None,
        }],
        suggested_wheel_title: None,
        suitability_warning: None,
    }
}

#[test]
fn document_from_file_drives_the_build() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"{{
            "rings": {{ "rename": {{ "Marketing": "Brand" }} }},
            "groups": {{ "remove": ["Misc"] }}
        }}"#
    )
    .expect("write doc");

    let text = std::fs::read_to_string(file.path()).expect("read doc");
    let doc: OverrideDoc = serde_json::from_str(&text).expect("parse doc");

    let mut review = ReviewState::new(suggestion());
    doc.apply(&mut review).expect("apply doc");

    let (structure, report) = build_structure(
        &review.suggestion,
        review.rings(),
        review.groups(),
        BuildOptions {
            fallback_year: Some(2026),
        },
    );

    assert_eq!(structure.rings[0].name, "Brand");
    assert_eq!(
        structure.activity_groups.iter().map(|g| g.name.as_str()).collect::<Vec<_>>(),
        vec!["Campaigns"]
    );

    // The activity that referenced the deleted group follows the survivor,
    // and the renamed ring keeps receiving its items.
    let item = &structure.pages[0].items[0];
    assert_eq!(item.ring_id.as_deref(), Some("ring-1"));
    assert_eq!(item.group_id.as_deref(), Some("group-1"));
    assert!(report.unresolved.is_empty());
}
