//! End-to-end builder scenarios: overrides, remap routing, reference
//! resolution and determinism.

use wheel_map::{EntityKind, EntityOverride};
use wheel_model::{
    ActivitySuggestion, ColumnMapping, GroupSuggestion, LabelSuggestion, MappingSuggestion,
    RingKind, RingSuggestion,
};
use wheel_transform::{BuildOptions, ReferenceKind, build_structure};

fn activity(name: &str, start: &str, ring: &str, group: &str, labels: &[&str]) -> ActivitySuggestion {
    ActivitySuggestion {
        name: name.to_string(),
        start_date: start.to_string(),
        end_date: start.to_string(),
        ring: ring.to_string(),
        group: group.to_string(),
        label_names: labels.iter().map(|l| (*l).to_string()).collect(),
        description: None,
    }
}

fn suggestion() -> MappingSuggestion {
    MappingSuggestion {
        column_mapping: ColumnMapping::default(),
        rings: vec![
            RingSuggestion {
                name: "Marketing".to_string(),
                kind: RingKind::Outer,
                color: Some("#FF0000".to_string()),
            },
            RingSuggestion {
                name: "Operations".to_string(),
                kind: RingKind::Inner,
                color: None,
            },
        ],
        activity_groups: vec![
            GroupSuggestion {
                name: "Campaigns".to_string(),
                color: "#111111".to_string(),
            },
            GroupSuggestion {
                name: "Events".to_string(),
                color: "#222222".to_string(),
            },
            GroupSuggestion {
                name: "Misc".to_string(),
                color: "#333333".to_string(),
            },
        ],
        labels: vec![LabelSuggestion {
            name: "Priority".to_string(),
            color: None,
        }],
        activities: vec![
            activity("Spring launch", "2025-03-01", "Marketing", "Misc", &["Priority"]),
            activity("Ops review", "2026-05-01", "Operations", "Events", &[]),
            activity("Autumn fair", "2027-09-01", "Marketing", "Campaigns", &[]),
        ],
        suggested_wheel_title: None,
        suitability_warning: None,
    }
}

#[test]
fn rename_and_delete_route_references_to_survivors() {
    let sg = suggestion();

    let mut rings = EntityOverride::begin(EntityKind::Ring, &sg.ring_names());
    rings.rename(rings.slots()[0].id, "Campaigns").expect("rename");

    let mut groups = EntityOverride::begin(EntityKind::Group, &sg.group_names());
    let misc = groups.slots()[2].id;
    groups.remove(misc).expect("remove");

    let (structure, report) =
        build_structure(&sg, Some(&rings), Some(&groups), BuildOptions::default());

    // The renamed ring keeps its suggested color and kind under the new name.
    assert_eq!(structure.rings[0].name, "Campaigns");
    assert_eq!(structure.rings[0].kind, RingKind::Outer);
    assert_eq!(structure.rings[0].color.as_deref(), Some("#FF0000"));

    // Items that referenced "Marketing" now resolve to the renamed ring.
    let spring = &structure.pages[0].items[0];
    assert_eq!(spring.name, "Spring launch");
    assert_eq!(spring.ring_id.as_deref(), Some(structure.rings[0].id.as_str()));

    // The deleted "Misc" reference lands on the first surviving group.
    assert_eq!(
        spring.group_id.as_deref(),
        Some(structure.activity_groups[0].id.as_str())
    );

    assert!(report.unresolved.is_empty());
    assert_eq!(report.remapped_ring_refs, 2);
    assert_eq!(report.remapped_group_refs, 1);
}

#[test]
fn years_partition_into_ascending_pages() {
    let sg = suggestion();
    let (structure, report) = build_structure(&sg, None, None, BuildOptions::default());

    assert_eq!(
        structure.pages.iter().map(|p| p.year).collect::<Vec<_>>(),
        vec![2025, 2026, 2027]
    );
    assert_eq!(structure.item_count(), 3);
    assert!(report.is_clean());
}

#[test]
fn all_invalid_dates_fall_back_to_a_single_page() {
    let mut sg = suggestion();
    for a in &mut sg.activities {
        a.start_date = "sometime".to_string();
    }
    let options = BuildOptions {
        fallback_year: Some(2026),
    };
    let (structure, report) = build_structure(&sg, None, None, options);

    assert_eq!(structure.pages.len(), 1);
    assert_eq!(structure.pages[0].year, 2026);
    assert_eq!(structure.pages[0].items.len(), 3);
    assert!(report.excluded_items.is_empty());
}

#[test]
fn unresolved_references_are_reported_not_dropped() {
    let mut sg = suggestion();
    sg.activities
        .push(activity("Mystery", "2025-07-01", "Nowhere", "Campaigns", &[]));

    let (structure, report) = build_structure(&sg, None, None, BuildOptions::default());

    let mystery = structure.pages[0]
        .items
        .iter()
        .find(|i| i.name == "Mystery")
        .expect("kept");
    assert_eq!(mystery.ring_id, None);
    assert!(mystery.group_id.is_some());

    assert_eq!(report.unresolved.len(), 1);
    assert_eq!(report.unresolved[0].kind, ReferenceKind::Ring);
    assert_eq!(report.unresolved[0].referenced_name, "Nowhere");
}

#[test]
fn labels_resolve_to_id_list_and_legacy_field() {
    let sg = suggestion();
    let (structure, _) = build_structure(&sg, None, None, BuildOptions::default());

    let spring = &structure.pages[0].items[0];
    assert_eq!(spring.label_ids, vec!["label-1".to_string()]);
    assert_eq!(spring.label_id.as_deref(), Some("label-1"));
}

#[test]
fn repeat_builds_serialize_byte_identically() {
    let sg = suggestion();
    let mut groups = EntityOverride::begin(EntityKind::Group, &sg.group_names());
    groups.rename(groups.slots()[1].id, "Fairs").expect("rename");

    let options = BuildOptions {
        fallback_year: Some(2025),
    };
    let (first, _) = build_structure(&sg, None, Some(&groups), options);
    let (second, _) = build_structure(&sg, None, Some(&groups), options);

    let a = serde_json::to_vec(&first).expect("serialize");
    let b = serde_json::to_vec(&second).expect("serialize");
    assert_eq!(a, b);
}
