//! Turn a reviewed suggestion into the finalized import structure.
//!
//! The build is pure and deterministic: `BTreeMap` lookups, sequential
//! IDs, no clock reads beyond the optional fallback-year default. The same
//! inputs always serialize to byte-identical output.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Utc};
use tracing::debug;
use wheel_map::{EntityOverride, RemapTable, SlotOrigin};
use wheel_model::{
    ActivityGroup, GeneratedStructure, MappingSuggestion, RingKind, WheelItem, WheelLabel,
    WheelRing,
};

use crate::pages::partition_pages;
use crate::palette;

/// Which entity list an unresolved reference pointed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Ring,
    Group,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ring => f.write_str("ring"),
            Self::Group => f.write_str("activity group"),
        }
    }
}

/// A name an activity referenced that no final entity answers to.
///
/// The item is kept in the structure with a `None` id for that reference;
/// recording it here lets the caller warn instead of silently dropping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub kind: ReferenceKind,
    pub item_name: String,
    pub referenced_name: String,
}

/// What the build changed or could not resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub unresolved: Vec<UnresolvedReference>,
    /// Items excluded from partitioning for unparseable start dates.
    pub excluded_items: Vec<String>,
    /// Activity references rerouted by the ring remap table.
    pub remapped_ring_refs: usize,
    /// Activity references rerouted by the group remap table.
    pub remapped_group_refs: usize,
}

impl BuildReport {
    /// True when every reference resolved and every item was placed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty() && self.excluded_items.is_empty()
    }
}

/// Knobs for the build.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    /// Year for the fallback page when no start date parses.
    /// Defaults to the current year.
    pub fallback_year: Option<i32>,
}

impl BuildOptions {
    fn effective_fallback_year(self) -> i32 {
        self.fallback_year
            .unwrap_or_else(|| Utc::now().date_naive().year())
    }
}

/// Build the finalized structure from the suggestion and the operator's
/// entity overrides.
///
/// Edited lists win over the raw suggestion; ring and group remap tables
/// are applied to every activity reference before resolution.
#[must_use]
pub fn build_structure(
    suggestion: &MappingSuggestion,
    ring_overrides: Option<&EntityOverride>,
    group_overrides: Option<&EntityOverride>,
    options: BuildOptions,
) -> (GeneratedStructure, BuildReport) {
    let ring_table = ring_overrides
        .map(RemapTable::from_override)
        .unwrap_or_default();
    let group_table = group_overrides
        .map(RemapTable::from_override)
        .unwrap_or_default();

    let rings = final_rings(suggestion, ring_overrides);
    let groups = final_groups(suggestion, group_overrides);
    let labels = final_labels(suggestion);

    let ring_ids: BTreeMap<&str, &str> = rings
        .iter()
        .map(|r| (r.name.as_str(), r.id.as_str()))
        .collect();
    let group_ids: BTreeMap<&str, &str> = groups
        .iter()
        .map(|g| (g.name.as_str(), g.id.as_str()))
        .collect();
    let label_ids: BTreeMap<&str, &str> = labels
        .iter()
        .map(|l| (l.name.as_str(), l.id.as_str()))
        .collect();

    let mut report = BuildReport::default();
    let mut items = Vec::with_capacity(suggestion.activities.len());
    for (idx, activity) in suggestion.activities.iter().enumerate() {
        let ring_name = ring_table.apply(&activity.ring);
        if ring_name != activity.ring {
            report.remapped_ring_refs += 1;
        }
        let group_name = group_table.apply(&activity.group);
        if group_name != activity.group {
            report.remapped_group_refs += 1;
        }

        let ring_id = ring_ids.get(ring_name.as_str()).map(|id| (*id).to_string());
        if ring_id.is_none() {
            report.unresolved.push(UnresolvedReference {
                kind: ReferenceKind::Ring,
                item_name: activity.name.clone(),
                referenced_name: ring_name,
            });
        }
        let group_id = group_ids
            .get(group_name.as_str())
            .map(|id| (*id).to_string());
        if group_id.is_none() {
            report.unresolved.push(UnresolvedReference {
                kind: ReferenceKind::Group,
                item_name: activity.name.clone(),
                referenced_name: group_name,
            });
        }

        // Unknown label names are dropped; labels are decorative and have
        // no fallback entity to reroute to.
        let resolved_labels: Vec<String> = activity
            .label_names
            .iter()
            .filter_map(|name| label_ids.get(name.as_str()).map(|id| (*id).to_string()))
            .collect();

        items.push(WheelItem {
            id: format!("item-{}", idx + 1),
            name: activity.name.clone(),
            start_date: activity.start_date.clone(),
            end_date: activity.end_date.clone(),
            ring_id,
            group_id,
            label_id: resolved_labels.first().cloned(),
            label_ids: resolved_labels,
            description: activity.description.clone(),
        });
    }

    let (pages, excluded) = partition_pages(items, options.effective_fallback_year());
    report.excluded_items = excluded;

    debug!(
        rings = rings.len(),
        groups = groups.len(),
        labels = labels.len(),
        pages = pages.len(),
        unresolved = report.unresolved.len(),
        "structure built"
    );

    (
        GeneratedStructure {
            rings,
            activity_groups: groups,
            labels,
            pages,
        },
        report,
    )
}

fn final_rings(
    suggestion: &MappingSuggestion,
    overrides: Option<&EntityOverride>,
) -> Vec<WheelRing> {
    match overrides {
        Some(ov) => ov
            .slots()
            .iter()
            .enumerate()
            .map(|(idx, slot)| {
                let (kind, color) = match &slot.origin {
                    SlotOrigin::Added => (RingKind::Outer, Some(palette::color_for(idx))),
                    _ => {
                        let source = slot
                            .original_name()
                            .and_then(|orig| suggestion.rings.iter().find(|r| r.name == orig));
                        (
                            source.map_or(RingKind::Outer, |r| r.kind),
                            source.and_then(|r| r.color.clone()),
                        )
                    }
                };
                WheelRing {
                    id: format!("ring-{}", idx + 1),
                    name: slot.current_name.clone(),
                    kind,
                    color,
                    visible: true,
                }
            })
            .collect(),
        None => suggestion
            .rings
            .iter()
            .enumerate()
            .map(|(idx, r)| WheelRing {
                id: format!("ring-{}", idx + 1),
                name: r.name.clone(),
                kind: r.kind,
                color: r.color.clone(),
                visible: true,
            })
            .collect(),
    }
}

fn final_groups(
    suggestion: &MappingSuggestion,
    overrides: Option<&EntityOverride>,
) -> Vec<ActivityGroup> {
    match overrides {
        Some(ov) => ov
            .slots()
            .iter()
            .enumerate()
            .map(|(idx, slot)| {
                let color = match &slot.origin {
                    SlotOrigin::Added => palette::color_for(idx),
                    _ => slot
                        .original_name()
                        .and_then(|orig| {
                            suggestion.activity_groups.iter().find(|g| g.name == orig)
                        })
                        .map_or_else(|| palette::color_for(idx), |g| g.color.clone()),
                };
                ActivityGroup {
                    id: format!("group-{}", idx + 1),
                    name: slot.current_name.clone(),
                    color,
                    visible: true,
                }
            })
            .collect(),
        None => suggestion
            .activity_groups
            .iter()
            .enumerate()
            .map(|(idx, g)| ActivityGroup {
                id: format!("group-{}", idx + 1),
                name: g.name.clone(),
                color: g.color.clone(),
                visible: true,
            })
            .collect(),
    }
}

fn final_labels(suggestion: &MappingSuggestion) -> Vec<WheelLabel> {
    suggestion
        .labels
        .iter()
        .enumerate()
        .map(|(idx, l)| WheelLabel {
            id: format!("label-{}", idx + 1),
            name: l.name.clone(),
            color: l
                .color
                .clone()
                .unwrap_or_else(|| palette::color_for(idx)),
            visible: true,
        })
        .collect()
}
