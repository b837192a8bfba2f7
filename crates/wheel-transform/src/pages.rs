//! Partition resolved items into per-year pages.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::debug;
use wheel_model::{WheelItem, YearPage};

/// Calendar year of an ISO `YYYY-MM-DD` date, if it parses.
#[must_use]
pub fn parse_year(date: &str) -> Option<i32> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}

/// Group items into one page per distinct start-date year, ascending.
///
/// Items whose start date does not parse are excluded and their names
/// returned alongside the pages. When *no* item has a parseable date the
/// exclusion would empty every page, so instead a single page for
/// `fallback_year` holds all items and nothing is excluded.
#[must_use]
pub fn partition_pages(items: Vec<WheelItem>, fallback_year: i32) -> (Vec<YearPage>, Vec<String>) {
    let mut by_year: BTreeMap<i32, Vec<WheelItem>> = BTreeMap::new();
    let mut undated: Vec<WheelItem> = Vec::new();

    for item in items {
        match parse_year(&item.start_date) {
            Some(year) => by_year.entry(year).or_default().push(item),
            None => undated.push(item),
        }
    }

    if by_year.is_empty() {
        if undated.is_empty() {
            return (Vec::new(), Vec::new());
        }
        debug!(
            year = fallback_year,
            items = undated.len(),
            "no parseable start dates, using fallback page"
        );
        let page = YearPage {
            id: "page-1".to_string(),
            year: fallback_year,
            page_order: 1,
            title: fallback_year.to_string(),
            items: undated,
        };
        return (vec![page], Vec::new());
    }

    let excluded = undated.into_iter().map(|i| i.name).collect();
    let pages = by_year
        .into_iter()
        .enumerate()
        .map(|(idx, (year, items))| YearPage {
            id: format!("page-{}", idx + 1),
            year,
            page_order: idx as u32 + 1,
            title: year.to_string(),
            items,
        })
        .collect();
    (pages, excluded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, start: &str) -> WheelItem {
        WheelItem {
            id: format!("item-{name}"),
            name: name.to_string(),
            start_date: start.to_string(),
            end_date: start.to_string(),
            ring_id: None,
            group_id: None,
            label_id: None,
            label_ids: vec![],
            description: None,
        }
    }

    #[test]
    fn pages_are_ascending_by_year() {
        let (pages, excluded) = partition_pages(
            vec![
                item("c", "2027-03-01"),
                item("a", "2025-01-01"),
                item("b", "2026-06-15"),
            ],
            2025,
        );
        assert!(excluded.is_empty());
        assert_eq!(
            pages.iter().map(|p| p.year).collect::<Vec<_>>(),
            vec![2025, 2026, 2027]
        );
        assert_eq!(
            pages.iter().map(|p| p.page_order).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn unparseable_dates_are_excluded_when_other_pages_exist() {
        let (pages, excluded) =
            partition_pages(vec![item("a", "2026-01-01"), item("b", "next spring")], 2026);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].items.len(), 1);
        assert_eq!(excluded, vec!["b".to_string()]);
    }

    #[test]
    fn all_invalid_dates_yield_one_fallback_page() {
        let (pages, excluded) =
            partition_pages(vec![item("a", "soon"), item("b", "whenever")], 2026);
        assert!(excluded.is_empty());
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].year, 2026);
        assert_eq!(pages[0].items.len(), 2);
    }

    #[test]
    fn no_items_no_pages() {
        let (pages, excluded) = partition_pages(vec![], 2026);
        assert!(pages.is_empty());
        assert!(excluded.is_empty());
    }
}
