//! Schedule Index: calendar marking metadata and day filtering.
//!
//! Recomputed in full whenever the schedule list or the selection changes;
//! the lists involved are small enough that incremental updates would buy
//! nothing.

use crate::records::Schedule;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Calendar-widget metadata for one date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayMarking {
    pub marked: bool,
    pub selected: bool,
}

/// Maps every date with at least one schedule entry to `marked = true`.
/// The selected date is flagged even when it has no entries, in which case
/// it still appears with `marked = false`.
pub fn build_date_index(
    schedules: &[Schedule],
    selected: Option<NaiveDate>,
) -> BTreeMap<NaiveDate, DayMarking> {
    let mut index: BTreeMap<NaiveDate, DayMarking> = BTreeMap::new();
    for schedule in schedules {
        index.entry(schedule.date).or_default().marked = true;
    }
    if let Some(day) = selected {
        index.entry(day).or_default().selected = true;
    }
    index
}

/// Entries on one date, original relative order preserved.
pub fn schedules_on(schedules: &[Schedule], date: NaiveDate) -> Vec<&Schedule> {
    schedules.iter().filter(|s| s.date == date).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::UserId;

    fn owner() -> UserId {
        UserId::from_string("user-1".to_string()).unwrap()
    }

    fn entry(subject: &str, date: NaiveDate) -> Schedule {
        Schedule::new(subject.to_string(), "09:00".to_string(), date, owner()).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, d).unwrap()
    }

    #[test]
    fn marks_exactly_the_distinct_dates_present() {
        let schedules = vec![entry("a", day(1)), entry("b", day(1)), entry("c", day(3))];
        let index = build_date_index(&schedules, None);
        assert_eq!(index.len(), 2);
        assert!(index[&day(1)].marked);
        assert!(index[&day(3)].marked);
        assert!(!index[&day(1)].selected);
    }

    #[test]
    fn selected_date_with_entries_gets_both_flags() {
        let schedules = vec![entry("a", day(5))];
        let index = build_date_index(&schedules, Some(day(5)));
        assert_eq!(
            index[&day(5)],
            DayMarking {
                marked: true,
                selected: true
            }
        );
    }

    #[test]
    fn selected_date_without_entries_still_appears() {
        let schedules = vec![entry("a", day(5))];
        let index = build_date_index(&schedules, Some(day(9)));
        assert_eq!(
            index[&day(9)],
            DayMarking {
                marked: false,
                selected: true
            }
        );
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn empty_list_yields_empty_index() {
        assert!(build_date_index(&[], None).is_empty());
    }

    #[test]
    fn day_filter_preserves_order_and_excludes_other_dates() {
        let schedules = vec![
            entry("first", day(7)),
            entry("elsewhere", day(8)),
            entry("second", day(7)),
        ];
        let got = schedules_on(&schedules, day(7));
        let subjects: Vec<&str> = got.iter().map(|s| s.subject.as_str()).collect();
        assert_eq!(subjects, vec!["first", "second"]);
        assert!(schedules_on(&schedules, day(20)).is_empty());
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;
        use std::collections::BTreeSet;

        fn on_offset(offset: i64) -> Schedule {
            entry("x", day(1) + chrono::Duration::days(offset))
        }

        proptest! {
            #[test]
            fn marks_exactly_the_distinct_scheduled_dates(
                offsets in proptest::collection::vec(0i64..60, 0..25)
            ) {
                let schedules: Vec<Schedule> = offsets.iter().map(|&o| on_offset(o)).collect();
                let index = build_date_index(&schedules, None);

                let expected: BTreeSet<NaiveDate> =
                    schedules.iter().map(|s| s.date).collect();
                let marked: BTreeSet<NaiveDate> = index
                    .iter()
                    .filter(|(_, m)| m.marked)
                    .map(|(d, _)| *d)
                    .collect();
                prop_assert_eq!(&marked, &expected);
                // Without a selection, nothing else appears.
                prop_assert_eq!(index.len(), expected.len());
                prop_assert!(index.values().all(|m| !m.selected));
            }

            #[test]
            fn selected_day_always_appears_and_only_it_is_selected(
                offsets in proptest::collection::vec(0i64..60, 0..25),
                selected_offset in 0i64..60
            ) {
                let schedules: Vec<Schedule> = offsets.iter().map(|&o| on_offset(o)).collect();
                let selected = day(1) + chrono::Duration::days(selected_offset);
                let index = build_date_index(&schedules, Some(selected));

                prop_assert!(index[&selected].selected);
                prop_assert_eq!(
                    index[&selected].marked,
                    schedules.iter().any(|s| s.date == selected)
                );
                prop_assert!(index
                    .iter()
                    .all(|(d, m)| !m.selected || *d == selected));
            }
        }
    }
}
