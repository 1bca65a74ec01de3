//! Task Aggregator: the home-screen view model.
//!
//! Everything here is a pure pass over an already-fetched task list. The
//! only impure input is "today", which callers either inject (tests) or
//! take from the local wall clock ([`summarize_today`]).

use crate::records::Task;
use chrono::{Datelike, Days, Local, NaiveDate};
use serde::Serialize;

/// Derived counts for display: totals, completion percentage and the
/// current streak of consecutive days with a completed task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    pub total: usize,
    pub completed: usize,
    pub completion_percentage: u8,
    pub streak: u32,
}

fn day_qualifies(tasks: &[Task], day: NaiveDate) -> bool {
    tasks
        .iter()
        .any(|task| task.completed && task.created_day() == Some(day))
}

/// Computes the summary for `today`.
///
/// The streak counts consecutive local calendar days, ending today, on
/// which at least one task was created and is completed. A day with no
/// qualifying task ends the walk; if today itself has none, the streak
/// is zero. Tasks without a readable creation timestamp are skipped.
///
/// The streak is anchored to a task's *creation* day, not the day it was
/// marked completed, so completing an old task extends the day it was
/// created on. Kept as observed behavior pending product clarification.
pub fn summarize(tasks: &[Task], today: NaiveDate) -> TaskSummary {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.completed).count();
    let completion_percentage = if total > 0 {
        ((completed as f64 / total as f64) * 100.0).round() as u8
    } else {
        0
    };

    let mut streak = 0u32;
    let mut day = today;
    while day_qualifies(tasks, day) {
        streak += 1;
        match day.checked_sub_days(Days::new(1)) {
            Some(prev) => day = prev,
            None => break,
        }
    }

    TaskSummary {
        total,
        completed,
        completion_percentage,
        streak,
    }
}

pub fn summarize_today(tasks: &[Task]) -> TaskSummary {
    summarize(tasks, Local::now().date_naive())
}

/// Tasks created per weekday, Monday-first, over the most recent occurrence
/// of each weekday. Today counts for its own weekday; weekdays later in the
/// current week resolve to last week's day.
pub fn tasks_per_weekday(tasks: &[Task], today: NaiveDate) -> [usize; 7] {
    let today_idx = today.weekday().num_days_from_monday() as i64;
    let mut counts = [0usize; 7];
    for (idx, slot) in counts.iter_mut().enumerate() {
        let mut diff = idx as i64 - today_idx;
        if diff > 0 {
            diff -= 7;
        }
        let target = today + chrono::Duration::days(diff);
        *slot = tasks
            .iter()
            .filter(|task| task.created_day() == Some(target))
            .count();
    }
    counts
}

/// Which completion states a task listing should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Open,
    Completed,
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: StatusFilter,
    pub search: Option<String>,
}

impl TaskFilter {
    /// Keeps matching tasks in their original relative order. The search
    /// term is a case-insensitive substring match on the title.
    pub fn apply(&self, mut tasks: Vec<Task>) -> Vec<Task> {
        tasks.retain(|task| match self.status {
            StatusFilter::All => true,
            StatusFilter::Open => !task.completed,
            StatusFilter::Completed => task.completed,
        });
        if let Some(term) = self.search.as_deref() {
            let needle = term.to_lowercase();
            tasks.retain(|task| task.title.to_lowercase().contains(&needle));
        }
        tasks
    }
}

/// Newest first, tasks without a creation instant last. The listing order
/// the home screen expects.
pub fn sort_newest_first(tasks: &mut [Task]) {
    tasks.sort_by_key(|task| std::cmp::Reverse(task.created_at.map(|ts| ts.millis()).unwrap_or(0)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::{RecordId, UserId};
    use crate::timestamp::Timestamp;
    use chrono::{Days, TimeZone};

    fn owner() -> UserId {
        UserId::from_string("user-1".to_string()).unwrap()
    }

    fn noon(day: NaiveDate) -> Timestamp {
        let local = Local
            .from_local_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
            .earliest()
            .unwrap();
        Timestamp::from(local.with_timezone(&chrono::Utc))
    }

    fn task_on(day: NaiveDate, completed: bool) -> Task {
        Task {
            id: RecordId::new(),
            title: "t".to_string(),
            completed,
            owner: owner(),
            created_at: Some(noon(day)),
        }
    }

    fn dateless_task(completed: bool) -> Task {
        Task {
            id: RecordId::new(),
            title: "t".to_string(),
            completed,
            owner: owner(),
            created_at: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 28).unwrap()
    }

    #[test]
    fn empty_list_is_zero_state() {
        let summary = summarize(&[], today());
        assert_eq!(
            summary,
            TaskSummary {
                total: 0,
                completed: 0,
                completion_percentage: 0,
                streak: 0
            }
        );
    }

    #[test]
    fn percentage_rounds_and_never_divides_by_zero() {
        let tasks = vec![
            task_on(today(), true),
            task_on(today(), false),
            task_on(today(), false),
        ];
        let summary = summarize(&tasks, today());
        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.completion_percentage, 33);
    }

    #[test]
    fn no_completed_task_today_means_no_streak() {
        let yesterday = today().checked_sub_days(Days::new(1)).unwrap();
        let tasks = vec![task_on(today(), false), task_on(yesterday, true)];
        assert_eq!(summarize(&tasks, today()).streak, 0);
    }

    #[test]
    fn streak_counts_back_until_first_gap() {
        let d = |n: u64| today().checked_sub_days(Days::new(n)).unwrap();
        // Completed on today, -1, -2 but not -3.
        let tasks = vec![
            task_on(d(0), true),
            task_on(d(1), true),
            task_on(d(2), true),
            task_on(d(4), true),
        ];
        assert_eq!(summarize(&tasks, today()).streak, 3);
    }

    #[test]
    fn incomplete_tasks_do_not_extend_a_streak() {
        let d = |n: u64| today().checked_sub_days(Days::new(n)).unwrap();
        let tasks = vec![task_on(d(0), true), task_on(d(1), false), task_on(d(2), true)];
        assert_eq!(summarize(&tasks, today()).streak, 1);
    }

    #[test]
    fn tasks_without_timestamps_count_in_totals_but_not_streak() {
        let tasks = vec![dateless_task(true), dateless_task(false)];
        let summary = summarize(&tasks, today());
        assert_eq!(summary.total, 2);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.streak, 0);
    }

    #[test]
    fn summarize_is_idempotent() {
        let tasks = vec![task_on(today(), true), task_on(today(), false)];
        assert_eq!(summarize(&tasks, today()), summarize(&tasks, today()));
    }

    #[test]
    fn weekday_counts_pick_most_recent_occurrence() {
        // 2026-08-28 is a Friday (index 4, Monday-first).
        let friday = today();
        let monday = friday.checked_sub_days(Days::new(4)).unwrap();
        let last_saturday = friday.checked_sub_days(Days::new(6)).unwrap();
        let tasks = vec![
            task_on(friday, false),
            task_on(friday, true),
            task_on(monday, false),
            task_on(last_saturday, true),
        ];
        let counts = tasks_per_weekday(&tasks, friday);
        assert_eq!(counts[4], 2); // Friday (today)
        assert_eq!(counts[0], 1); // this Monday
        assert_eq!(counts[5], 1); // Saturday resolves to last week
        assert_eq!(counts[6], 0);
    }

    #[test]
    fn filter_preserves_order_and_matches_case_insensitively() {
        let mut walk = task_on(today(), false);
        walk.title = "Walk the dog".to_string();
        let mut milk = task_on(today(), true);
        milk.title = "Buy milk".to_string();
        let mut mail = task_on(today(), false);
        mail.title = "Answer mail".to_string();
        let tasks = vec![walk.clone(), milk.clone(), mail.clone()];

        let open = TaskFilter {
            status: StatusFilter::Open,
            search: None,
        };
        let got = open.apply(tasks.clone());
        assert_eq!(got, vec![walk.clone(), mail.clone()]);

        let search = TaskFilter {
            status: StatusFilter::All,
            search: Some("MIL".to_string()),
        };
        assert_eq!(search.apply(tasks), vec![milk]);
    }

    #[test]
    fn sort_puts_newest_first_and_dateless_last() {
        let d = |n: u64| today().checked_sub_days(Days::new(n)).unwrap();
        let old = task_on(d(3), false);
        let new = task_on(d(0), false);
        let dateless = dateless_task(false);
        let mut tasks = vec![old.clone(), dateless.clone(), new.clone()];
        sort_newest_first(&mut tasks);
        assert_eq!(tasks, vec![new, old, dateless]);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        fn any_task() -> impl Strategy<Value = Task> {
            (any::<bool>(), proptest::option::of(0u64..60)).prop_map(|(completed, offset)| {
                match offset {
                    Some(n) => task_on(today().checked_sub_days(Days::new(n)).unwrap(), completed),
                    None => dateless_task(completed),
                }
            })
        }

        proptest! {
            #[test]
            fn percentage_stays_within_bounds(tasks in proptest::collection::vec(any_task(), 0..40)) {
                let summary = summarize(&tasks, today());
                prop_assert!(summary.completion_percentage <= 100);
                prop_assert!(summary.completed <= summary.total);
            }

            #[test]
            fn completing_one_more_task_never_lowers_percentage(
                tasks in proptest::collection::vec(any_task(), 1..40)
            ) {
                let before = summarize(&tasks, today());
                let mut bumped = tasks.clone();
                if let Some(open) = bumped.iter_mut().find(|t| !t.completed) {
                    open.completed = true;
                    let after = summarize(&bumped, today());
                    prop_assert!(after.completion_percentage >= before.completion_percentage);
                }
            }

            #[test]
            fn streak_equals_length_of_a_solid_chain(len in 0u64..20) {
                let mut tasks = Vec::new();
                for n in 0..len {
                    tasks.push(task_on(today().checked_sub_days(Days::new(n)).unwrap(), true));
                }
                // A gap right behind the chain must stop the walk.
                if len > 0 {
                    tasks.push(task_on(
                        today().checked_sub_days(Days::new(len + 1)).unwrap(),
                        true,
                    ));
                }
                prop_assert_eq!(summarize(&tasks, today()).streak as u64, len);
            }
        }
    }
}
