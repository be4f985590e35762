use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;

use super::model::{
    Dashboard, Stats, TaskAction, TaskCard, TaskListView, TimelineBucket, TimelineEntry,
    TimelineView,
};
use crate::models::Task;
use crate::models::task::DUE_DATE_FORMAT;

/// Number of tasks shown in the recent list
pub const RECENT_LIMIT: usize = 3;

pub const EMPTY_ALL: &str = "No tasks yet. Add your first study task!";
pub const EMPTY_RECENT: &str = "No recent tasks";
pub const EMPTY_TIMELINE: &str = "No upcoming tasks. Add tasks to see them on the timeline!";
pub const INVALID_DATE: &str = "Invalid date";

/// Build every view from scratch. Pure: the input slice is not reordered.
pub fn build_dashboard(tasks: &[Task]) -> Dashboard {
    let sorted = sort_by_due(tasks);
    let (completed, pending): (Vec<&Task>, Vec<&Task>) =
        sorted.iter().copied().partition(|t| t.completed);

    let stats = compute_stats(sorted.len(), completed.len());

    let all_cards: Vec<TaskCard> = sorted.iter().map(|t| task_card(t)).collect();
    let recent_cards: Vec<TaskCard> = all_cards
        .iter()
        .rev()
        .take(RECENT_LIMIT)
        .cloned()
        .collect();

    debug!(
        total = stats.total,
        completed = stats.completed,
        pending = pending.len(),
        "built dashboard"
    );

    Dashboard {
        stats,
        all: list_view(all_cards, EMPTY_ALL),
        recent: list_view(recent_cards, EMPTY_RECENT),
        timeline: build_timeline(&pending),
    }
}

/// Stable sort by due date; unparseable dates go last in their original order
pub fn sort_by_due(tasks: &[Task]) -> Vec<&Task> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by(|a, b| compare_due(a.due(), b.due()));
    sorted
}

fn compare_due(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// 进度百分比：四舍五入（.5 向上），空集合为 0
pub fn compute_stats(total: usize, completed: usize) -> Stats {
    let progress_percent = if total == 0 {
        0
    } else {
        let completed = completed.min(total);
        ((completed * 200 + total) / (total * 2)) as u8
    };

    Stats {
        total,
        completed,
        progress_percent,
    }
}

/// e.g. `Wed, Jan 1, 2025`
pub fn format_due_label(task: &Task) -> String {
    match task.due() {
        Some(date) => date.format("%a, %b %-d, %Y").to_string(),
        None => INVALID_DATE.to_string(),
    }
}

fn task_card(task: &Task) -> TaskCard {
    let mut actions = Vec::with_capacity(2);
    if !task.completed {
        actions.push(TaskAction::Complete(task.id));
    }
    actions.push(TaskAction::Delete(task.id));

    TaskCard {
        id: task.id,
        title: task.title.clone(),
        description: task.description.clone(),
        completed: task.completed,
        due_label: format_due_label(task),
        priority: task.priority,
        actions,
    }
}

fn list_view(cards: Vec<TaskCard>, empty: &'static str) -> TaskListView {
    let empty_message = cards.is_empty().then_some(empty);
    TaskListView {
        cards,
        empty_message,
    }
}

/// Ordering of bucket keys: valid keys lexicographically, then unparseable keys.
/// `date` only feeds the labels; `raw` already decides every comparison.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct BucketKey {
    invalid: bool,
    raw: String,
    date: Option<NaiveDate>,
}

impl BucketKey {
    fn new(raw: &str) -> Self {
        let date = NaiveDate::parse_from_str(raw.trim(), DUE_DATE_FORMAT).ok();
        Self {
            invalid: date.is_none(),
            date,
            raw: raw.to_string(),
        }
    }
}

fn build_timeline(pending: &[&Task]) -> TimelineView {
    if pending.is_empty() {
        return TimelineView {
            buckets: Vec::new(),
            empty_message: Some(EMPTY_TIMELINE),
        };
    }

    let mut grouped: BTreeMap<BucketKey, Vec<&Task>> = BTreeMap::new();
    for &task in pending {
        grouped
            .entry(BucketKey::new(&task.due_date))
            .or_default()
            .push(task);
    }

    let buckets = grouped
        .into_iter()
        .map(|(key, tasks)| {
            let (day_label, month_label) = match key.date {
                Some(date) => (date.format("%-d").to_string(), date.format("%b").to_string()),
                None => ("?".to_string(), "???".to_string()),
            };

            TimelineBucket {
                date_key: key.raw,
                day_label,
                month_label,
                entries: tasks
                    .into_iter()
                    .map(|t| TimelineEntry {
                        id: t.id,
                        title: t.title.clone(),
                        priority: t.priority,
                        actions: vec![TaskAction::Complete(t.id), TaskAction::Delete(t.id)],
                    })
                    .collect(),
            }
        })
        .collect();

    TimelineView {
        buckets,
        empty_message: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use chrono::{TimeZone, Utc};

    fn task(id: u64, due: &str, completed: bool) -> Task {
        Task {
            id,
            title: format!("task {id}"),
            description: String::new(),
            due_date: due.to_string(),
            priority: Priority::Medium,
            completed,
            created_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn card_ids(view: &TaskListView) -> Vec<u64> {
        view.cards.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_empty_dashboard() {
        let dashboard = build_dashboard(&[]);
        assert_eq!(dashboard.stats, Stats::default());
        assert_eq!(dashboard.all.empty_message, Some(EMPTY_ALL));
        assert_eq!(dashboard.recent.empty_message, Some(EMPTY_RECENT));
        assert_eq!(dashboard.timeline.empty_message, Some(EMPTY_TIMELINE));
    }

    #[test]
    fn test_all_view_sorted_by_due_date() {
        let tasks = vec![
            task(1, "2025-01-01", false),
            task(2, "2025-01-03", false),
            task(3, "2025-01-02", false),
        ];
        let dashboard = build_dashboard(&tasks);
        assert_eq!(card_ids(&dashboard.all), vec![1, 3, 2]);
        // 输入不被重排
        assert_eq!(tasks[1].id, 2);
    }

    #[test]
    fn test_sort_is_stable_and_invalid_last() {
        let tasks = vec![
            task(1, "not a date", false),
            task(2, "2025-02-01", false),
            task(3, "2025-01-01", false),
            task(4, "2025-02-01", false),
            task(5, "", false),
        ];
        let ids: Vec<u64> = sort_by_due(&tasks).iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 2, 4, 1, 5]);
    }

    #[test]
    fn test_stats_rounding() {
        assert_eq!(compute_stats(0, 0).progress_percent, 0);
        assert_eq!(compute_stats(3, 1).progress_percent, 33);
        assert_eq!(compute_stats(3, 2).progress_percent, 67);
        assert_eq!(compute_stats(8, 1).progress_percent, 13);
        assert_eq!(compute_stats(4, 4).progress_percent, 100);
    }

    #[test]
    fn test_stats_match_collection() {
        let tasks = vec![
            task(1, "2025-01-01", true),
            task(2, "2025-01-02", false),
            task(3, "2025-01-03", true),
        ];
        let stats = build_dashboard(&tasks).stats;
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.progress_percent, 67);
    }

    #[test]
    fn test_card_actions() {
        let tasks = vec![task(1, "2025-01-01", true), task(2, "2025-01-02", false)];
        let dashboard = build_dashboard(&tasks);
        assert_eq!(dashboard.all.cards[0].actions, vec![TaskAction::Delete(1)]);
        assert_eq!(
            dashboard.all.cards[1].actions,
            vec![TaskAction::Complete(2), TaskAction::Delete(2)]
        );
    }

    #[test]
    fn test_recent_is_reversed_suffix() {
        let tasks: Vec<Task> = (1..=5)
            .map(|i| task(i, &format!("2025-01-0{i}"), false))
            .collect();
        let dashboard = build_dashboard(&tasks);
        assert_eq!(card_ids(&dashboard.recent), vec![5, 4, 3]);

        let two = build_dashboard(&tasks[..2]);
        assert_eq!(card_ids(&two.recent), vec![2, 1]);
    }

    #[test]
    fn test_timeline_groups_pending_by_date() {
        let tasks = vec![
            task(1, "2025-03-10", false),
            task(2, "2025-01-05", false),
            task(3, "2025-03-10", false),
            task(4, "2025-02-01", false),
            task(5, "2025-01-05", false),
            task(6, "2025-01-05", true),
        ];
        let timeline = build_dashboard(&tasks).timeline;

        assert_eq!(timeline.empty_message, None);
        let keys: Vec<&str> = timeline.buckets.iter().map(|b| b.date_key.as_str()).collect();
        assert_eq!(keys, vec!["2025-01-05", "2025-02-01", "2025-03-10"]);

        let first: Vec<u64> = timeline.buckets[0].entries.iter().map(|e| e.id).collect();
        assert_eq!(first, vec![2, 5]);
        assert_eq!(timeline.buckets[0].day_label, "5");
        assert_eq!(timeline.buckets[0].month_label, "Jan");
        assert_eq!(timeline.buckets[2].entries.len(), 2);
    }

    #[test]
    fn test_timeline_orders_buckets_by_raw_key() {
        // 未补零的日期也能解析，但桶按原始字符串排序
        let tasks = vec![task(1, "2025-1-5", false), task(2, "2025-01-10", false)];
        let timeline = build_dashboard(&tasks).timeline;

        let keys: Vec<&str> = timeline.buckets.iter().map(|b| b.date_key.as_str()).collect();
        assert_eq!(keys, vec!["2025-01-10", "2025-1-5"]);
        assert_eq!(timeline.buckets[1].day_label, "5");
        assert_eq!(timeline.buckets[1].month_label, "Jan");
    }

    #[test]
    fn test_timeline_empty_when_all_completed() {
        let tasks = vec![task(1, "2025-01-01", true)];
        let dashboard = build_dashboard(&tasks);
        assert!(dashboard.timeline.buckets.is_empty());
        assert_eq!(dashboard.timeline.empty_message, Some(EMPTY_TIMELINE));
        assert_eq!(dashboard.all.cards.len(), 1);
    }

    #[test]
    fn test_invalid_date_placeholders() {
        let tasks = vec![task(1, "someday", false), task(2, "2025-01-01", false)];
        let dashboard = build_dashboard(&tasks);

        assert_eq!(dashboard.all.cards[1].due_label, INVALID_DATE);
        let last = dashboard.timeline.buckets.last().unwrap();
        assert_eq!(last.date_key, "someday");
        assert_eq!(last.day_label, "?");
    }

    #[test]
    fn test_due_label_format() {
        let t = task(1, "2025-01-01", false);
        assert_eq!(format_due_label(&t), "Wed, Jan 1, 2025");
    }

    #[test]
    fn test_build_is_idempotent() {
        let tasks = vec![task(1, "2025-01-02", false), task(2, "2025-01-01", true)];
        assert_eq!(build_dashboard(&tasks), build_dashboard(&tasks));
    }
}
